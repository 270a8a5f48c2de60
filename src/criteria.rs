//! Buchberger criteria for discarding critical pairs whose S-vectors reduce to zero.
//!
//! None of these affect the result, only how many reductions are spent reaching
//! it, so every test answers "keep" when it cannot prove the pair redundant.

use crate::{
    pairs::{CriticalPair, Partner, PairQueue},
    poly::{
        module::{ModuleElement, ModuleTerm},
        monomial::Monomial,
    },
};
use ark_ff::Field;

/// Why a pair was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Leading terms sit in different positions, there is no S-vector.
    Position,
    /// Coprime leading monomials.
    Product,
    /// A third basis element already accounts for the pair.
    Chain,
}

/// The partner side of a pair under test.
#[derive(Debug)]
pub enum PartnerRef<'a, F: Field, M: Monomial> {
    Element(&'a ModuleElement<F, M>),
    Relation(&'a M),
}

impl<F: Field, M: Monomial> Clone for PartnerRef<'_, F, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: Field, M: Monomial> Copy for PartnerRef<'_, F, M> {}

/// Leading term of the pair `(f, partner)`'s lcm, `None` when the leading terms
/// do not share a position.
pub fn pair_lcm<F: Field, M: Monomial>(
    f: &ModuleElement<F, M>,
    partner: PartnerRef<'_, F, M>,
) -> Option<ModuleTerm<M>> {
    let (_, lt_f) = f.leading_term()?;
    match partner {
        PartnerRef::Element(g) => lt_f.lcm(&g.leading_term()?.1),
        PartnerRef::Relation(r) => Some(ModuleTerm::new(lt_f.position, lt_f.monomial.lcm(r))),
    }
}

/// Checks Buchberger's first criterion (product criterion) for a module pair.
///
/// A monomial relation kills every multiple of a coprime leading monomial in all
/// positions at once. For two module elements the classical argument needs both
/// to be supported in the single position of their leading terms.
pub fn product_criterion<F: Field, M: Monomial>(
    f: &ModuleElement<F, M>,
    partner: PartnerRef<'_, F, M>,
) -> bool {
    let Some(lm_f) = f.leading_monomial() else {
        return false;
    };
    match partner {
        PartnerRef::Relation(r) => lm_f.is_coprime(r),
        PartnerRef::Element(g) => match g.leading_monomial() {
            Some(lm_g) => {
                f.is_single_position() && g.is_single_position() && lm_f.is_coprime(lm_g)
            },
            None => false,
        },
    }
}

/// Checks the chain criterion (Buchberger's second criterion).
///
/// If a basis element `k` other than the pair's members has a leading term
/// dividing the pair's lcm, and the pairs `(i, k)` and `(j, k)` are no longer
/// pending, the pair is redundant.
pub fn chain_criterion<F: Field, M: Monomial>(
    pair: &CriticalPair<M>,
    basis: &[ModuleElement<F, M>],
    queue: &PairQueue<M>,
) -> bool {
    let Partner::Basis(j) = pair.partner else {
        return false;
    };
    basis.iter().enumerate().any(|(k, g_k)| {
        k != pair.i
            && k != j
            && g_k
                .leading_term()
                .map_or(false, |(_, lt_k)| lt_k.divides(&pair.lcm).is_some())
            && !queue.is_pending(pair.i, k)
            && !queue.is_pending(j, k)
    })
}

/// The redundancy eliminator, with each criterion switchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eliminator {
    pub product: bool,
    pub chain: bool,
}

impl Default for Eliminator {
    fn default() -> Self {
        Self {
            product: true,
            chain: true,
        }
    }
}

impl Eliminator {
    /// Test applied when a pair is created.
    pub fn on_enqueue<F: Field, M: Monomial>(
        &self,
        f: &ModuleElement<F, M>,
        partner: PartnerRef<'_, F, M>,
    ) -> Option<Skip> {
        if pair_lcm(f, partner).is_none() {
            Some(Skip::Position)
        } else if self.product && product_criterion(f, partner) {
            Some(Skip::Product)
        } else {
            None
        }
    }

    /// Test applied when a pair is selected, once the pairs created with it are known.
    pub fn on_select<F: Field, M: Monomial>(
        &self,
        pair: &CriticalPair<M>,
        basis: &[ModuleElement<F, M>],
        queue: &PairQueue<M>,
    ) -> Option<Skip> {
        (self.chain && chain_criterion(pair, basis, queue)).then_some(Skip::Chain)
    }
}
