use crate::{
    algebra::GroupAlgebra,
    error::{Error, Result},
    poly::{
        module::{ModuleElement, ModuleTerm},
        monomial::Monomial,
    },
    reduce::{reduce, reduces_to_zero, Reducers},
};
use ark_ff::{Field, Zero};
use rayon::prelude::*;
use tracing::debug;

/// Check whether `elements`, taken modulo `prior`, form a Gröbner basis of their span.
///
/// Every S-vector against another element, a prior element or an algebra
/// relation has to reduce to zero.
pub fn is_groebner_basis<A>(
    elements: &[ModuleElement<A::Field, A::Monomial>],
    prior: &[ModuleElement<A::Field, A::Monomial>],
    algebra: &A,
) -> Result<bool>
where
    A: GroupAlgebra,
{
    let reducers = Reducers::restricted(prior, elements);
    let closed = elements
        .par_iter()
        .enumerate()
        .map(|(i, f)| -> Result<bool> {
            for g in elements[..i].iter().chain(prior.iter()) {
                if let Some(s) = f.s_vector(g, algebra)? {
                    if !reduces_to_zero(&s, &reducers, algebra)? {
                        return Ok(false);
                    }
                }
            }
            for relation in algebra.relations() {
                if let Some(s) = f.relation_s_vector(relation, algebra)? {
                    if !reduces_to_zero(&s, &reducers, algebra)? {
                        return Ok(false);
                    }
                }
            }
            Ok(true)
        })
        .collect::<Result<Vec<bool>>>()?;

    Ok(closed.into_iter().all(|c| c))
}

/// Reduce a Gröbner basis to the reduced one: minimal, tails in normal form, monic.
///
/// Elements whose leading term is divisible by another leading term (or by a
/// prior leading term) are dropped. The survivors come back sorted by leading term.
pub fn reduce_groebner_basis<A>(
    elements: &mut Vec<ModuleElement<A::Field, A::Monomial>>,
    prior: &[ModuleElement<A::Field, A::Monomial>],
    algebra: &A,
) -> Result<()>
where
    A: GroupAlgebra,
{
    debug!(len = elements.len(), "interreduce start");

    elements.retain(|f| !f.is_zero());
    elements.par_sort_by(|f, g| {
        f.leading_term()
            .map(|t| &t.1)
            .cmp(&g.leading_term().map(|t| &t.1))
    });

    let prior_reducers = Reducers::free(prior);
    let mut minimal: Vec<ModuleElement<A::Field, A::Monomial>> =
        Vec::with_capacity(elements.len());
    for f in elements.drain(..) {
        let Some((_, lt)) = f.leading_term() else {
            continue;
        };
        if prior_reducers.is_reducible(lt, algebra)
            || Reducers::free(&minimal).is_reducible(lt, algebra)
        {
            continue;
        }
        minimal.push(f);
    }

    // Leading terms are fixed from here on, so every tail can be reduced against
    // the same set at once.
    let reduced = minimal
        .par_iter()
        .enumerate()
        .map(|(i, f)| -> Result<ModuleElement<A::Field, A::Monomial>> {
            let reducers = Reducers::restricted(prior, &minimal).excluding(i);
            reduce(f, &reducers, algebra)?.monic().ok_or_else(|| {
                Error::ArithmeticInconsistency(format!(
                    "leading coefficient of {:?} is not invertible",
                    f
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    *elements = reduced;
    debug!(len = elements.len(), "interreduce end");
    Ok(())
}

/// Terms `m e_i` outside the leading module of `leading`, when the algebra is finite.
pub fn standard_terms<A>(
    leading: &[&ModuleTerm<A::Monomial>],
    rank: usize,
    algebra: &A,
) -> Option<Vec<ModuleTerm<A::Monomial>>>
where
    A: GroupAlgebra,
{
    let monomials = algebra.monomials()?;
    Some(
        (0..rank)
            .flat_map(|position| {
                monomials
                    .iter()
                    .map(move |m| ModuleTerm::new(position, m.clone()))
            })
            .filter(|term| !leading.iter().any(|lt| lt.divides(term).is_some()))
            .collect(),
    )
}

/// Dimension over the coefficient field of `A^rank` modulo the span of a Gröbner basis.
pub fn quotient_dimension<A>(
    leading: &[&ModuleTerm<A::Monomial>],
    rank: usize,
    algebra: &A,
) -> Option<usize>
where
    A: GroupAlgebra,
{
    standard_terms(leading, rank, algebra).map(|terms| terms.len())
}

/// Leading terms of the nonzero elements, in order.
pub fn leading_terms<F: Field, M: Monomial>(
    elements: &[ModuleElement<F, M>],
) -> Vec<&ModuleTerm<M>> {
    elements
        .iter()
        .filter_map(|f| f.leading_term().map(|(_, t)| t))
        .collect()
}
