//! Group algebras the completion runs over, and the context a run is bound to.
//!
//! A group algebra is presented by a basis of monomials closed under division
//! together with a monomial ideal of products that vanish. The group algebra of
//! an abelian p-group `C_{p^a1} x ... x C_{p^ak}` over `GF(p)` is
//! `GF(p)[x1, ..., xk] / (x1^{p^a1}, ..., xk^{p^ak})` with `xi = gi - 1`, which
//! is what [`TruncatedAlgebra::abelian_p_group`] builds.
//!
//! Only commutative algebras are supported: monomials are exponent vectors and
//! multiplication does not depend on the order of the factors.

use crate::{
    error::{Error, InputError, Operand, Result},
    poly::{module::ModuleElement, monomial::Monomial},
};
use ark_ff::{BigInteger, Field, PrimeField};
use std::{fmt::Debug, marker::PhantomData};

/// A commutative algebra with a monomial basis.
///
/// `multiply(a, b)` must equal `multiply(b, a)`, and `divide` must agree with
/// `multiply`: whenever it returns `w`, `multiply(divisor, w)` is `target`.
/// Reduction and S-vectors take every cofactor from `divide`.
pub trait GroupAlgebra: Debug + Send + Sync {
    type Field: Field;
    type Monomial: Monomial;

    /// Number of algebra generators, i.e. variables of the presentation.
    fn num_generators(&self) -> usize;

    /// Monomials generating the ideal of vanishing products.
    fn relations(&self) -> &[Self::Monomial];

    fn identity(&self) -> Self::Monomial {
        Self::Monomial::one()
    }

    fn generators(&self) -> Vec<Self::Monomial> {
        (0..self.num_generators())
            .map(|var| Self::Monomial::new(&[(var, 1)]))
            .collect()
    }

    /// Whether `monomial` is a nonzero basis element of the algebra.
    fn contains(&self, monomial: &Self::Monomial) -> bool {
        monomial.num_of_vars() <= self.num_generators()
            && !self.relations().iter().any(|r| r.divides(monomial))
    }

    /// Product of two basis monomials, `None` when it vanishes.
    fn multiply(
        &self,
        lhs: &Self::Monomial,
        rhs: &Self::Monomial,
    ) -> Result<Option<Self::Monomial>> {
        let product = checked_product(lhs, rhs)?;
        Ok(self.contains(&product).then_some(product))
    }

    /// Cofactor `w` with `divisor * w == target`, if `divisor` divides `target`.
    fn divide(
        &self,
        target: &Self::Monomial,
        divisor: &Self::Monomial,
    ) -> Option<Self::Monomial> {
        target.clone() / divisor
    }

    /// Dimension over the coefficient field, when finite.
    fn dimension(&self) -> Option<usize>;

    /// Every basis monomial, ascending, when there are finitely many.
    fn monomials(&self) -> Option<Vec<Self::Monomial>>;
}

fn checked_product<M: Monomial>(lhs: &M, rhs: &M) -> Result<M> {
    lhs.checked_mul(rhs).ok_or_else(|| {
        Error::ArithmeticInconsistency(format!(
            "exponent overflow multiplying {:?} by {:?}",
            lhs, rhs
        ))
    })
}

/// The commutative polynomial ring `F[x_0, ..., x_{n-1}]`, a group algebra with no relations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolynomialAlgebra<F: Field, M: Monomial> {
    num_of_vars: usize,
    _marker: PhantomData<(F, M)>,
}

impl<F: Field, M: Monomial> PolynomialAlgebra<F, M> {
    pub fn new(num_of_vars: usize) -> Self {
        Self {
            num_of_vars,
            _marker: PhantomData,
        }
    }
}

impl<F: Field, M: Monomial> GroupAlgebra for PolynomialAlgebra<F, M> {
    type Field = F;
    type Monomial = M;

    fn num_generators(&self) -> usize {
        self.num_of_vars
    }

    fn relations(&self) -> &[M] {
        &[]
    }

    fn multiply(&self, lhs: &M, rhs: &M) -> Result<Option<M>> {
        checked_product(lhs, rhs).map(Some)
    }

    fn dimension(&self) -> Option<usize> {
        (self.num_of_vars == 0).then_some(1)
    }

    fn monomials(&self) -> Option<Vec<M>> {
        (self.num_of_vars == 0).then(|| vec![M::one()])
    }
}

/// `F[x_0, ..., x_{k-1}] / (x_0^{n_0}, ..., x_{k-1}^{n_{k-1}})`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncatedAlgebra<F: Field, M: Monomial> {
    bounds: Vec<u16>,
    relations: Vec<M>,
    _marker: PhantomData<F>,
}

impl<F: Field, M: Monomial> TruncatedAlgebra<F, M> {
    /// Each bound `n_i` makes `x_i^{n_i}` vanish.
    pub fn new(bounds: &[u16]) -> Self {
        Self {
            relations: bounds
                .iter()
                .enumerate()
                .map(|(var, &pow)| M::new(&[(var, pow)]))
                .collect(),
            bounds: bounds.to_vec(),
            _marker: PhantomData,
        }
    }

    pub fn bounds(&self) -> &[u16] {
        &self.bounds
    }
}

impl<F: PrimeField, M: Monomial> TruncatedAlgebra<F, M> {
    /// Group algebra over `F` of the product of cyclic groups of the given orders.
    ///
    /// Every order must be a positive power of the characteristic of `F`.
    /// None of the bundled fields has characteristic two, so 2-groups need a
    /// caller-supplied field of characteristic two, or [`TruncatedAlgebra::new`]
    /// with the bounds spelled out.
    pub fn abelian_p_group(orders: &[u64]) -> Result<Self> {
        let modulus = F::MODULUS;
        if modulus.num_bits() > 64 {
            return Err(InputError::CharacteristicTooLarge.into());
        }
        let characteristic = modulus.as_ref()[0];

        let bounds = orders
            .iter()
            .map(|&order| {
                let mut rest = order;
                while rest > 1 && rest % characteristic == 0 {
                    rest /= characteristic;
                }
                match (order > 1 && rest == 1, u16::try_from(order)) {
                    (true, Ok(bound)) => Ok(bound),
                    _ => Err(InputError::NotAPGroup {
                        order,
                        characteristic,
                    }),
                }
            })
            .collect::<std::result::Result<Vec<u16>, _>>()?;

        Ok(Self::new(&bounds))
    }
}

impl<F: Field, M: Monomial> GroupAlgebra for TruncatedAlgebra<F, M> {
    type Field = F;
    type Monomial = M;

    fn num_generators(&self) -> usize {
        self.bounds.len()
    }

    fn relations(&self) -> &[M] {
        &self.relations
    }

    fn contains(&self, monomial: &M) -> bool {
        monomial.num_of_vars() <= self.bounds.len()
            && monomial
                .iter()
                .zip(self.bounds.iter())
                .all(|(pow, bound)| pow < bound)
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.bounds.iter().map(|&b| b as usize).product())
    }

    fn monomials(&self) -> Option<Vec<M>> {
        let mut monomials = Vec::with_capacity(self.dimension()?);
        if self.bounds.contains(&0) {
            return Some(monomials);
        }

        let mut exponents = vec![0u16; self.bounds.len()];
        'outer: loop {
            let term: Vec<(usize, u16)> = exponents.iter().copied().enumerate().collect();
            monomials.push(M::new(&term));

            for (exponent, bound) in exponents.iter_mut().zip(self.bounds.iter()) {
                *exponent += 1;
                if *exponent < *bound {
                    continue 'outer;
                }
                *exponent = 0;
            }
            break;
        }

        monomials.sort();
        Some(monomials)
    }
}

/// The algebra and free-module rank a completion run operates in.
///
/// Immutable once built; share it by reference between independent runs.
#[derive(Debug, Clone)]
pub struct GroupContext<A: GroupAlgebra> {
    algebra: A,
    rank: usize,
}

impl<A: GroupAlgebra> GroupContext<A> {
    pub fn new(algebra: A, rank: usize) -> Self {
        Self { algebra, rank }
    }

    pub fn algebra(&self) -> &A {
        &self.algebra
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Checks that `element` lives in this context's free module.
    pub fn check_element(
        &self,
        operand: Operand,
        element: &ModuleElement<A::Field, A::Monomial>,
    ) -> Result<()> {
        if element.rank() != self.rank {
            return Err(InputError::RankMismatch {
                operand,
                expected: self.rank,
                found: element.rank(),
            }
            .into());
        }
        for (_, term) in element.terms() {
            if term.position >= self.rank {
                return Err(InputError::PositionOutOfRange {
                    operand,
                    position: term.position,
                    rank: self.rank,
                }
                .into());
            }
            if !self.algebra.contains(&term.monomial) {
                return Err(InputError::MonomialOutsideAlgebra { operand }.into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        poly::monomial::{DegRevLexOrder, DenseMonomial, LexOrder},
        GF3, GF5,
    };
    use ark_test_curves::bls12_381::Fr;

    type M = DenseMonomial<DegRevLexOrder>;

    #[test]
    fn test_abelian_p_group_bounds() {
        let algebra = TruncatedAlgebra::<GF3, M>::abelian_p_group(&[3, 9]).unwrap();
        assert_eq!(algebra.bounds(), &[3, 9]);
        assert_eq!(algebra.dimension(), Some(27));
        assert_eq!(algebra.relations(), &[M::var(0, 3), M::var(1, 9)]);
    }

    #[test]
    fn test_abelian_p_group_rejects_wrong_orders() {
        let err = TruncatedAlgebra::<GF5, M>::abelian_p_group(&[5, 10]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidInput(InputError::NotAPGroup {
                order: 10,
                characteristic: 5
            })
        );
        assert!(TruncatedAlgebra::<GF5, M>::abelian_p_group(&[1]).is_err());
        assert_eq!(
            TruncatedAlgebra::<Fr, M>::abelian_p_group(&[2]).unwrap_err(),
            Error::InvalidInput(InputError::CharacteristicTooLarge)
        );
    }

    #[test]
    fn test_truncated_multiply_vanishes() {
        let algebra = TruncatedAlgebra::<GF3, M>::new(&[3, 3]);
        let x = M::var(0, 1);
        let x2y = M::new(&[(0, 2), (1, 1)]);
        assert_eq!(algebra.multiply(&x, &x), Ok(Some(M::var(0, 2))));
        assert_eq!(algebra.multiply(&x, &x2y), Ok(None));
        assert!(!algebra.contains(&M::var(2, 1)));
        assert!(algebra.contains(&algebra.identity()));
        assert_eq!(algebra.generators(), vec![M::var(0, 1), M::var(1, 1)]);
    }

    #[test]
    fn test_truncated_monomials() {
        let algebra = TruncatedAlgebra::<GF3, M>::new(&[3, 2]);
        let monomials = algebra.monomials().unwrap();
        assert_eq!(monomials.len(), 6);
        assert_eq!(monomials.first(), Some(&M::one()));
        assert_eq!(monomials.last(), Some(&M::new(&[(0, 2), (1, 1)])));
        assert!(monomials.iter().all(|m| algebra.contains(m)));
        assert!(monomials.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_polynomial_algebra_never_vanishes() {
        let algebra = PolynomialAlgebra::<GF3, M>::new(2);
        let x = M::var(0, 7);
        assert_eq!(algebra.multiply(&x, &x), Ok(Some(M::var(0, 14))));
        assert_eq!(algebra.divide(&M::var(0, 14), &x), Some(x.clone()));
        assert_eq!(algebra.divide(&x, &M::var(1, 1)), None);
        assert_eq!(algebra.dimension(), None);
        assert_eq!(algebra.monomials(), None);
        assert_eq!(
            PolynomialAlgebra::<GF3, M>::new(0).monomials(),
            Some(vec![M::one()])
        );
    }

    #[test]
    fn test_multiply_commutes() {
        let truncated = TruncatedAlgebra::<GF5, M>::new(&[5, 25]);
        let polynomial = PolynomialAlgebra::<GF5, M>::new(2);
        let monomials = truncated.monomials().unwrap();
        for a in monomials.iter().step_by(7) {
            for b in monomials.iter().step_by(5) {
                assert_eq!(truncated.multiply(a, b), truncated.multiply(b, a));
                assert_eq!(polynomial.multiply(a, b), polynomial.multiply(b, a));
                assert_eq!(truncated.divide(&(a * b), a), Some(b.clone()));
            }
        }
    }

    #[test]
    fn test_multiply_reports_exponent_overflow() {
        type L = DenseMonomial<LexOrder>;
        let algebra = PolynomialAlgebra::<GF5, L>::new(2);
        let tail = L::var(1, 40000);
        let cofactor = L::var(1, 30000);
        assert!(matches!(
            algebra.multiply(&tail, &cofactor),
            Err(Error::ArithmeticInconsistency(_))
        ));
        assert_eq!(
            algebra.multiply(&tail, &L::var(1, 20000)),
            Ok(Some(L::var(1, 60000)))
        );
    }

    #[test]
    fn test_two_groups_need_characteristic_two() {
        let err = TruncatedAlgebra::<GF3, M>::abelian_p_group(&[2, 4]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidInput(InputError::NotAPGroup {
                order: 2,
                characteristic: 3
            })
        );
        // explicit bounds still build the truncated presentation
        let algebra = TruncatedAlgebra::<GF3, M>::new(&[2, 4]);
        assert_eq!(algebra.dimension(), Some(8));
    }

    #[test]
    fn test_check_element() {
        let context = GroupContext::new(TruncatedAlgebra::<GF3, M>::new(&[3]), 2);
        let one = GF3::from(1u64);
        let good = ModuleElement::from_components(&[vec![(one, M::var(0, 2))], vec![]]);
        assert!(context.check_element(Operand::Query, &good).is_ok());

        let wrong_rank = ModuleElement::from_components(&[vec![(one, M::one())]]);
        assert_eq!(
            context.check_element(Operand::Generator(3), &wrong_rank),
            Err(Error::InvalidInput(InputError::RankMismatch {
                operand: Operand::Generator(3),
                expected: 2,
                found: 1
            }))
        );

        let vanishing = ModuleElement::from_components(&[vec![], vec![(one, M::var(0, 3))]]);
        assert_eq!(
            context.check_element(Operand::Query, &vanishing),
            Err(Error::InvalidInput(InputError::MonomialOutsideAlgebra {
                operand: Operand::Query
            }))
        );
    }
}
