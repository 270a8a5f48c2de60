use ark_ff::{Field, Zero};
use derivative::Derivative;
use std::{
    cmp::Ordering,
    fmt,
    fmt::Debug,
    hash::Hash,
    ops::{Add, AddAssign, MulAssign, Neg, Sub, SubAssign},
    vec::Vec,
};

use crate::{algebra::GroupAlgebra, poly::monomial::Monomial};

/// A monomial placed at a basis position of a free module.
///
/// Terms compare by monomial first; on equal monomials the lower position is
/// the greater term.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ModuleTerm<M: Monomial> {
    pub monomial: M,
    pub position: usize,
}

impl<M: Monomial> ModuleTerm<M> {
    pub fn new(position: usize, monomial: M) -> Self {
        Self { monomial, position }
    }

    /// Least common multiple, defined only for terms in the same position.
    pub fn lcm(&self, other: &Self) -> Option<Self> {
        (self.position == other.position)
            .then(|| Self::new(self.position, self.monomial.lcm(&other.monomial)))
    }

    /// Cofactor `w` with `self * w == other` under exponent-vector division.
    pub fn divides(&self, other: &Self) -> Option<M> {
        if self.position == other.position {
            other.monomial.clone() / &self.monomial
        } else {
            None
        }
    }

    /// Cofactor `w` with `self * w == other`, as the algebra divides.
    pub fn cofactor<A>(&self, other: &Self, algebra: &A) -> Option<M>
    where
        A: GroupAlgebra<Monomial = M>,
    {
        if self.position == other.position {
            algebra.divide(&other.monomial, &self.monomial)
        } else {
            None
        }
    }
}

impl<M: Monomial> PartialOrd for ModuleTerm<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M: Monomial> Ord for ModuleTerm<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.monomial
            .cmp(&other.monomial)
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl<M: Monomial> Debug for ModuleTerm<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{:?} e_{}", self.monomial, self.position)
    }
}

/// Sparse element of a free module of finite rank over a group algebra.
///
/// Terms are kept strictly ascending with nonzero coefficients, so the leading
/// term is the last one.
#[derive(Derivative)]
#[derivative(Clone, PartialEq, Eq, Hash, Default)]
pub struct ModuleElement<F: Field, M: Monomial> {
    #[derivative(PartialEq = "ignore")]
    #[derivative(Hash = "ignore")]
    pub(crate) rank: usize,
    pub(crate) terms: Vec<(F, ModuleTerm<M>)>,
}

impl<F: Field, M: Monomial> ModuleElement<F, M> {
    /// Input terms may repeat and may carry zero coefficients.
    pub fn new(rank: usize, terms: &[(F, ModuleTerm<M>)]) -> Self {
        let mut terms = terms.to_vec();
        terms.sort_by(|(_, t1), (_, t2)| t1.cmp(t2));
        let mut terms_dedup: Vec<(F, ModuleTerm<M>)> = Vec::with_capacity(terms.len());
        for term in terms {
            if let Some(prev) = terms_dedup.last_mut() {
                if prev.1 == term.1 {
                    prev.0 += term.0;
                    continue;
                }
            }
            terms_dedup.push(term);
        }
        terms_dedup.retain(|(c, _)| !c.is_zero());

        Self {
            rank,
            terms: terms_dedup,
        }
    }

    /// Builds an element from one polynomial per position; the rank is the number of components.
    pub fn from_components(components: &[Vec<(F, M)>]) -> Self {
        let terms: Vec<(F, ModuleTerm<M>)> = components
            .iter()
            .enumerate()
            .flat_map(|(position, poly)| {
                poly.iter()
                    .map(move |(c, m)| (*c, ModuleTerm::new(position, m.clone())))
            })
            .collect();
        Self::new(components.len(), &terms)
    }

    pub fn zero_with_rank(rank: usize) -> Self {
        Self {
            rank,
            terms: Vec::new(),
        }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn terms(&self) -> &[(F, ModuleTerm<M>)] {
        self.terms.as_slice()
    }

    pub fn leading_term(&self) -> Option<&(F, ModuleTerm<M>)> {
        self.terms.last()
    }

    pub fn leading_coefficient(&self) -> Option<F> {
        self.leading_term().map(|(coeff, _)| *coeff)
    }

    pub fn leading_monomial(&self) -> Option<&M> {
        self.leading_term().map(|(_, term)| &term.monomial)
    }

    pub fn leading_position(&self) -> Option<usize> {
        self.leading_term().map(|(_, term)| term.position)
    }

    pub fn trailing_terms(&self) -> &[(F, ModuleTerm<M>)] {
        if self.terms.len() > 1 {
            &self.terms[..self.terms.len() - 1]
        } else {
            &[]
        }
    }

    /// Largest total degree among the terms, zero for the zero element.
    pub fn degree(&self) -> u32 {
        self.terms
            .iter()
            .map(|(_, t)| t.monomial.degree())
            .max()
            .unwrap_or(0)
    }

    /// Whether every term sits in the position of the leading term.
    pub fn is_single_position(&self) -> bool {
        match self.leading_position() {
            Some(position) => self.terms.iter().all(|(_, t)| t.position == position),
            None => true,
        }
    }

    /// Coefficient polynomial at `position`, ascending.
    pub fn component(&self, position: usize) -> Vec<(F, M)> {
        self.terms
            .iter()
            .filter(|(_, t)| t.position == position)
            .map(|(c, t)| (*c, t.monomial.clone()))
            .collect()
    }

    /// `coefficient * self * monomial`, with products vanishing in the algebra dropped.
    pub fn mul_term<A>(&self, algebra: &A, coefficient: F, monomial: &M) -> crate::Result<Self>
    where
        A: GroupAlgebra<Field = F, Monomial = M>,
    {
        if coefficient.is_zero() {
            return Ok(Self::zero_with_rank(self.rank));
        }
        let mut terms = Vec::with_capacity(self.terms.len());
        for (c, t) in &self.terms {
            if let Some(m) = algebra.multiply(&t.monomial, monomial)? {
                terms.push((*c * coefficient, ModuleTerm::new(t.position, m)));
            }
        }
        debug_assert!(terms.windows(2).all(|w| w[0].1 < w[1].1));

        Ok(Self {
            rank: self.rank,
            terms,
        })
    }

    /// S-vector cancelling the leading terms; `None` unless both share a leading position.
    pub fn s_vector<A>(&self, other: &Self, algebra: &A) -> crate::Result<Option<Self>>
    where
        A: GroupAlgebra<Field = F, Monomial = M>,
    {
        let (Some((coeff_self, lt_self)), Some((coeff_other, lt_other))) =
            (self.leading_term(), other.leading_term())
        else {
            return Ok(None);
        };
        let Some(lcm) = lt_self.lcm(lt_other) else {
            return Ok(None);
        };
        let (Some(t_self), Some(t_other)) = (
            lt_self.cofactor(&lcm, algebra),
            lt_other.cofactor(&lcm, algebra),
        ) else {
            return Ok(None);
        };

        let mut result = self.mul_term(algebra, *coeff_other, &t_self)?;
        result -= &other.mul_term(algebra, *coeff_self, &t_other)?;
        Ok(Some(result))
    }

    /// S-vector against the monomial relation `relation` of the algebra.
    ///
    /// The relation's own multiple vanishes, leaving the multiple of `self`
    /// whose leading term is killed by the relation.
    pub fn relation_s_vector<A>(&self, relation: &M, algebra: &A) -> crate::Result<Option<Self>>
    where
        A: GroupAlgebra<Field = F, Monomial = M>,
    {
        let Some(lm) = self.leading_monomial() else {
            return Ok(None);
        };
        match algebra.divide(&lm.lcm(relation), lm) {
            Some(t) => self.mul_term(algebra, F::one(), &t).map(Some),
            None => Ok(None),
        }
    }

    /// `self -= coefficient * reducer * monomial`.
    pub fn sub_multiple<A>(
        &mut self,
        reducer: &Self,
        coefficient: F,
        monomial: &M,
        algebra: &A,
    ) -> crate::Result<()>
    where
        A: GroupAlgebra<Field = F, Monomial = M>,
    {
        *self -= &reducer.mul_term(algebra, coefficient, monomial)?;
        Ok(())
    }

    /// Scales so the leading coefficient is one; `None` if it has no inverse.
    pub fn monic(mut self) -> Option<Self> {
        match self.leading_coefficient() {
            Some(lc) => {
                let inv = lc.inverse()?;
                self *= inv;
                Some(self)
            },
            None => Some(self),
        }
    }

    fn merge(&mut self, other: &Self, sign: F) {
        self.rank = self.rank.max(other.rank);
        let lhs = std::mem::take(&mut self.terms);
        let mut merged = Vec::with_capacity(lhs.len() + other.terms.len());
        let mut lhs = lhs.into_iter().peekable();
        let mut rhs = other.terms.iter().peekable();

        loop {
            let which = match (lhs.peek(), rhs.peek()) {
                (Some((_, cur)), Some((_, other))) => cur.cmp(other),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => break,
            };

            match which {
                Ordering::Less => merged.extend(lhs.next()),
                Ordering::Greater => {
                    if let Some((c, t)) = rhs.next() {
                        merged.push((*c * sign, t.clone()));
                    }
                },
                Ordering::Equal => {
                    if let (Some((cur, t)), Some((other, _))) = (lhs.next(), rhs.next()) {
                        let c = cur + *other * sign;
                        if !c.is_zero() {
                            merged.push((c, t));
                        }
                    }
                },
            }
        }

        self.terms = merged;
    }
}

impl<F: Field, M: Monomial> Add for ModuleElement<F, M> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.add(&rhs)
    }
}

impl<F: Field, M: Monomial> Neg for ModuleElement<F, M> {
    type Output = Self;

    #[inline]
    fn neg(mut self) -> Self::Output {
        for coeff in &mut self.terms {
            coeff.0 = -coeff.0;
        }
        self
    }
}

impl<F: Field, M: Monomial> Zero for ModuleElement<F, M> {
    /// Returns the zero element of rank zero.
    fn zero() -> Self {
        Self::zero_with_rank(0)
    }

    fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<F: Field, M: Monomial> Debug for ModuleElement<F, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, (coeff, term)) in self.terms.iter().rev().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{} {:?}", coeff, term)?;
        }
        Ok(())
    }
}

impl<'a, F: Field, M: Monomial> AddAssign<&'a Self> for ModuleElement<F, M> {
    fn add_assign(&mut self, other: &'a Self) {
        self.merge(other, F::one());
    }
}

impl<'a, F: Field, M: Monomial> Add<&'a Self> for ModuleElement<F, M> {
    type Output = Self;

    fn add(self, rhs: &'a Self) -> Self::Output {
        let mut result = self;
        result.add_assign(rhs);
        result
    }
}

impl<'a, 'b, F: Field, M: Monomial> Add<&'a ModuleElement<F, M>> for &'b ModuleElement<F, M> {
    type Output = ModuleElement<F, M>;

    fn add(self, rhs: &'a ModuleElement<F, M>) -> Self::Output {
        let mut result = self.clone();
        result.add_assign(rhs);
        result
    }
}

impl<'a, F: Field, M: Monomial> SubAssign<&'a Self> for ModuleElement<F, M> {
    fn sub_assign(&mut self, other: &'a Self) {
        self.merge(other, -F::one());
    }
}

impl<'a, F: Field, M: Monomial> Sub<&'a Self> for ModuleElement<F, M> {
    type Output = Self;

    fn sub(self, rhs: &'a Self) -> Self::Output {
        let mut result = self;
        result.sub_assign(rhs);
        result
    }
}

impl<'a, 'b, F: Field, M: Monomial> Sub<&'a ModuleElement<F, M>> for &'b ModuleElement<F, M> {
    type Output = ModuleElement<F, M>;

    fn sub(self, rhs: &'a ModuleElement<F, M>) -> Self::Output {
        let mut result = self.clone();
        result.sub_assign(rhs);
        result
    }
}

impl<F: Field, M: Monomial> MulAssign<F> for ModuleElement<F, M> {
    fn mul_assign(&mut self, rhs: F) {
        if rhs.is_zero() {
            self.terms = Vec::new();
        } else {
            self.terms.iter_mut().for_each(|(c, _)| *c *= rhs);
        }
    }
}
