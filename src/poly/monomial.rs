use std::{
    cmp::Ordering,
    fmt::{Debug, Error, Formatter},
    hash::Hash,
    iter,
    marker::PhantomData,
    ops::{Div, Mul, MulAssign},
    vec::Vec,
};

pub trait Monomial:
    Clone
    + PartialOrd
    + Ord
    + PartialEq
    + Eq
    + Hash
    + Default
    + Debug
    + Send
    + Sync
    + for<'a> MulAssign<&'a Self>
    + for<'a> Mul<&'a Self, Output = Self>
    + for<'a> Div<&'a Self, Output = Option<Self>>
{
    fn new(monomial: &[(usize, u16)]) -> Self;

    fn degree(&self) -> u32;

    /// Exponent of variable `var`, zero past the last stored variable.
    fn exponent(&self, var: usize) -> u16;

    /// One past the highest variable index with a nonzero exponent.
    fn num_of_vars(&self) -> usize;

    fn is_constant(&self) -> bool;

    fn lcm(&self, other: &Self) -> Self;

    fn gcd(&self, other: &Self) -> Self;

    /// Product, `None` if an exponent does not fit.
    fn checked_mul(&self, other: &Self) -> Option<Self>;

    fn one() -> Self;

    fn iter(&self) -> Box<dyn DoubleEndedIterator<Item = &'_ u16> + '_ + Sync + Send>;

    fn compare_lex_order(lhs: &Self, rhs: &Self) -> Ordering;

    fn compare_deg_rev_lex_order(lhs: &Self, rhs: &Self) -> Ordering;

    fn divides(&self, other: &Self) -> bool {
        (0..self.num_of_vars()).all(|var| self.exponent(var) <= other.exponent(var))
    }

    fn is_coprime(&self, other: &Self) -> bool {
        self.gcd(other).is_constant()
    }
}

pub trait MonomialOrd: Clone + PartialEq + Eq + Hash + Default + Debug + Send + Sync {
    fn compare<T: Monomial>(lhs: &T, rhs: &T) -> Ordering;
}

#[derive(Clone, PartialEq, Eq, Hash, Default, Debug)]
pub struct LexOrder {}
#[derive(Clone, PartialEq, Eq, Hash, Default, Debug)]
pub struct DegRevLexOrder {}

impl MonomialOrd for LexOrder {
    fn compare<T: Monomial>(lhs: &T, rhs: &T) -> Ordering {
        T::compare_lex_order(lhs, rhs)
    }
}

impl MonomialOrd for DegRevLexOrder {
    fn compare<T: Monomial>(lhs: &T, rhs: &T) -> Ordering {
        T::compare_deg_rev_lex_order(lhs, rhs)
    }
}

/// Exponent vector of a commutative monomial.
///
/// Trailing zero exponents are never stored, so structural equality and hashing
/// agree with monomial equality regardless of how many variables a value was
/// built with.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DenseMonomial<O: MonomialOrd>(Vec<u16>, PhantomData<O>);

impl<O: MonomialOrd> DenseMonomial<O> {
    fn from_exponents(mut exponents: Vec<u16>) -> Self {
        while exponents.last() == Some(&0) {
            exponents.pop();
        }
        Self(exponents, PhantomData)
    }

    /// The variable `var` raised to `pow`.
    pub fn var(var: usize, pow: u16) -> Self {
        Self::new(&[(var, pow)])
    }

    pub fn transform_order<OT: MonomialOrd>(self) -> DenseMonomial<OT> {
        DenseMonomial(self.0, PhantomData)
    }

    fn zip_with(&self, other: &Self, f: impl Fn(u16, u16) -> u16) -> Self {
        let len = self.0.len().max(other.0.len());
        Self::from_exponents(
            (0..len)
                .map(|var| f(self.exponent(var), other.exponent(var)))
                .collect(),
        )
    }
}

impl<O: MonomialOrd> Default for DenseMonomial<O> {
    fn default() -> Self {
        DenseMonomial(Vec::new(), PhantomData)
    }
}

impl<O: MonomialOrd> PartialOrd for DenseMonomial<O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<O: MonomialOrd> Ord for DenseMonomial<O> {
    fn cmp(&self, other: &Self) -> Ordering {
        O::compare(self, other)
    }
}

impl<O: MonomialOrd> Monomial for DenseMonomial<O> {
    fn new(term: &[(usize, u16)]) -> Self {
        let len = term
            .iter()
            .filter(|(_, pow)| *pow != 0)
            .map(|(var, _)| var + 1)
            .max()
            .unwrap_or(0);
        let mut exponents: Vec<u16> = iter::repeat(0).take(len).collect();
        for &(var, pow) in term.iter().filter(|(_, pow)| *pow != 0) {
            exponents[var] += pow;
        }
        Self::from_exponents(exponents)
    }

    fn degree(&self) -> u32 {
        self.0.iter().map(|&pow| u32::from(pow)).sum()
    }

    fn exponent(&self, var: usize) -> u16 {
        self.0.get(var).copied().unwrap_or(0)
    }

    fn num_of_vars(&self) -> usize {
        self.0.len()
    }

    fn is_constant(&self) -> bool {
        self.0.is_empty()
    }

    fn one() -> Self {
        Self::default()
    }

    fn iter(&self) -> Box<dyn DoubleEndedIterator<Item = &'_ u16> + '_ + Sync + Send> {
        Box::new(self.0.iter())
    }

    fn compare_lex_order(lhs: &Self, rhs: &Self) -> Ordering {
        let len = lhs.0.len().max(rhs.0.len());
        (0..len)
            .map(|var| lhs.exponent(var).cmp(&rhs.exponent(var)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    fn compare_deg_rev_lex_order(lhs: &Self, rhs: &Self) -> Ordering {
        lhs.degree().cmp(&rhs.degree()).then_with(|| {
            let len = lhs.0.len().max(rhs.0.len());
            (0..len)
                .rev()
                .map(|var| lhs.exponent(var).cmp(&rhs.exponent(var)))
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
                .reverse()
        })
    }

    fn lcm(&self, other: &Self) -> Self {
        self.zip_with(other, u16::max)
    }

    fn gcd(&self, other: &Self) -> Self {
        self.zip_with(other, u16::min)
    }

    fn checked_mul(&self, other: &Self) -> Option<Self> {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|var| self.exponent(var).checked_add(other.exponent(var)))
            .collect::<Option<Vec<u16>>>()
            .map(Self::from_exponents)
    }
}

impl<O: MonomialOrd> Debug for DenseMonomial<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        if self.is_constant() {
            return write!(f, "1");
        }
        let mut first = true;
        for (var, &pow) in self.0.iter().enumerate().filter(|(_, pow)| **pow > 0) {
            if !first {
                write!(f, "*")?;
            }
            first = false;
            match pow.cmp(&1) {
                Ordering::Equal => write!(f, "x_{}", var)?,
                _ => write!(f, "x_{}^{}", var, pow)?,
            }
        }
        Ok(())
    }
}

/// Unchecked; the completion multiplies through [`Monomial::checked_mul`].
impl<'a, O: MonomialOrd> MulAssign<&'a DenseMonomial<O>> for DenseMonomial<O> {
    fn mul_assign(&mut self, other: &'a DenseMonomial<O>) {
        if self.0.len() < other.0.len() {
            self.0.resize(other.0.len(), 0);
        }
        self.0
            .iter_mut()
            .zip(other.0.iter())
            .for_each(|(lhs, rhs)| *lhs += rhs);
    }
}

impl<'a, O: MonomialOrd> Mul<&'a DenseMonomial<O>> for DenseMonomial<O> {
    type Output = Self;

    fn mul(self, other: &'a DenseMonomial<O>) -> Self::Output {
        let mut result = self;
        result.mul_assign(other);
        result
    }
}

impl<'a, 'b, O: MonomialOrd> Mul<&'a DenseMonomial<O>> for &'b DenseMonomial<O> {
    type Output = DenseMonomial<O>;

    fn mul(self, other: &'a DenseMonomial<O>) -> Self::Output {
        let mut result = self.clone();
        result.mul_assign(other);
        result
    }
}

impl<'a, O: MonomialOrd> Div<&'a DenseMonomial<O>> for DenseMonomial<O> {
    type Output = Option<Self>;

    fn div(self, other: &'a DenseMonomial<O>) -> Self::Output {
        (&self).div(other)
    }
}

impl<'a, 'b, O: MonomialOrd> Div<&'a DenseMonomial<O>> for &'b DenseMonomial<O> {
    type Output = Option<DenseMonomial<O>>;

    fn div(self, other: &'a DenseMonomial<O>) -> Self::Output {
        other
            .divides(self)
            .then(|| self.zip_with(other, |lhs, rhs| lhs - rhs))
    }
}
