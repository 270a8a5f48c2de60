#![allow(non_snake_case)]
#![allow(clippy::new_ret_no_self)]
#![allow(clippy::needless_return)]
#![allow(clippy::type_complexity)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::upper_case_acronyms)]

pub mod algebra;
pub mod buchberger;
pub mod criteria;
pub mod error;
pub mod groebner;
pub mod pairs;
pub mod poly;
pub mod reduce;

use crate::poly::{module::ModuleElement, monomial::*};
use ark_ff::fields::{Fp64, MontBackend, MontConfig};
use std::cmp;

pub use crate::{
    algebra::{GroupAlgebra, GroupContext, PolynomialAlgebra, TruncatedAlgebra},
    buchberger::{
        compute_free_basis, compute_restricted_basis, Buchberger, BuchbergerConfig,
        CompletionStats, Fgs, Rgs,
    },
    error::{Error, InputError, Operand, Result},
    pairs::SelectionStrategy,
};

/// Heap entry ordered by its key alone.
#[derive(Debug, Clone)]
pub struct Entry<L, R>(pub L, pub R);
impl<L: PartialEq, R> PartialEq for Entry<L, R> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<L: Eq, R> Eq for Entry<L, R> {}
impl<L: PartialOrd, R> PartialOrd for Entry<L, R> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl<L: Ord, R> Ord for Entry<L, R> {
    #[inline]
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

#[derive(MontConfig)]
#[modulus = "3"]
#[generator = "2"]
pub struct FqConfig3;

#[derive(MontConfig)]
#[modulus = "5"]
#[generator = "2"]
pub struct FqConfig5;

#[derive(MontConfig)]
#[modulus = "18446744073709551557"]
#[generator = "2"]
pub struct FqConfig18446744073709551557;

// No characteristic-2 field: the Montgomery backend needs an odd modulus.

/// Coefficients of the group algebras of 3-groups.
pub type GF3 = Fp64<MontBackend<FqConfig3, 1>>;
/// Coefficients of the group algebras of 5-groups.
pub type GF5 = Fp64<MontBackend<FqConfig5, 1>>;
pub type GF = Fp64<MontBackend<FqConfig18446744073709551557, 1>>;

pub type LexMonomial = DenseMonomial<LexOrder>;
pub type DegRevLexMonomial = DenseMonomial<DegRevLexOrder>;

pub type LexElement<F> = ModuleElement<F, LexMonomial>;
pub type DegRevLexElement<F> = ModuleElement<F, DegRevLexMonomial>;
