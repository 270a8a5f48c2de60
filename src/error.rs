//! Error types for Buchberger completion.

use std::fmt;
use thiserror::Error;

/// Result type for completion operations
pub type Result<T> = std::result::Result<T, Error>;

/// The caller-supplied element an [`InputError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// The generator at this index of the input sequence.
    Generator(usize),
    /// The element handed to a normal-form or membership query.
    Query,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Generator(index) => write!(f, "generator {}", index),
            Operand::Query => write!(f, "queried element"),
        }
    }
}

/// Reasons a generating system is rejected before completion starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("no generators supplied")]
    EmptyGenerators,

    #[error("{operand} has rank {found}, the context expects rank {expected}")]
    RankMismatch {
        operand: Operand,
        expected: usize,
        found: usize,
    },

    #[error("{operand} has a term in position {position}, outside rank {rank}")]
    PositionOutOfRange {
        operand: Operand,
        position: usize,
        rank: usize,
    },

    #[error("{operand} has a term that is not a basis monomial of the group algebra")]
    MonomialOutsideAlgebra { operand: Operand },

    #[error("cyclic factor of order {order} is not a power of the characteristic {characteristic}")]
    NotAPGroup { order: u64, characteristic: u64 },

    #[error("the coefficient field's characteristic does not fit in 64 bits")]
    CharacteristicTooLarge,
}

/// Errors that can occur during Buchberger completion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("arithmetic inconsistency: {0}")]
    ArithmeticInconsistency(String),

    #[error(
        "completion exceeded the limit of {limit} critical pairs with {basis_len} basis elements"
    )]
    ResourceExhausted { limit: usize, basis_len: usize },
}

impl Error {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}
