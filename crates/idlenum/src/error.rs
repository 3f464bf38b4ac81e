//! # Numeric Error Types
//!
//! All errors that can occur while constructing, transforming, or extracting
//! big-number values.

use thiserror::Error;

/// Errors that can occur in big-number operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    /// Division or modulo by a value whose mantissa is zero.
    #[error("division by zero")]
    DivideByZero,

    /// A string (or non-finite float) failed to parse as a numeric token.
    #[error("unparsable numeric input: {input:?}")]
    UnparsableInput {
        /// The rejected input, verbatim.
        input: String,
    },

    /// A value does not fit the requested representation.
    #[error("value exceeds the {target} range")]
    Overflow {
        /// The representation that could not hold the value.
        target: &'static str,
    },

    /// Logarithm requested with a base that has no finite logarithm table.
    #[error("invalid logarithm base {base}")]
    InvalidLogBase {
        /// The rejected base.
        base: f64,
    },

    /// Square root of a negative value.
    #[error("square root of a negative value")]
    NegativeSqrt,
}

/// Result type for big-number operations.
pub type NumericResult<T> = Result<T, NumericError>;
