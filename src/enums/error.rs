//! # Error Module - Custom *Napool* Error Type
//!
//! Defines the unified error type for Napool.
//!
//! ## Features
//! - Covers buffer/mask shape mismatches, missing-value contract violations,
//! invalid level sets for pool rebuilds, and out-of-range indices.
//! - Implements `Display` for readable output and `Error` for integration
//! with standard Rust error handling.

use std::error::Error;
use std::fmt;

/// Catch all error type for `Napool`
#[derive(Debug, Clone, PartialEq)]
pub enum NapoolError {
    /// Value buffer and missingness bitmap (or the two operands of a binary
    /// operation) disagree on length. Raised at construction or entry, never
    /// silently broadcast.
    ShapeMismatch { expected: usize, found: usize },
    /// An operation that contractually requires full data encountered a
    /// missing element at `index`.
    MissingValue { index: usize },
    /// A reorder/relabel was given a level sequence that is not an exact
    /// permutation of the current levels, has the wrong length, or contains
    /// duplicates.
    InvalidLevels { reason: String },
    /// An index or pool position outside the valid range. Distinct from
    /// missingness.
    IndexOutOfBounds { index: usize, len: usize },
}

impl fmt::Display for NapoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NapoolError::ShapeMismatch { expected, found } => {
                write!(
                    f,
                    "Shape mismatch: expected length {}, found {}.",
                    expected, found
                )
            }
            NapoolError::MissingValue { index } => {
                write!(
                    f,
                    "Missing value present at index {}: operation requires full data.",
                    index
                )
            }
            NapoolError::InvalidLevels { reason } => {
                write!(f, "Invalid level set: {}.", reason)
            }
            NapoolError::IndexOutOfBounds { index, len } => {
                write!(
                    f,
                    "Index {} out of bounds for length {}.",
                    index, len
                )
            }
        }
    }
}

impl Error for NapoolError {}
