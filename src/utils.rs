//! # Utilities - *Internal Helper Utilities*
//!
//! A small collection of internal helpers that support validation elsewhere
//! within the crate.

use crate::{Bitmask, NapoolError};

/// Checks that a missingness bitmap has the same logical length as the data
/// buffer it annotates.
///
/// Every constructor that accepts a caller-supplied mask routes through here
/// so a shape violation can never survive past construction.
#[inline(always)]
pub fn validate_mask_len(data_len: usize, mask: &Bitmask) -> Result<(), NapoolError> {
    if mask.len() != data_len {
        return Err(NapoolError::ShapeMismatch {
            expected: data_len,
            found: mask.len(),
        });
    }
    Ok(())
}

/// Checks that `index < len`, reporting the offending index otherwise.
#[inline(always)]
pub fn validate_index(index: usize, len: usize) -> Result<(), NapoolError> {
    if index >= len {
        return Err(NapoolError::IndexOutOfBounds { index, len });
    }
    Ok(())
}
