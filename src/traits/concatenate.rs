//! # Concatenate Trait Module
//!
//! Provides uniform concatenation across Napool types.
//!
//! ## Overview
//! The `Concatenate` trait enables combining two instances of the same type:
//! - **NaArrays**: values and missingness bitmaps appended pairwise
//! - **PooledArrays**: pools aligned onto a shared pool first, then codes
//!   appended (see [`crate::kernels::align`])
//! - **Bitmasks**: bit vectors appended
//!
//! ## Important: Consuming Semantics
//! **The `concat` method consumes both inputs for maximum efficiency.**
//! If you need to preserve an input, clone it first:
//! `arr1.clone().concat(arr2)`.

use crate::enums::error::NapoolError;

/// Concatenate trait for combining two instances of the same type.
///
/// # Consuming Semantics
/// **This trait consumes both `self` and `other`.** The first instance's
/// buffer is reused and the second instance's data is appended.
///
/// Implementors must ensure shape validation where applicable; a failed
/// concat leaves no partially built instance observable.
pub trait Concatenate {
    /// Concatenates `self` with `other`, **consuming both** and returning a
    /// new instance.
    ///
    /// # Errors
    /// - `ShapeMismatch`: incompatible shapes (matrix column counts, etc.)
    fn concat(self, other: Self) -> Result<Self, NapoolError>
    where
        Self: Sized;
}

impl<T> Concatenate for Vec<T> {
    fn concat(mut self, other: Self) -> Result<Self, NapoolError> {
        // Consume other and extend self with its elements
        self.extend(other);
        Ok(self)
    }
}
