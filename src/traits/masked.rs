//! Core `Masked` trait, providing a common interface for the null-aware
//! containers - the dense [`crate::NaArray`] and the dictionary-encoded
//! [`crate::PooledArray`].

use crate::NapoolError;

/// Masked is implemented by every container that pairs element values with
/// per-position missingness.
///
/// ### Purpose
/// - Ensures interface consistency between `NaArray` and `PooledArray`:
/// the pooled array is a specialization of this same contract, so grouping
/// and join layers can consume either through one surface.
/// - Avoids repetition through default implementations of the traversal and
/// extraction policies, which are defined entirely in terms of `len`/`get`.
///
/// ### Missingness
/// There is no in-band sentinel value: `get` returns `Option` and `None`
/// marks an absent element, so "comparing against the sentinel" is
/// unrepresentable. Code that needs a missingness test uses `is_missing`.
pub trait Masked {
    /// The logical element type yielded by reads.
    type Value: Clone;

    /// Returns the number of elements in the container.
    fn len(&self) -> usize;

    /// Returns true if the container is empty.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieves the value at the given index, or `None` if missing.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()` - out-of-range access is a bounds
    /// error, not a missingness condition.
    fn get(&self, idx: usize) -> Option<Self::Value>;

    /// Returns true if the element at `idx` is missing. Bit/code test only,
    /// no allocation.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    fn is_missing(&self, idx: usize) -> bool;

    /// Returns true if at least one element is missing. Short-circuits on
    /// the first hit.
    fn any_missing(&self) -> bool {
        (0..self.len()).any(|i| self.is_missing(i))
    }

    /// Returns true if every element is missing. AND-reduction over the
    /// whole container; true for an empty one.
    fn all_missing(&self) -> bool {
        (0..self.len()).all(|i| self.is_missing(i))
    }

    /// Returns the total number of missing elements.
    fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_missing(i)).count()
    }

    /// **************************************************
    /// Traversal and extraction policies are defined once
    /// here in terms of `len`/`get`; implementors override
    /// only when the physical layout offers a faster path.
    /// **************************************************

    /// Returns an iterator of `Option<Value>`, `None` for missing elements.
    fn iter_opt(&self) -> impl Iterator<Item = Option<Self::Value>> + '_
    where
        Self: Sized,
    {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// Returns an iterator that yields an error for each missing element.
    ///
    /// The checked counterpart of [`Masked::to_dense`], without
    /// materialising a buffer.
    fn iter_checked(&self) -> impl Iterator<Item = Result<Self::Value, NapoolError>> + '_
    where
        Self: Sized,
    {
        (0..self.len()).map(move |i| {
            self.get(i)
                .ok_or(NapoolError::MissingValue { index: i })
        })
    }

    /// Returns an iterator that silently skips missing elements.
    ///
    /// On a fully missing container (or a fully missing tail) the iterator
    /// terminates normally, yielding nothing further.
    fn iter_present(&self) -> impl Iterator<Item = Self::Value> + '_
    where
        Self: Sized,
    {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Returns an iterator that substitutes `default` for missing elements.
    fn iter_filled(&self, default: Self::Value) -> impl Iterator<Item = Self::Value> + '_
    where
        Self: Sized,
    {
        (0..self.len()).map(move |i| self.get(i).unwrap_or_else(|| default.clone()))
    }

    /// Fail-fast extraction: a plain buffer of every element, or a
    /// `MissingValue` error naming the first missing position.
    ///
    /// Used whenever a plain buffer is contractually required downstream.
    fn to_dense(&self) -> Result<Vec<Self::Value>, NapoolError>
    where
        Self: Sized,
    {
        self.iter_checked().collect()
    }

    /// Compacting extraction: only the non-missing elements, in original
    /// order. Result length equals `len() - missing_count()`.
    fn to_compact(&self) -> Vec<Self::Value>
    where
        Self: Sized,
    {
        self.iter_present().collect()
    }

    /// Replacing extraction: a same-length plain buffer with every missing
    /// element replaced by `default`. Copy semantics - the source container
    /// is untouched.
    fn to_filled(&self, default: Self::Value) -> Vec<Self::Value>
    where
        Self: Sized,
    {
        self.iter_filled(default).collect()
    }
}
