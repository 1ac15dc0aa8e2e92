//! # **NaArray Module** - *Dense Null-Aware Array*
//!
//! Dense value buffer paired with a same-length missingness bitmap.
//!
//! ## Overview
//! - Logical type: any clonable element (`T`).
//! - Physical storage: `Vec<T>` plus a bit-packed [`Bitmask`] where a set
//!   bit marks the element as missing.
//! - The stored value under a set bit is never read by any operation and
//!   may be stale; writers are not required to clear it.
//!
//! ## Features
//! - **Construction** from buffers, slices, `Option` sequences, or from
//!   dimensions alone (all-missing), with fail-fast shape validation.
//! - **Mutation**: set/push, missing insertion, resize, append.
//! - **Traversal**: checked, skipping and substituting policies, via the
//!   [`Masked`] trait surface.
//! - **Selection**: one `take` entry point over normalized selectors, plus
//!   explicit missing-aware variants (`filter_na`, `take_na`).

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use crate::aliases::{Length, Offset};
use crate::enums::shape_dim::ShapeDim;
use crate::traits::concatenate::Concatenate;
use crate::traits::masked::Masked;
use crate::traits::print::{Print, MAX_PREVIEW};
use crate::traits::selection::{DataSelector, Selection};
use crate::traits::shape::Shape;
use crate::utils::validate_mask_len;
use crate::{Bitmask, NapoolError};

// Stand-in written to the hasher for a missing element. Distinct from the
// present tag so hash stays consistent with structural equality.
const MISSING_HASH_TAG: u8 = 0;
const PRESENT_HASH_TAG: u8 = 1;

/// # NaArray
///
/// Dense null-aware array: value buffer plus parallel missingness bitmap.
///
/// ## Role
/// - The base container every column operation of a tabular layer routes
///   through.
/// - Also the decoded form of a [`crate::PooledArray`], which shares this
///   type's read contract via [`Masked`].
///
/// ### Fields
/// - `data`: backing buffer of element values.
/// - `missing`: bit-packed missingness bitmap (1 = missing), always the
///   same length as `data`.
///
/// ## Example
/// ```rust
/// use napool::{Masked, NaArray};
///
/// let mut arr = NaArray::<i64>::from_slice(&[1, 2, 3]);
/// arr.set_missing(1);
/// assert_eq!(arr.get(0), Some(1));
/// assert_eq!(arr.get(1), None);
/// assert_eq!(arr.missing_count(), 1);
/// assert_eq!(arr.to_compact(), vec![1, 3]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NaArray<T> {
    /// Backing buffer for values.
    pub data: Vec<T>,
    /// Missingness bitmap (bit-packed; 1 = missing, 0 = present).
    pub missing: Bitmask,
}

impl<T> NaArray<T> {
    /// Constructs a new NaArray from a value buffer and missingness bitmap.
    ///
    /// Fails fast with `ShapeMismatch` when the two lengths disagree - the
    /// shape invariant can only be violated at construction.
    pub fn new(data: Vec<T>, missing: Bitmask) -> Result<Self, NapoolError> {
        validate_mask_len(data.len(), &missing)?;
        Ok(Self { data, missing })
    }

    /// Builds from a plain value buffer; every element present.
    #[inline]
    pub fn from_vec(data: Vec<T>) -> Self {
        let missing = Bitmask::new_set_all(data.len(), false);
        Self { data, missing }
    }

    /// Constructs an empty array with reserved capacity.
    #[inline]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            data: Vec::with_capacity(n),
            missing: Bitmask::with_capacity(n),
        }
    }

    /// Returns the number of elements in the array.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a reference to the missingness bitmap.
    #[inline]
    pub fn missing_mask(&self) -> &Bitmask {
        &self.missing
    }

    /// Returns a reference to the value at `idx`, or `None` if missing.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    #[inline]
    pub fn get_ref(&self, idx: usize) -> Option<&T> {
        if self.missing.get(idx) {
            return None;
        }
        Some(&self.data[idx])
    }

    /// Marks the element at `idx` as missing. The stored value is left in
    /// place (unspecified-but-retained) and never read again until
    /// overwritten by `set`.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    #[inline]
    pub fn set_missing(&mut self, idx: usize) {
        assert!(idx < self.len(), "NaArray::set_missing out of bounds");
        self.missing.set(idx, true);
    }
}

impl<T: Clone> NaArray<T> {
    /// Builds from a slice; every element present.
    #[inline]
    pub fn from_slice(values: &[T]) -> Self {
        Self::from_vec(values.to_vec())
    }

    /// Stores `value` at `idx` and clears the missing bit.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    #[inline]
    pub fn set(&mut self, idx: usize, value: T) {
        assert!(idx < self.len(), "NaArray::set out of bounds");
        self.data[idx] = value;
        self.missing.set(idx, false);
    }

    /// Appends a present value.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.data.push(value);
        self.missing.push(false);
    }

    /// Appends every value from a slice as present elements.
    pub fn extend_from_slice(&mut self, values: &[T]) {
        self.data.extend_from_slice(values);
        self.missing.push_bits(false, values.len());
    }

    /// Appends all values and missingness from `other` to `self`.
    pub fn append_array(&mut self, other: &Self) {
        self.data.extend_from_slice(&other.data);
        self.missing.extend_from_bitmask(&other.missing);
    }

    /// Creates a new array filled with `value` repeated `count` times.
    pub fn fill(value: T, count: usize) -> Self {
        Self {
            data: vec![value; count],
            missing: Bitmask::new_set_all(count, false),
        }
    }

    /// Returns a logical slice of the array [offset, offset+len) as a new
    /// `NaArray` object.
    ///
    /// `Offset` and `Length` are `usize` aliases.
    ///
    /// # Panics
    /// Panics if the window exceeds the array.
    pub fn slice_clone(&self, offset: Offset, len: Length) -> Self {
        assert!(
            offset + len <= self.len(),
            "slice window out of bounds"
        );
        Self {
            data: self.data[offset..offset + len].to_vec(),
            missing: self.missing.slice_clone(offset, len),
        }
    }

    /// Selects elements through a normalized selector: a position, a
    /// position list, a range, or a boolean keep-mask.
    ///
    /// Out-of-range positions are an `IndexOutOfBounds` error; a mask of
    /// the wrong length is a `ShapeMismatch` error.
    pub fn take<S: DataSelector>(&self, selector: S) -> Result<Self, NapoolError> {
        match selector.normalize(self.len())? {
            Selection::Point(i) => Ok(self.gather(&[i])),
            Selection::Points(indices) => Ok(self.gather(&indices)),
            Selection::Mask(mask) => {
                let indices: Vec<usize> = mask.iter_set().collect();
                Ok(self.gather(&indices))
            }
        }
    }

    /// Boolean-mask selection through a missing-aware mask.
    ///
    /// A missing mask entry excludes the element: the mask is first passed
    /// through an explicit replace-with-false step, then applied as a plain
    /// keep-mask.
    pub fn filter_na(&self, mask: &NaArray<bool>) -> Result<Self, NapoolError> {
        if mask.len() != self.len() {
            return Err(NapoolError::ShapeMismatch {
                expected: self.len(),
                found: mask.len(),
            });
        }
        let plain = Bitmask::from_bools(&mask.to_filled(false));
        self.take(plain)
    }

    /// Integer-index selection through a missing-aware index sequence.
    ///
    /// Missing index entries are dropped; present entries are validated
    /// against the array length.
    pub fn take_na(&self, indices: &NaArray<usize>) -> Result<Self, NapoolError> {
        let mut resolved = Vec::with_capacity(indices.len());
        for idx in indices.iter_present() {
            if idx >= self.len() {
                return Err(NapoolError::IndexOutOfBounds {
                    index: idx,
                    len: self.len(),
                });
            }
            resolved.push(idx);
        }
        Ok(self.gather(&resolved))
    }

    // Positional gather over pre-validated indices.
    fn gather(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len());
        let mut missing = Bitmask::new_set_all(indices.len(), false);
        for (out, &i) in indices.iter().enumerate() {
            data.push(self.data[i].clone());
            if self.missing.get(i) {
                missing.set(out, true);
            }
        }
        Self { data, missing }
    }
}

impl<T: Clone + Default> NaArray<T> {
    /// Constructs an all-missing array of `len` elements. Values hold
    /// `T::default()` placeholders that no operation reads.
    pub fn new_missing(len: usize) -> Self {
        Self {
            data: vec![T::default(); len],
            missing: Bitmask::new_set_all(len, true),
        }
    }

    /// Builds from an `Option` sequence; `None` becomes a missing element.
    pub fn from_options<I: IntoIterator<Item = Option<T>>>(values: I) -> Self {
        let mut out = Self::with_capacity(0);
        for v in values {
            out.push_opt(v);
        }
        out
    }

    /// Appends a missing element. The placeholder value is never read.
    #[inline]
    pub fn push_missing(&mut self) {
        self.data.push(T::default());
        self.missing.push(true);
    }

    /// Appends `Some` as a present value, `None` as a missing element.
    #[inline]
    pub fn push_opt(&mut self, value: Option<T>) {
        match value {
            Some(v) => self.push(v),
            None => self.push_missing(),
        }
    }

    /// Resizes the array to `n` elements. Growth appends present copies of
    /// `value`; shrinking truncates both buffer and bitmap.
    pub fn resize(&mut self, n: usize, value: T) {
        self.data.resize(n, value);
        self.missing.resize(n, false);
    }
}

impl<T: Clone> Masked for NaArray<T> {
    type Value = T;

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    /// Retrieves the value at the given index, or `None` if missing.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    #[inline]
    fn get(&self, idx: usize) -> Option<T> {
        if self.missing.get(idx) {
            return None;
        }
        Some(self.data[idx].clone())
    }

    #[inline]
    fn is_missing(&self, idx: usize) -> bool {
        self.missing.get(idx)
    }

    #[inline]
    fn any_missing(&self) -> bool {
        self.missing.any_set()
    }

    #[inline]
    fn all_missing(&self) -> bool {
        self.missing.all_set()
    }

    #[inline]
    fn missing_count(&self) -> usize {
        self.missing.count_ones()
    }
}

/// Structural equality: shapes match and, pairwise, either both positions
/// are missing or both are present with equal values. Stale values under
/// set mask bits never participate.
impl<T: PartialEq> PartialEq for NaArray<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        for i in 0..self.len() {
            let a_missing = self.missing.get(i);
            if a_missing != other.missing.get(i) {
                return false;
            }
            if !a_missing && self.data[i] != other.data[i] {
                return false;
            }
        }
        true
    }
}

impl<T: Eq> Eq for NaArray<T> {}

/// Hash combines the shape with a position-order-sensitive fold; a missing
/// element contributes a fixed stand-in tag so the hash is consistent with
/// structural equality.
impl<T: Hash> Hash for NaArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for i in 0..self.len() {
            if self.missing.get(i) {
                state.write_u8(MISSING_HASH_TAG);
            } else {
                state.write_u8(PRESENT_HASH_TAG);
                self.data[i].hash(state);
            }
        }
    }
}

impl<T> Shape for NaArray<T> {
    fn shape(&self) -> ShapeDim {
        ShapeDim::Rank1(self.data.len())
    }
}

impl<T: Clone> Concatenate for NaArray<T> {
    fn concat(mut self, other: Self) -> Result<Self, NapoolError> {
        self.append_array(&other);
        Ok(self)
    }
}

impl<T: Clone + Display> Display for NaArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let len = self.len();
        let missing = self.missing_count();

        writeln!(f, "NaArray [{} values] (missing: {})", len, missing)?;

        write!(f, "[")?;
        for i in 0..usize::min(len, MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get_ref(i) {
                Some(val) => write!(f, "{}", val)?,
                None => write!(f, "NA")?,
            }
        }
        if len > MAX_PREVIEW {
            write!(f, ", … ({} total)", len)?;
        }
        write!(f, "]")
    }
}

impl<T: Clone + Display> Print for NaArray<T> {}

#[cfg(feature = "parallel_proc")]
mod parallel {
    use rayon::prelude::*;

    use super::NaArray;

    impl<T: Clone + Send + Sync> NaArray<T> {
        /// Parallel iterator over `Option<&T>` (None if missing).
        #[inline]
        pub fn par_iter_opt(&self) -> impl ParallelIterator<Item = Option<&T>> + '_ {
            let missing = &self.missing;
            self.data.par_iter().enumerate().map(move |(i, v)| {
                if unsafe { missing.get_unchecked(i) } {
                    None
                } else {
                    Some(v)
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_invariant_holds_after_construction_and_mutation() {
        let mut arr = NaArray::<i32>::from_slice(&[1, 2, 3]);
        assert_eq!(arr.data.len(), arr.missing.len());
        arr.push(4);
        assert_eq!(arr.data.len(), arr.missing.len());
        arr.push_missing();
        assert_eq!(arr.data.len(), arr.missing.len());
        arr.resize(2, 0);
        assert_eq!(arr.data.len(), arr.missing.len());
    }

    #[test]
    fn construction_fails_fast_on_shape_mismatch() {
        let mask = Bitmask::new_set_all(2, false);
        let err = NaArray::new(vec![1, 2, 3], mask).unwrap_err();
        assert_eq!(
            err,
            NapoolError::ShapeMismatch {
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn set_then_get_roundtrip() {
        let mut arr = NaArray::<i64>::from_slice(&[10, 20, 30]);
        arr.set(1, 222);
        assert!(!arr.is_missing(1));
        assert_eq!(arr.get(1), Some(222));
    }

    #[test]
    fn set_missing_then_get_is_none() {
        let mut arr = NaArray::<i64>::from_slice(&[10, 20, 30]);
        arr.set_missing(2);
        assert!(arr.is_missing(2));
        assert_eq!(arr.get(2), None);
        // Writing a value again clears the missing bit.
        arr.set(2, 7);
        assert!(!arr.is_missing(2));
        assert_eq!(arr.get(2), Some(7));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn get_out_of_range_is_a_bounds_error() {
        let arr = NaArray::<i32>::from_slice(&[1]);
        arr.get(1);
    }

    #[test]
    fn any_and_all_missing() {
        let mut arr = NaArray::<u8>::from_slice(&[1, 2]);
        assert!(!arr.any_missing());
        assert!(!arr.all_missing());
        arr.set_missing(0);
        assert!(arr.any_missing());
        assert!(!arr.all_missing());
        arr.set_missing(1);
        assert!(arr.all_missing());

        let empty = NaArray::<u8>::from_slice(&[]);
        assert!(!empty.any_missing());
        assert!(empty.all_missing());
    }

    #[test]
    fn new_missing_is_fully_missing() {
        let arr = NaArray::<i32>::new_missing(4);
        assert_eq!(arr.len(), 4);
        assert!(arr.all_missing());
        assert_eq!(arr.missing_count(), 4);
    }

    #[test]
    fn dense_extraction_fail_fast() {
        let full = NaArray::<i32>::from_slice(&[1, 2, 3]);
        assert_eq!(full.to_dense().unwrap(), vec![1, 2, 3]);

        let mut holed = full.clone();
        holed.set_missing(1);
        assert_eq!(
            holed.to_dense().unwrap_err(),
            NapoolError::MissingValue { index: 1 }
        );
    }

    #[test]
    fn compact_extraction_preserves_order() {
        let arr = NaArray::from_options(vec![Some(5), None, Some(7), None, Some(9)]);
        let compact = arr.to_compact();
        assert_eq!(compact, vec![5, 7, 9]);
        assert_eq!(compact.len(), arr.len() - arr.missing_count());
    }

    #[test]
    fn filled_extraction_copies() {
        let arr = NaArray::from_options(vec![Some(1), None, Some(3)]);
        assert_eq!(arr.to_filled(0), vec![1, 0, 3]);
        // Source untouched.
        assert_eq!(arr.get(1), None);
    }

    #[test]
    fn traversal_policies() {
        let arr = NaArray::from_options(vec![Some(1), None, Some(3)]);

        let checked: Vec<_> = arr.iter_checked().collect();
        assert_eq!(checked[0], Ok(1));
        assert_eq!(checked[1], Err(NapoolError::MissingValue { index: 1 }));

        assert_eq!(arr.iter_present().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(arr.iter_filled(9).collect::<Vec<_>>(), vec![1, 9, 3]);
        assert_eq!(
            arr.iter_opt().collect::<Vec<_>>(),
            vec![Some(1), None, Some(3)]
        );
    }

    #[test]
    fn skip_traversal_on_fully_missing_array_terminates() {
        let arr = NaArray::<i32>::new_missing(5);
        assert_eq!(arr.iter_present().next(), None);
        assert_eq!(arr.to_compact(), Vec::<i32>::new());
    }

    #[test]
    fn take_by_points_and_range() {
        let arr = NaArray::from_options(vec![Some(10), None, Some(30), Some(40)]);
        let taken = arr.take(vec![3, 0, 1]).unwrap();
        assert_eq!(
            taken.iter_opt().collect::<Vec<_>>(),
            vec![Some(40), Some(10), None]
        );

        let ranged = arr.take(1..3).unwrap();
        assert_eq!(
            ranged.iter_opt().collect::<Vec<_>>(),
            vec![None, Some(30)]
        );

        assert!(arr.take(4usize).is_err());
    }

    #[test]
    fn take_by_mask() {
        let arr = NaArray::<i32>::from_slice(&[1, 2, 3, 4]);
        let mask = Bitmask::from_bools(&[true, false, false, true]);
        let taken = arr.take(&mask).unwrap();
        assert_eq!(taken.to_dense().unwrap(), vec![1, 4]);

        let short = Bitmask::from_bools(&[true]);
        assert!(matches!(
            arr.take(&short),
            Err(NapoolError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn filter_na_excludes_missing_mask_entries() {
        let arr = NaArray::<i32>::from_slice(&[1, 2, 3]);
        let mask = NaArray::from_options(vec![Some(true), None, Some(true)]);
        let out = arr.filter_na(&mask).unwrap();
        // The missing mask entry behaves as false after replace-with-false.
        assert_eq!(out.to_dense().unwrap(), vec![1, 3]);
    }

    #[test]
    fn take_na_drops_missing_indices() {
        let arr = NaArray::<i32>::from_slice(&[10, 20, 30]);
        let idx = NaArray::from_options(vec![Some(2usize), None, Some(0usize)]);
        let out = arr.take_na(&idx).unwrap();
        assert_eq!(out.to_dense().unwrap(), vec![30, 10]);

        let bad = NaArray::from_options(vec![Some(9usize)]);
        assert!(matches!(
            arr.take_na(&bad),
            Err(NapoolError::IndexOutOfBounds { index: 9, len: 3 })
        ));
    }

    #[test]
    fn structural_equality_ignores_stale_values() {
        let mut a = NaArray::<i32>::from_slice(&[1, 42, 3]);
        a.set_missing(1);
        let b = NaArray::from_options(vec![Some(1), None, Some(3)]);
        // Stale 42 under the mask bit does not participate.
        assert_eq!(a, b);

        let c = NaArray::<i32>::from_slice(&[1, 42, 3]);
        assert_ne!(a, c);
    }

    #[test]
    fn hash_consistent_with_equality() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of<T: Hash>(v: &T) -> u64 {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        }

        let mut a = NaArray::<i32>::from_slice(&[1, 99, 3]);
        a.set_missing(1);
        let b = NaArray::from_options(vec![Some(1), None, Some(3)]);
        assert_eq!(hash_of(&a), hash_of(&b));

        // A missing slot hashes differently from any present value there.
        let c = NaArray::<i32>::from_slice(&[1, 0, 3]);
        assert_ne!(hash_of(&a), hash_of(&c));
    }

    #[test]
    fn append_and_concat() {
        let a = NaArray::from_options(vec![Some(1), None]);
        let b = NaArray::from_options(vec![Some(3)]);
        let joined = a.concat(b).unwrap();
        assert_eq!(
            joined.iter_opt().collect::<Vec<_>>(),
            vec![Some(1), None, Some(3)]
        );
    }

    #[test]
    fn slice_clone_carries_missingness() {
        let arr = NaArray::from_options(vec![Some(1), None, Some(3), Some(4)]);
        let s = arr.slice_clone(1, 2);
        assert_eq!(s.iter_opt().collect::<Vec<_>>(), vec![None, Some(3)]);
    }

    #[test]
    fn shape_reports_rank1() {
        let arr = NaArray::<i32>::from_slice(&[1, 2]);
        assert_eq!(arr.shape(), ShapeDim::Rank1(2));
        assert_eq!(arr.shape_1d(), 2);
    }
}
