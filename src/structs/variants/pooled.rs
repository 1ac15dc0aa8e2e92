//! # **PooledArray Module** - *Dictionary-Encoded Array*
//!
//! Array of reference codes over a shared pool of distinct values.
//! Each element stores a small integer code referencing the pool; repeated
//! values are stored once. This saves memory and accelerates comparisons,
//! sorting, grouping and joins when many values repeat.
//!
//! ## Features
//! - Builders from `Option` sequences, plain slices, a dense [`NaArray`],
//!   or raw (pool, codes) parts.
//! - Automatic code-width promotion as the pool grows
//!   (see [`crate::Codes`]).
//! - Pool rebuilds: [`PooledArray::compact`], [`PooledArray::reorder`],
//!   [`PooledArray::set_levels`] - all pure, returning new instances.
//! - The same null-aware read contract as [`NaArray`], via [`Masked`].
//!
//! ## Pool sharing
//! The pool is held behind an `Arc`: sibling arrays produced by rebuilds or
//! by [`crate::kernels::align`] alias one pool cheaply. The only pool
//! mutation path is dictionary-build (`push`/`set` with an unseen value),
//! which goes through `Arc::make_mut` - when the pool is aliased this
//! copies on write, so a sibling's codes can never be silently invalidated.

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::aliases::LevelIndex;
use crate::enums::shape_dim::ShapeDim;
use crate::traits::concatenate::Concatenate;
use crate::traits::masked::Masked;
use crate::traits::print::{Print, MAX_PREVIEW};
use crate::traits::selection::{DataSelector, Selection};
use crate::traits::shape::Shape;
use crate::traits::type_unions::Element;
use crate::{Codes, NaArray, NapoolError, Pool};

const MISSING_HASH_TAG: u8 = 0;
const PRESENT_HASH_TAG: u8 = 1;

/// # PooledArray
///
/// Dictionary-encoded array: per-element reference codes plus a shared
/// pool of distinct values.
///
/// ### Fields
/// - `codes`: runtime-width code buffer; `0` = missing, otherwise a
///   1-based level index into `pool`.
/// - `pool`: shared dictionary of distinct values.
///
/// ## Example
/// ```rust
/// use napool::{Masked, PooledArray};
///
/// let arr = PooledArray::from_values(
///     ["apple", "banana", "apple", "cherry"].map(Some),
/// );
/// assert_eq!(arr.len(), 4);
/// assert_eq!(arr.levels(), &["apple", "banana", "cherry"]);
/// assert_eq!(arr.codes.to_vec(), vec![1, 2, 1, 3]);
/// assert_eq!(arr.get(2), Some("apple"));
/// ```
#[derive(Debug, Clone)]
pub struct PooledArray<T> {
    /// Reference codes (0 = missing; nonzero = 1-based level index).
    pub codes: Codes,
    /// Shared dictionary of distinct values.
    pub pool: Arc<Pool<T>>,
}

impl<T: Element> PooledArray<T> {
    /// Constructs a pooled array from explicit (pool, codes) parts.
    ///
    /// Every nonzero code is validated against the pool length, and the
    /// codes buffer is widened if its width cannot address the pool.
    pub fn from_parts(pool: Pool<T>, mut codes: Codes) -> Result<Self, NapoolError> {
        codes.ensure_fits(pool.len());
        for i in 0..codes.len() {
            let code = codes.get(i);
            if code > pool.len() {
                return Err(NapoolError::IndexOutOfBounds {
                    index: code,
                    len: pool.len(),
                });
            }
        }
        Ok(Self {
            codes,
            pool: Arc::new(pool),
        })
    }

    /// Builds a pooled array by scanning an `Option` sequence: each distinct
    /// value is pooled on first sight, `None` becomes code `0`.
    pub fn from_values<I: IntoIterator<Item = Option<T>>>(values: I) -> Self {
        let iter = values.into_iter();
        let mut pool = Pool::new();
        let mut codes = Codes::with_capacity(iter.size_hint().0);

        for value in iter {
            match value {
                None => codes.push(0),
                Some(v) => {
                    let code = match pool.index_of(&v) {
                        Some(c) => c,
                        None => {
                            // Widen before the insert so the code for the
                            // new level is representable.
                            codes.ensure_fits(pool.len() + 1);
                            pool.get_or_insert(v)
                        }
                    };
                    codes.push(code);
                }
            }
        }

        Self {
            codes,
            pool: Arc::new(pool),
        }
    }

    /// Builds from a plain slice; every element present.
    pub fn from_slice(values: &[T]) -> Self {
        Self::from_values(values.iter().cloned().map(Some))
    }

    /// Builds from a dense null-aware array.
    pub fn from_na_array(array: &NaArray<T>) -> Self {
        Self::from_values(array.iter_opt())
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns true if the array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Returns the shared pool.
    #[inline]
    pub fn pool(&self) -> &Pool<T> {
        &self.pool
    }

    /// Returns the pool's level sequence.
    #[inline]
    pub fn levels(&self) -> &[T] {
        self.pool.levels()
    }

    /// Returns the raw code buffer (`0` meaning missing), for grouping and
    /// aggregation consumers. No pool copy involved.
    #[inline]
    pub fn indices(&self) -> &Codes {
        &self.codes
    }

    /// Returns the 1-based pool position of `value`, or `None` if it is not
    /// a level of this array's pool. Never errors.
    #[inline]
    pub fn level_to_index(&self, value: &T) -> Option<LevelIndex> {
        self.pool.index_of(value)
    }

    /// Returns the level at 1-based pool position `index`, bounds-checked.
    #[inline]
    pub fn index_to_level(&self, index: LevelIndex) -> Result<&T, NapoolError> {
        self.pool.level(index)
    }

    /// Returns a reference to the value at `idx`, or `None` if missing.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    #[inline]
    pub fn get_ref(&self, idx: usize) -> Option<&T> {
        let code = self.codes.get(idx);
        if code == 0 {
            return None;
        }
        Some(&self.pool.levels()[code - 1])
    }

    /// Appends a value, pooling it on first sight; `None` appends a missing
    /// element. Promotes the code width if the pool outgrows it.
    pub fn push(&mut self, value: Option<T>) {
        let code = self.encode(value);
        self.codes.push(code);
    }

    /// Stores a value at `idx` (pooling it on first sight) or marks the
    /// element missing. Indexed assignment counterpart of `push`.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    pub fn set(&mut self, idx: usize, value: Option<T>) {
        let code = self.encode(value);
        self.codes.set(idx, code);
    }

    // Resolves a value to its code, growing the (possibly shared) pool via
    // copy-on-write and widening the codes buffer first when needed.
    fn encode(&mut self, value: Option<T>) -> LevelIndex {
        match value {
            None => 0,
            Some(v) => match self.pool.index_of(&v) {
                Some(c) => c,
                None => {
                    self.codes.ensure_fits(self.pool.len() + 1);
                    Arc::make_mut(&mut self.pool).get_or_insert(v)
                }
            },
        }
    }

    /// Rebuilds the array so the pool contains only the levels actually
    /// referenced by at least one code.
    ///
    /// Referenced levels keep their relative order; codes are renumbered
    /// and stored at the narrowest width for the compacted pool.
    pub fn compact(&self) -> Self {
        let n_levels = self.pool.len();
        let mut referenced = vec![false; n_levels + 1];
        for code in self.codes.iter() {
            referenced[code] = true;
        }

        let mut kept = Pool::with_capacity(n_levels);
        let mut remap = vec![0usize; n_levels + 1];
        for (pos, level) in self.pool.iter().enumerate() {
            let old_code = pos + 1;
            if referenced[old_code] {
                remap[old_code] = kept.get_or_insert(level.clone());
            }
        }

        let new_codes: Vec<usize> = self.codes.iter().map(|c| remap[c]).collect();
        let codes = Codes::from_usizes(&new_codes, kept.len());
        Self {
            codes,
            pool: Arc::new(kept),
        }
    }

    /// Rebuilds the array with its pool in the caller-specified order.
    ///
    /// `new_order` must be an exact permutation of the current level set;
    /// anything else is an `InvalidLevels` error and leaves `self`
    /// untouched. Codes are remapped through the old-to-new position
    /// lookup, so every element's decoded value is unchanged.
    pub fn reorder(&self, new_order: &[T]) -> Result<Self, NapoolError> {
        if new_order.len() != self.pool.len() {
            return Err(NapoolError::InvalidLevels {
                reason: format!(
                    "reorder expects {} levels, got {}",
                    self.pool.len(),
                    new_order.len()
                ),
            });
        }
        // Duplicate detection comes with the pool build.
        let reordered = Pool::from_levels(new_order.to_vec())?;
        for level in self.pool.iter() {
            if !reordered.contains(level) {
                return Err(NapoolError::InvalidLevels {
                    reason: format!("level {:?} absent from reorder set", level),
                });
            }
        }

        // Old code -> new code through the value lookup.
        let mut remap = vec![0usize; self.pool.len() + 1];
        for (pos, level) in self.pool.iter().enumerate() {
            remap[pos + 1] = reordered
                .index_of(level)
                .expect("checked above: exact permutation");
        }

        let new_codes: Vec<usize> = self.codes.iter().map(|c| remap[c]).collect();
        let codes = Codes::from_usizes(&new_codes, reordered.len());
        Ok(Self {
            codes,
            pool: Arc::new(reordered),
        })
    }

    /// Rebuilds the array with pool entries renamed positionally: position
    /// `i`'s label becomes `labels[i]` while every code is preserved
    /// unchanged. This changes what a code denotes without touching which
    /// elements share a code.
    ///
    /// A replacement sequence of mismatched length, or one containing
    /// duplicates, is an `InvalidLevels` error and leaves `self` untouched.
    pub fn set_levels(&self, labels: &[T]) -> Result<Self, NapoolError> {
        if labels.len() != self.pool.len() {
            return Err(NapoolError::InvalidLevels {
                reason: format!(
                    "relabel expects {} labels, got {}",
                    self.pool.len(),
                    labels.len()
                ),
            });
        }
        let relabelled = Pool::from_levels(labels.to_vec())?;
        Ok(Self {
            codes: self.codes.clone(),
            pool: Arc::new(relabelled),
        })
    }

    /// Selects elements through a normalized selector, like
    /// [`NaArray::take`]. The result shares this array's pool.
    pub fn take<S: DataSelector>(&self, selector: S) -> Result<Self, NapoolError> {
        let indices = match selector.normalize(self.len())? {
            Selection::Point(i) => vec![i],
            Selection::Points(v) => v,
            Selection::Mask(m) => m.iter_set().collect(),
        };
        Ok(Self {
            codes: self.codes.gather(&indices),
            pool: Arc::clone(&self.pool),
        })
    }
}

impl<T: Element + Default> PooledArray<T> {
    /// Materialises the array as a dense [`NaArray`], cloning each decoded
    /// level.
    pub fn to_na_array(&self) -> NaArray<T> {
        NaArray::from_options(self.iter_opt())
    }
}

impl<T: Element> Masked for PooledArray<T> {
    type Value = T;

    #[inline]
    fn len(&self) -> usize {
        self.codes.len()
    }

    /// Retrieves the decoded value at the given index, or `None` if
    /// missing.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    #[inline]
    fn get(&self, idx: usize) -> Option<T> {
        self.get_ref(idx).cloned()
    }

    #[inline]
    fn is_missing(&self, idx: usize) -> bool {
        self.codes.get(idx) == 0
    }

    fn any_missing(&self) -> bool {
        self.codes.iter().any(|c| c == 0)
    }

    fn all_missing(&self) -> bool {
        self.codes.iter().all(|c| c == 0)
    }

    fn missing_count(&self) -> usize {
        self.codes.iter().filter(|&c| c == 0).count()
    }
}

/// Structural equality by decoded values: two pooled arrays are equal when
/// their decoded element sequences are, regardless of pool order or code
/// width.
impl<T: Element> PartialEq for PooledArray<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        // Same pool instance: codes decide directly.
        if Arc::ptr_eq(&self.pool, &other.pool) {
            return self.codes == other.codes;
        }
        (0..self.len()).all(|i| self.get_ref(i) == other.get_ref(i))
    }
}

impl<T: Element> Eq for PooledArray<T> {}

/// Hash matches [`NaArray`]'s scheme (shape, then a tagged per-element
/// fold) and is therefore consistent with decoded-value equality.
impl<T: Element + Hash> Hash for PooledArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for i in 0..self.len() {
            match self.get_ref(i) {
                None => state.write_u8(MISSING_HASH_TAG),
                Some(v) => {
                    state.write_u8(PRESENT_HASH_TAG);
                    v.hash(state);
                }
            }
        }
    }
}

impl<T> Shape for PooledArray<T> {
    fn shape(&self) -> ShapeDim {
        ShapeDim::Rank1(self.codes.len())
    }
}

impl<T: Element> Concatenate for PooledArray<T> {
    /// Concatenation aligns both arrays onto one shared pool, then appends
    /// the re-encoded codes.
    fn concat(self, other: Self) -> Result<Self, NapoolError> {
        let (mut left, right) = crate::kernels::align::align(&self, &other);
        left.codes.extend_from_codes(&right.codes);
        Ok(left)
    }
}

impl<T: Element + Display> Display for PooledArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let len = self.len();
        let missing = self.missing_count();
        let pool_size = self.pool.len();

        writeln!(
            f,
            "PooledArray [{} values] (missing: {}, pool size: {}, code width: {})",
            len,
            missing,
            pool_size,
            self.codes.width()
        )?;

        write!(f, "[")?;
        for i in 0..usize::min(len, MAX_PREVIEW) {
            if i > 0 {
                write!(f, ", ")?;
            }
            match self.get_ref(i) {
                Some(v) => write!(f, "{}", v)?,
                None => write!(f, "NA")?,
            }
        }
        if len > MAX_PREVIEW {
            write!(f, ", … ({} total)", len)?;
        }
        write!(f, "]")
    }
}

impl<T: Element + Display> Print for PooledArray<T> {}

#[cfg(feature = "parallel_proc")]
mod parallel {
    use rayon::prelude::*;

    use super::{Element, Masked, PooledArray};

    impl<T: Element + Send + Sync> PooledArray<T> {
        /// Parallel iterator over decoded `Option<T>` values.
        #[inline]
        pub fn par_iter_opt(&self) -> impl ParallelIterator<Item = Option<T>> + '_ {
            (0..self.len()).into_par_iter().map(move |i| self.get(i))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CodeWidth;

    #[test]
    fn dictionary_build_from_values() {
        let arr = PooledArray::from_values(vec![
            Some("b"),
            None,
            Some("a"),
            Some("b"),
        ]);
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.levels(), &["b", "a"]);
        assert_eq!(arr.codes.to_vec(), vec![1, 0, 2, 1]);
        assert_eq!(arr.get(0), Some("b"));
        assert_eq!(arr.get(1), None);
        assert!(arr.is_missing(1));
        assert_eq!(arr.missing_count(), 1);
    }

    #[test]
    fn level_index_roundtrip() {
        let arr = PooledArray::from_slice(&["x", "y", "z", "y"]);
        for v in ["x", "y", "z"] {
            let idx = arr.level_to_index(&v).unwrap();
            assert_eq!(arr.index_to_level(idx).unwrap(), &v);
        }
        assert_eq!(arr.level_to_index(&"w"), None);
        assert!(arr.index_to_level(0).is_err());
        assert!(arr.index_to_level(4).is_err());
    }

    #[test]
    fn code_width_promotion_keeps_levels_addressable() {
        // 300 distinct levels exceed u8's 255 addressable levels.
        let values: Vec<Option<u32>> = (0..300).map(Some).collect();
        let arr = PooledArray::from_values(values);
        assert_eq!(arr.codes.width(), CodeWidth::U16);
        assert_eq!(arr.pool.len(), 300);
        for v in 0..300u32 {
            let idx = arr.level_to_index(&v).unwrap();
            assert_eq!(arr.index_to_level(idx).unwrap(), &v);
            assert_eq!(arr.get(v as usize), Some(v));
        }
    }

    #[test]
    fn push_promotes_across_the_u8_boundary() {
        let mut arr = PooledArray::from_values((0..255u32).map(Some));
        assert_eq!(arr.codes.width(), CodeWidth::U8);

        // The next unseen value forces a 256th level.
        arr.push(Some(999));
        assert_eq!(arr.codes.width(), CodeWidth::U16);
        assert_eq!(arr.get(255), Some(999));
        // Previously inserted codes survived the promotion.
        assert_eq!(arr.get(0), Some(0));
        assert_eq!(arr.level_to_index(&42), Some(43));
    }

    #[test]
    fn set_updates_code_and_pools_new_values() {
        let mut arr = PooledArray::from_slice(&["a", "b"]);
        arr.set(0, Some("c"));
        assert_eq!(arr.get(0), Some("c"));
        assert_eq!(arr.levels(), &["a", "b", "c"]);
        arr.set(1, None);
        assert!(arr.is_missing(1));
    }

    #[test]
    fn pool_growth_copies_when_aliased() {
        let arr = PooledArray::from_slice(&["a", "b"]);
        let sibling = arr.take(0..2).unwrap(); // shares the pool
        assert!(Arc::ptr_eq(&arr.pool, &sibling.pool));

        let mut grown = sibling.clone();
        grown.push(Some("c"));
        // The original pools are untouched by the sibling's growth.
        assert_eq!(arr.pool.len(), 2);
        assert_eq!(sibling.pool.len(), 2);
        assert_eq!(grown.pool.len(), 3);
    }

    #[test]
    fn compact_drops_unreferenced_levels() {
        // Pool [a, b, c] with codes touching only a and c.
        let pool = Pool::from_levels(vec!["a", "b", "c"]).unwrap();
        let codes = Codes::from_usizes(&[1, 3, 1, 0], 3);
        let arr = PooledArray::from_parts(pool, codes).unwrap();

        let compacted = arr.compact();
        assert_eq!(compacted.levels(), &["a", "c"]);
        assert_eq!(compacted.codes.to_vec(), vec![1, 2, 1, 0]);
        // Decoded values unchanged.
        for i in 0..arr.len() {
            assert_eq!(arr.get_ref(i), compacted.get_ref(i));
        }
    }

    #[test]
    fn reorder_remaps_codes_only() {
        let arr = PooledArray::from_slice(&["a", "b", "c", "a"]);
        let reordered = arr.reorder(&["c", "a", "b"]).unwrap();
        assert_eq!(reordered.levels(), &["c", "a", "b"]);
        assert_eq!(reordered.codes.to_vec(), vec![2, 3, 1, 2]);
        for i in 0..arr.len() {
            assert_eq!(arr.get_ref(i), reordered.get_ref(i));
        }
    }

    #[test]
    fn reorder_rejects_non_permutations() {
        let arr = PooledArray::from_slice(&["a", "b"]);
        // Wrong length.
        assert!(arr.reorder(&["a"]).is_err());
        // Right length, wrong values.
        assert!(arr.reorder(&["a", "x"]).is_err());
        // Duplicates.
        assert!(arr.reorder(&["a", "a"]).is_err());
        // Original untouched in every case.
        assert_eq!(arr.levels(), &["a", "b"]);
    }

    #[test]
    fn relabel_preserves_codes() {
        let arr = PooledArray::from_slice(&["lo", "hi", "lo"]);
        let relabelled = arr.set_levels(&["low", "high"]).unwrap();
        assert_eq!(relabelled.codes, arr.codes);
        assert_eq!(relabelled.get(0), Some("low"));
        assert_eq!(relabelled.get(1), Some("high"));
        assert_eq!(relabelled.get(2), Some("low"));

        assert!(arr.set_levels(&["only"]).is_err());
        assert!(arr.set_levels(&["same", "same"]).is_err());
    }

    #[test]
    fn from_parts_validates_codes() {
        let pool = Pool::from_levels(vec!["a"]).unwrap();
        let codes = Codes::from_usizes(&[1, 2], 2);
        assert!(matches!(
            PooledArray::from_parts(pool, codes),
            Err(NapoolError::IndexOutOfBounds { index: 2, len: 1 })
        ));
    }

    #[test]
    fn equality_by_decoded_values() {
        let a = PooledArray::from_values(vec![Some("x"), None, Some("y")]);
        // Same content, different pool order.
        let b = PooledArray::from_values(vec![Some("x"), None, Some("y")])
            .reorder(&["y", "x"])
            .unwrap();
        assert_ne!(a.levels(), b.levels());
        assert_eq!(a, b);

        let c = PooledArray::from_values(vec![Some("x"), Some("x"), Some("y")]);
        assert_ne!(a, c);
    }

    #[test]
    fn masked_contract_matches_dense() {
        let arr = PooledArray::from_values(vec![Some(1), None, Some(2), Some(1)]);
        assert_eq!(arr.to_dense().unwrap_err(), NapoolError::MissingValue { index: 1 });
        assert_eq!(arr.to_compact(), vec![1, 2, 1]);
        assert_eq!(arr.to_filled(0), vec![1, 0, 2, 1]);
        assert!(arr.any_missing());
        assert!(!arr.all_missing());

        let gone = PooledArray::<i32>::from_values(vec![None, None]);
        assert!(gone.all_missing());
        assert_eq!(gone.iter_present().next(), None);
    }

    #[test]
    fn take_shares_pool() {
        let arr = PooledArray::from_slice(&["a", "b", "a", "c"]);
        let taken = arr.take(vec![2, 3]).unwrap();
        assert!(Arc::ptr_eq(&arr.pool, &taken.pool));
        assert_eq!(taken.get(0), Some("a"));
        assert_eq!(taken.get(1), Some("c"));
    }

    #[test]
    fn to_na_array_roundtrip() {
        let values = vec![Some(3), None, Some(5)];
        let arr = PooledArray::from_values(values.clone());
        let dense = arr.to_na_array();
        assert_eq!(dense.iter_opt().collect::<Vec<_>>(), values);
    }
}
