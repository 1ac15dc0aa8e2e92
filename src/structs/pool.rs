//! # **Pool Module** - *Dictionary Pool of Distinct Levels*
//!
//! The ordered, duplicate-free value collection underlying a
//! [`crate::PooledArray`], with a value-to-position lookup kept consistent
//! with the level sequence.
//!
//! ## Behaviour
//! - Level positions are 1-based: position 0 is reserved in code buffers to
//!   mean missing and never appears in a pool.
//! - [`Pool::get_or_insert`] is the single growth primitive; rebuilds
//!   (compaction, reorder, relabel) construct a fresh pool instead of
//!   mutating level identities in place.

use crate::aliases::LevelIndex;
use crate::traits::type_unions::Element;
use crate::NapoolError;

#[cfg(feature = "fast_hash")]
type LevelMap<K, V> = ahash::AHashMap<K, V>;
#[cfg(not(feature = "fast_hash"))]
type LevelMap<K, V> = std::collections::HashMap<K, V>;

/// # Pool
///
/// Ordered, duplicate-free collection of distinct values plus a
/// value-to-position lookup.
///
/// ### Fields
/// - `levels`: distinct values in first-seen (or caller-specified) order.
/// - `lookup`: value -> 1-based level index, kept consistent with `levels`.
///
/// ## Example
/// ```rust
/// use napool::Pool;
///
/// let mut pool = Pool::new();
/// assert_eq!(pool.get_or_insert("a"), 1);
/// assert_eq!(pool.get_or_insert("b"), 2);
/// assert_eq!(pool.get_or_insert("a"), 1); // duplicate insert is a lookup
/// assert_eq!(pool.index_of(&"b"), Some(2));
/// assert_eq!(pool.level(1).unwrap(), &"a");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pool<T> {
    levels: Vec<T>,
    lookup: LevelMap<T, LevelIndex>,
}

impl<T: Element> Pool<T> {
    /// Constructs an empty pool.
    #[inline]
    pub fn new() -> Self {
        Self {
            levels: Vec::new(),
            lookup: LevelMap::default(),
        }
    }

    /// Constructs an empty pool with reserved capacity.
    #[inline]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            levels: Vec::with_capacity(n),
            lookup: LevelMap::default(),
        }
    }

    /// Builds a pool from an explicit level sequence.
    ///
    /// Fails with `InvalidLevels` if the sequence contains duplicates; a
    /// pool is duplicate-free by invariant.
    pub fn from_levels(levels: Vec<T>) -> Result<Self, NapoolError> {
        let mut pool = Self::with_capacity(levels.len());
        for level in levels {
            if pool.lookup.contains_key(&level) {
                return Err(NapoolError::InvalidLevels {
                    reason: format!("duplicate level {:?}", level),
                });
            }
            pool.lookup.insert(level.clone(), pool.levels.len() + 1);
            pool.levels.push(level);
        }
        Ok(pool)
    }

    /// Returns the number of levels.
    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns true if the pool holds no levels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the level sequence as a slice.
    #[inline]
    pub fn levels(&self) -> &[T] {
        &self.levels
    }

    /// Returns an iterator over the levels in pool order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.levels.iter()
    }

    /// Looks up `value`, appending it as a new level if absent. Returns the
    /// value's 1-based level index.
    ///
    /// This is the single mutation primitive for pool growth; code-width
    /// promotion in [`crate::PooledArray`] hooks in before calling it.
    #[inline]
    pub fn get_or_insert(&mut self, value: T) -> LevelIndex {
        if let Some(&idx) = self.lookup.get(&value) {
            return idx;
        }
        let idx = self.levels.len() + 1;
        self.lookup.insert(value.clone(), idx);
        self.levels.push(value);
        idx
    }

    /// Returns the 1-based level index of `value`, or `None` if it is not
    /// pooled. Never errors.
    #[inline]
    pub fn index_of(&self, value: &T) -> Option<LevelIndex> {
        self.lookup.get(value).copied()
    }

    /// Returns true if `value` is a level of this pool.
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.lookup.contains_key(value)
    }

    /// Returns the level at 1-based position `index`.
    ///
    /// `0` is the reserved missing marker, not a level, and is reported as
    /// out of bounds like any other invalid position.
    pub fn level(&self, index: LevelIndex) -> Result<&T, NapoolError> {
        if index == 0 || index > self.levels.len() {
            return Err(NapoolError::IndexOutOfBounds {
                index,
                len: self.levels.len(),
            });
        }
        Ok(&self.levels[index - 1])
    }
}

/// Pools compare by level sequence; the lookup is derived state.
impl<T: Element> PartialEq for Pool<T> {
    fn eq(&self, other: &Self) -> bool {
        self.levels == other.levels
    }
}

impl<T: Element> Eq for Pool<T> {}
