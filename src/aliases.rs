use crate::{NaArray, PooledArray};

// ----------------- Semantic usize aliases --------------------------------

/// Offset lower bound for a windowed operation (`slice_clone` and friends).
/// Set to `0` for the whole array.
pub type Offset = usize;

/// Logical length of a window.
/// Set to `arr.len()` for the whole array.
pub type Length = usize;

/// 1-based position of a level inside a [`crate::Pool`].
///
/// `0` is never a valid `LevelIndex`: in a codes buffer it is the reserved
/// missing marker.
pub type LevelIndex = usize;

// ----------------- Standard Aliases --------------------------------

// Less syllables

pub type NaArr<T> = NaArray<T>;
pub type PoolArr<T> = PooledArray<T>;
