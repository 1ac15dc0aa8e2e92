//! # **Selection Traits** - *Normalized element selection*
//!
//! Input types for selecting elements out of the null-aware containers.
//!
//! ## Architecture
//! - **DataSelector**: input types a caller can pass to `take` (a single
//!   index, index slices/vecs, ranges, a boolean `Bitmask`).
//! - **Selection**: the closed set of normalized selection shapes. Every
//!   selector is validated and normalized into one of these variants before
//!   dispatch, so each container implements exactly one handler per shape
//!   rather than one per input type.
//!
//! Missing-aware selectors (a `NaArray<bool>` mask, a missing-aware index
//! vector) are deliberately *not* `DataSelector`s: they go through the
//! explicit `filter_na` / `take_na` entry points on the containers, which
//! document their missing-entry policy.

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

use crate::{Bitmask, NapoolError};

/// Normalized selection shape, produced by [`DataSelector::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// A single position.
    Point(usize),
    /// An explicit position list (duplicates and arbitrary order allowed).
    Points(Vec<usize>),
    /// A keep/drop mask of the same length as the container.
    Mask(Bitmask),
}

/// Trait for types that can specify a data selection.
///
/// `normalize` validates the input against the container length and
/// produces a [`Selection`]; out-of-range positions are an
/// `IndexOutOfBounds` error and a mask of the wrong length is a
/// `ShapeMismatch` error, never a silent clamp.
pub trait DataSelector {
    /// Resolve this selector to a normalized `Selection` for a container
    /// of `len` elements.
    fn normalize(self, len: usize) -> Result<Selection, NapoolError>;
}

#[inline]
fn checked_points(
    indices: impl IntoIterator<Item = usize>,
    len: usize,
) -> Result<Selection, NapoolError> {
    let mut out = Vec::new();
    for idx in indices {
        if idx >= len {
            return Err(NapoolError::IndexOutOfBounds { index: idx, len });
        }
        out.push(idx);
    }
    Ok(Selection::Points(out))
}

/// Single position
impl DataSelector for usize {
    fn normalize(self, len: usize) -> Result<Selection, NapoolError> {
        if self >= len {
            return Err(NapoolError::IndexOutOfBounds { index: self, len });
        }
        Ok(Selection::Point(self))
    }
}

/// Multiple positions
impl DataSelector for &[usize] {
    fn normalize(self, len: usize) -> Result<Selection, NapoolError> {
        checked_points(self.iter().copied(), len)
    }
}

/// Multiple positions (array reference)
impl<const N: usize> DataSelector for &[usize; N] {
    fn normalize(self, len: usize) -> Result<Selection, NapoolError> {
        checked_points(self.iter().copied(), len)
    }
}

/// Multiple positions (Vec)
impl DataSelector for Vec<usize> {
    fn normalize(self, len: usize) -> Result<Selection, NapoolError> {
        checked_points(self, len)
    }
}

/// Range selection
impl DataSelector for Range<usize> {
    fn normalize(self, len: usize) -> Result<Selection, NapoolError> {
        if self.end > len {
            return Err(NapoolError::IndexOutOfBounds {
                index: self.end - 1,
                len,
            });
        }
        Ok(Selection::Points(self.collect()))
    }
}

/// Range from selection
impl DataSelector for RangeFrom<usize> {
    fn normalize(self, len: usize) -> Result<Selection, NapoolError> {
        if self.start > len {
            return Err(NapoolError::IndexOutOfBounds {
                index: self.start,
                len,
            });
        }
        Ok(Selection::Points((self.start..len).collect()))
    }
}

/// Range to selection
impl DataSelector for RangeTo<usize> {
    fn normalize(self, len: usize) -> Result<Selection, NapoolError> {
        (0..self.end).normalize(len)
    }
}

/// Full range selection
impl DataSelector for RangeFull {
    fn normalize(self, len: usize) -> Result<Selection, NapoolError> {
        Ok(Selection::Points((0..len).collect()))
    }
}

/// Inclusive range selection
impl DataSelector for RangeInclusive<usize> {
    fn normalize(self, len: usize) -> Result<Selection, NapoolError> {
        let (start, end) = (*self.start(), *self.end());
        if end >= len {
            return Err(NapoolError::IndexOutOfBounds { index: end, len });
        }
        Ok(Selection::Points((start..=end).collect()))
    }
}

/// Boolean keep/drop mask
impl DataSelector for &Bitmask {
    fn normalize(self, len: usize) -> Result<Selection, NapoolError> {
        if self.len() != len {
            return Err(NapoolError::ShapeMismatch {
                expected: len,
                found: self.len(),
            });
        }
        Ok(Selection::Mask(self.clone()))
    }
}

/// Boolean keep/drop mask (owned)
impl DataSelector for Bitmask {
    fn normalize(self, len: usize) -> Result<Selection, NapoolError> {
        if self.len() != len {
            return Err(NapoolError::ShapeMismatch {
                expected: len,
                found: self.len(),
            });
        }
        Ok(Selection::Mask(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_in_and_out_of_range() {
        assert_eq!(2usize.normalize(3).unwrap(), Selection::Point(2));
        assert!(matches!(
            3usize.normalize(3),
            Err(NapoolError::IndexOutOfBounds { index: 3, len: 3 })
        ));
    }

    #[test]
    fn points_validated() {
        let sel = vec![0usize, 2, 0].normalize(3).unwrap();
        assert_eq!(sel, Selection::Points(vec![0, 2, 0]));
        assert!(vec![0usize, 5].normalize(3).is_err());
    }

    #[test]
    fn ranges_validated() {
        assert_eq!(
            (1..3usize).normalize(4).unwrap(),
            Selection::Points(vec![1, 2])
        );
        assert!((1..5usize).normalize(4).is_err());
        assert_eq!(
            (..).normalize(2).unwrap(),
            Selection::Points(vec![0, 1])
        );
        assert_eq!(
            (1..=2usize).normalize(4).unwrap(),
            Selection::Points(vec![1, 2])
        );
        assert!((2..).normalize(4).is_ok());
        assert!((5..).normalize(4).is_err());
    }

    #[test]
    fn mask_shape_checked() {
        let mask = Bitmask::from_bools(&[true, false, true]);
        assert!(matches!((&mask).normalize(3).unwrap(), Selection::Mask(_)));
        assert!(matches!(
            (&mask).normalize(4),
            Err(NapoolError::ShapeMismatch { .. })
        ));
    }
}
