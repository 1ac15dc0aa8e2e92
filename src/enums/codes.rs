//! # **Codes Module** - *Runtime-Width Reference-Code Buffer*
//!
//! Storage for the per-element reference codes of a [`crate::PooledArray`].
//!
//! Each entry is either `0` (the reserved missing marker) or a 1-based level
//! index into the array's shared [`crate::Pool`]. The physical integer width
//! is chosen at runtime: a pool with few levels keeps its codes in `u8`,
//! and the buffer is promoted to the next wider unsigned type whenever the
//! pool outgrows the current width.
//!
//! ## Behaviour
//! - Promotion is "allocate wider buffer, bulk-copy, swap" - codes are
//!   zero-extended, values preserved. Width never shrinks implicitly.
//! - [`Codes::ensure_fits`] is the promotion hook: callers invoke it before
//!   an insert that could exceed the current width's addressable level count.

use std::fmt::{Display, Formatter};

use crate::traits::type_unions::Integer;

/// Physical storage width of a codes buffer.
///
/// The addressable level count per width excludes code `0`, which is
/// reserved for missing: `U8` addresses pools of up to 255 levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CodeWidth {
    U8,
    U16,
    U32,
    U64,
}

impl CodeWidth {
    /// Width every freshly built codes buffer starts at.
    pub const DEFAULT: CodeWidth = CodeWidth::U8;

    /// Largest pool length addressable at this width, accounting for the
    /// reserved `0` code.
    #[inline]
    pub fn max_levels(self) -> usize {
        match self {
            CodeWidth::U8 => u8::MAX as usize,
            CodeWidth::U16 => u16::MAX as usize,
            CodeWidth::U32 => u32::MAX as usize,
            CodeWidth::U64 => u64::MAX as usize,
        }
    }

    /// Narrowest width able to address a pool of `n_levels` levels.
    #[inline]
    pub fn for_levels(n_levels: usize) -> CodeWidth {
        if n_levels <= CodeWidth::U8.max_levels() {
            CodeWidth::U8
        } else if n_levels <= CodeWidth::U16.max_levels() {
            CodeWidth::U16
        } else if n_levels <= CodeWidth::U32.max_levels() {
            CodeWidth::U32
        } else {
            CodeWidth::U64
        }
    }
}

impl Display for CodeWidth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeWidth::U8 => write!(f, "u8"),
            CodeWidth::U16 => write!(f, "u16"),
            CodeWidth::U32 => write!(f, "u32"),
            CodeWidth::U64 => write!(f, "u64"),
        }
    }
}

// Promotion copy: widen every code losslessly into the destination type.
#[inline]
fn zero_extend<S: Integer, D: Integer>(src: &[S]) -> Vec<D> {
    src.iter().map(|&c| D::from_usize(c.to_usize())).collect()
}

/// # Codes
///
/// Dense buffer of reference codes with runtime-selected integer width.
///
/// ### Description
/// - Entry `0` denotes a missing element; a nonzero entry is a 1-based
///   level index into the owning array's pool.
/// - The active variant is the narrowest unsigned width whose maximum value
///   is at least the pool length; [`Codes::ensure_fits`] promotes it as the
///   pool grows.
///
/// ## Example
/// ```rust
/// use napool::{CodeWidth, Codes};
///
/// let mut codes = Codes::new();
/// codes.push(1);
/// codes.push(0); // missing
/// assert_eq!(codes.width(), CodeWidth::U8);
///
/// codes.ensure_fits(300);
/// assert_eq!(codes.width(), CodeWidth::U16);
/// assert_eq!(codes.get(0), 1); // values preserved across promotion
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Codes {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
}

impl Default for Codes {
    fn default() -> Self {
        Codes::U8(Vec::new())
    }
}

impl Codes {
    /// Constructs an empty codes buffer at the default width.
    #[inline]
    pub fn new() -> Self {
        Codes::default()
    }

    /// Constructs an empty buffer at the default width with reserved capacity.
    #[inline]
    pub fn with_capacity(n: usize) -> Self {
        Codes::U8(Vec::with_capacity(n))
    }

    /// Builds a buffer from plain codes at the narrowest width able to
    /// address a pool of `n_levels` levels.
    ///
    /// # Panics
    /// Panics if any code exceeds `n_levels`.
    pub fn from_usizes(codes: &[usize], n_levels: usize) -> Self {
        let width = CodeWidth::for_levels(n_levels);
        for &c in codes {
            assert!(
                c <= n_levels,
                "code {} exceeds pool length {}",
                c,
                n_levels
            );
        }
        match width {
            CodeWidth::U8 => Codes::U8(codes.iter().map(|&c| c as u8).collect()),
            CodeWidth::U16 => Codes::U16(codes.iter().map(|&c| c as u16).collect()),
            CodeWidth::U32 => Codes::U32(codes.iter().map(|&c| c as u32).collect()),
            CodeWidth::U64 => Codes::U64(codes.iter().map(|&c| c as u64).collect()),
        }
    }

    /// Returns the number of codes.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Codes::U8(v) => v.len(),
            Codes::U16(v) => v.len(),
            Codes::U32(v) => v.len(),
            Codes::U64(v) => v.len(),
        }
    }

    /// Returns true if the buffer holds no codes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the active storage width.
    #[inline]
    pub fn width(&self) -> CodeWidth {
        match self {
            Codes::U8(_) => CodeWidth::U8,
            Codes::U16(_) => CodeWidth::U16,
            Codes::U32(_) => CodeWidth::U32,
            Codes::U64(_) => CodeWidth::U64,
        }
    }

    /// Returns the code at `idx` as a plain `usize`.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    #[inline]
    pub fn get(&self, idx: usize) -> usize {
        match self {
            Codes::U8(v) => v[idx].to_usize(),
            Codes::U16(v) => v[idx].to_usize(),
            Codes::U32(v) => v[idx].to_usize(),
            Codes::U64(v) => v[idx].to_usize(),
        }
    }

    /// Writes `code` at `idx`.
    ///
    /// # Panics
    /// Panics if `idx` is out of bounds or `code` is not representable at
    /// the current width. Callers widen first via [`Codes::ensure_fits`].
    #[inline]
    pub fn set(&mut self, idx: usize, code: usize) {
        assert!(
            code <= self.width().max_levels(),
            "code {} not representable at width {}",
            code,
            self.width()
        );
        match self {
            Codes::U8(v) => v[idx] = code as u8,
            Codes::U16(v) => v[idx] = code as u16,
            Codes::U32(v) => v[idx] = code as u32,
            Codes::U64(v) => v[idx] = code as u64,
        }
    }

    /// Appends `code`.
    ///
    /// # Panics
    /// Panics if `code` is not representable at the current width.
    #[inline]
    pub fn push(&mut self, code: usize) {
        assert!(
            code <= self.width().max_levels(),
            "code {} not representable at width {}",
            code,
            self.width()
        );
        match self {
            Codes::U8(v) => v.push(code as u8),
            Codes::U16(v) => v.push(code as u16),
            Codes::U32(v) => v.push(code as u32),
            Codes::U64(v) => v.push(code as u64),
        }
    }

    /// Promotes the buffer so codes for a pool of `n_levels` levels fit.
    ///
    /// No-op when the current width already suffices; otherwise the codes
    /// are copied zero-extended into the narrowest adequate width.
    pub fn ensure_fits(&mut self, n_levels: usize) {
        if n_levels <= self.width().max_levels() {
            return;
        }
        let target = CodeWidth::for_levels(n_levels);
        let widened = match (&*self, target) {
            (Codes::U8(v), CodeWidth::U16) => Codes::U16(zero_extend(v)),
            (Codes::U8(v), CodeWidth::U32) => Codes::U32(zero_extend(v)),
            (Codes::U8(v), CodeWidth::U64) => Codes::U64(zero_extend(v)),
            (Codes::U16(v), CodeWidth::U32) => Codes::U32(zero_extend(v)),
            (Codes::U16(v), CodeWidth::U64) => Codes::U64(zero_extend(v)),
            (Codes::U32(v), CodeWidth::U64) => Codes::U64(zero_extend(v)),
            // Guarded above: target is wider than the current width.
            _ => unreachable!("ensure_fits: width never shrinks"),
        };
        *self = widened;
    }

    /// Gathers codes at `indices` into a new buffer of the same width.
    ///
    /// # Panics
    /// Panics if any index is out of bounds.
    pub fn gather(&self, indices: &[usize]) -> Codes {
        match self {
            Codes::U8(v) => Codes::U8(indices.iter().map(|&i| v[i]).collect()),
            Codes::U16(v) => Codes::U16(indices.iter().map(|&i| v[i]).collect()),
            Codes::U32(v) => Codes::U32(indices.iter().map(|&i| v[i]).collect()),
            Codes::U64(v) => Codes::U64(indices.iter().map(|&i| v[i]).collect()),
        }
    }

    /// Appends every code from `other`, widening first if `other` carries a
    /// wider width.
    pub fn extend_from_codes(&mut self, other: &Codes) {
        // Widening to the source width is sufficient: every appended code
        // was representable there.
        self.ensure_fits(other.width().max_levels());
        for i in 0..other.len() {
            self.push(other.get(i));
        }
    }

    /// Returns an iterator of plain `usize` codes.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// Materialises the codes as a plain `Vec<usize>`.
    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_selection() {
        assert_eq!(CodeWidth::for_levels(0), CodeWidth::U8);
        assert_eq!(CodeWidth::for_levels(255), CodeWidth::U8);
        assert_eq!(CodeWidth::for_levels(256), CodeWidth::U16);
        assert_eq!(CodeWidth::for_levels(65_535), CodeWidth::U16);
        assert_eq!(CodeWidth::for_levels(65_536), CodeWidth::U32);
    }

    #[test]
    fn push_get_roundtrip() {
        let mut codes = Codes::new();
        codes.push(0);
        codes.push(3);
        codes.push(255);
        assert_eq!(codes.len(), 3);
        assert_eq!(codes.get(0), 0);
        assert_eq!(codes.get(1), 3);
        assert_eq!(codes.get(2), 255);
    }

    #[test]
    fn promotion_preserves_codes() {
        let mut codes = Codes::new();
        for c in 0..=255usize {
            codes.push(c);
        }
        assert_eq!(codes.width(), CodeWidth::U8);

        codes.ensure_fits(256);
        assert_eq!(codes.width(), CodeWidth::U16);
        for c in 0..=255usize {
            assert_eq!(codes.get(c), c);
        }
        codes.push(256);
        assert_eq!(codes.get(256), 256);
    }

    #[test]
    fn promotion_is_monotonic() {
        let mut codes = Codes::from_usizes(&[1, 2], 300);
        assert_eq!(codes.width(), CodeWidth::U16);
        // A smaller pool never narrows the buffer.
        codes.ensure_fits(2);
        assert_eq!(codes.width(), CodeWidth::U16);
    }

    #[test]
    #[should_panic(expected = "not representable")]
    fn push_beyond_width_panics() {
        let mut codes = Codes::new();
        codes.push(256);
    }

    #[test]
    fn gather_keeps_width() {
        let codes = Codes::from_usizes(&[1, 0, 2, 2], 2);
        let taken = codes.gather(&[3, 0]);
        assert_eq!(taken.width(), CodeWidth::U8);
        assert_eq!(taken.to_vec(), vec![2, 1]);
    }

    #[test]
    fn extend_from_wider_codes() {
        let mut a = Codes::from_usizes(&[1, 2], 2);
        let b = Codes::from_usizes(&[300, 0], 300);
        a.extend_from_codes(&b);
        assert_eq!(a.width(), CodeWidth::U16);
        assert_eq!(a.to_vec(), vec![1, 2, 300, 0]);
    }
}
