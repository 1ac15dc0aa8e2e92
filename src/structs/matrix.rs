//! # Matrix Module - *Rank-2 Null-Aware Container*
//!
//! Dense column-major matrix with a same-shape missingness bitmap.
//! Row/column selection composes the single-axis selectors independently
//! per axis.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::enums::shape_dim::ShapeDim;
use crate::traits::selection::{DataSelector, Selection};
use crate::traits::shape::Shape;
use crate::{Bitmask, NaArray, NapoolError};

/// # NaMatrix
///
/// Column-major dense matrix with per-cell missingness.
///
/// ### Properties
/// - `nrows`: Number of rows.
/// - `ncols`: Number of columns.
/// - `data`: Flat buffer in column-major order.
/// - `missing`: bit-packed missingness bitmap over the same flat layout
///   (1 = missing).
///
/// ### Null handling
/// Unlike a plain dense matrix, absent cells are tracked exactly: a cell
/// read returns `None` rather than a sentinel value, so missingness can
/// never be confused with a representable element.
#[derive(Debug, Clone)]
pub struct NaMatrix<T> {
    pub nrows: usize,
    pub ncols: usize,
    pub data: Vec<T>,
    pub missing: Bitmask,
}

impl<T> NaMatrix<T> {
    // Flat position of (row, col) in the column-major buffer.
    #[inline(always)]
    fn flat(&self, row: usize, col: usize) -> usize {
        col * self.nrows + row
    }

    #[inline(always)]
    fn check_bounds(&self, row: usize, col: usize) {
        assert!(row < self.nrows, "NaMatrix: row {} out of bounds", row);
        assert!(col < self.ncols, "NaMatrix: col {} out of bounds", col);
    }

    /// Constructs a matrix from a flat column-major buffer and bitmap.
    ///
    /// Fails fast with `ShapeMismatch` when `data` or `missing` disagree
    /// with `nrows * ncols`.
    pub fn new(
        data: Vec<T>,
        missing: Bitmask,
        nrows: usize,
        ncols: usize,
    ) -> Result<Self, NapoolError> {
        let expected = nrows * ncols;
        if data.len() != expected {
            return Err(NapoolError::ShapeMismatch {
                expected,
                found: data.len(),
            });
        }
        if missing.len() != expected {
            return Err(NapoolError::ShapeMismatch {
                expected,
                found: missing.len(),
            });
        }
        Ok(Self {
            nrows,
            ncols,
            data,
            missing,
        })
    }

    /// Constructs a matrix from a flat column-major buffer; every cell
    /// present.
    pub fn from_flat(data: Vec<T>, nrows: usize, ncols: usize) -> Result<Self, NapoolError> {
        let missing = Bitmask::new_set_all(data.len(), false);
        Self::new(data, missing, nrows, ncols)
    }

    /// Returns the total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the matrix has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nrows == 0 || self.ncols == 0
    }

    /// Returns true if the cell at (row, col) is missing.
    ///
    /// # Panics
    /// Panics if either coordinate is out of range.
    #[inline]
    pub fn is_missing(&self, row: usize, col: usize) -> bool {
        self.check_bounds(row, col);
        self.missing.get(self.flat(row, col))
    }

    /// Marks the cell at (row, col) as missing.
    ///
    /// # Panics
    /// Panics if either coordinate is out of range.
    #[inline]
    pub fn set_missing(&mut self, row: usize, col: usize) {
        self.check_bounds(row, col);
        let i = self.flat(row, col);
        self.missing.set(i, true);
    }

    /// Returns true if at least one cell is missing.
    #[inline]
    pub fn any_missing(&self) -> bool {
        self.missing.any_set()
    }

    /// Returns true if every cell is missing.
    #[inline]
    pub fn all_missing(&self) -> bool {
        self.missing.all_set()
    }

    /// Returns the total number of missing cells.
    #[inline]
    pub fn missing_count(&self) -> usize {
        self.missing.count_ones()
    }
}

impl<T: Clone> NaMatrix<T> {
    /// Returns the value at (row, col), or `None` if the cell is missing.
    /// Both coordinates are validated independently.
    ///
    /// # Panics
    /// Panics if either coordinate is out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        self.check_bounds(row, col);
        let i = self.flat(row, col);
        if self.missing.get(i) {
            return None;
        }
        Some(self.data[i].clone())
    }

    /// Stores `value` at (row, col) and clears the missing bit.
    ///
    /// # Panics
    /// Panics if either coordinate is out of range.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.check_bounds(row, col);
        let i = self.flat(row, col);
        self.data[i] = value;
        self.missing.set(i, false);
    }

    /// Extracts row `row` as an owned [`NaArray`].
    ///
    /// # Panics
    /// Panics if `row` is out of range.
    pub fn row(&self, row: usize) -> NaArray<T> {
        assert!(row < self.nrows, "NaMatrix: row {} out of bounds", row);
        let mut out = NaArray::with_capacity(self.ncols);
        for col in 0..self.ncols {
            let i = self.flat(row, col);
            out.data.push(self.data[i].clone());
            out.missing.push(self.missing.get(i));
        }
        out
    }

    /// Extracts column `col` as an owned [`NaArray`].
    ///
    /// # Panics
    /// Panics if `col` is out of range.
    pub fn col(&self, col: usize) -> NaArray<T> {
        assert!(col < self.ncols, "NaMatrix: col {} out of bounds", col);
        let start = col * self.nrows;
        NaArray {
            data: self.data[start..start + self.nrows].to_vec(),
            missing: self.missing.slice_clone(start, self.nrows),
        }
    }

    /// Selects a sub-matrix; the row and column selectors are normalized
    /// and validated independently per axis.
    pub fn select<R: DataSelector, C: DataSelector>(
        &self,
        rows: R,
        cols: C,
    ) -> Result<Self, NapoolError> {
        let row_idx = resolve_axis(rows, self.nrows)?;
        let col_idx = resolve_axis(cols, self.ncols)?;

        let mut data = Vec::with_capacity(row_idx.len() * col_idx.len());
        let mut missing = Bitmask::with_capacity(row_idx.len() * col_idx.len());
        for &c in &col_idx {
            for &r in &row_idx {
                let i = self.flat(r, c);
                data.push(self.data[i].clone());
                missing.push(self.missing.get(i));
            }
        }
        Self::new(data, missing, row_idx.len(), col_idx.len())
    }
}

impl<T: Clone + Default> NaMatrix<T> {
    /// Constructs an all-missing matrix of the given dimensions. Cell
    /// values hold `T::default()` placeholders that no operation reads.
    pub fn new_missing(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            data: vec![T::default(); nrows * ncols],
            missing: Bitmask::new_set_all(nrows * ncols, true),
        }
    }
}

// Per-axis selector resolution into a plain index list.
fn resolve_axis<S: DataSelector>(selector: S, len: usize) -> Result<Vec<usize>, NapoolError> {
    Ok(match selector.normalize(len)? {
        Selection::Point(i) => vec![i],
        Selection::Points(v) => v,
        Selection::Mask(m) => m.iter_set().collect(),
    })
}

/// Structural equality over shape and present cells; stale values under
/// set mask bits never participate.
impl<T: PartialEq> PartialEq for NaMatrix<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.nrows != other.nrows || self.ncols != other.ncols {
            return false;
        }
        for i in 0..self.data.len() {
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

impl<T: Eq> Eq for NaMatrix<T> {}

/// Hash combines both dimensions with a position-order-sensitive fold over
/// the flat layout; missing cells contribute a fixed stand-in tag.
impl<T: Hash> Hash for NaMatrix<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nrows.hash(state);
        self.ncols.hash(state);
        for i in 0..self.data.len() {
            if self.missing.get(i) {
                state.write_u8(0);
            } else {
                state.write_u8(1);
                self.data[i].hash(state);
            }
        }
    }
}

impl<T> Shape for NaMatrix<T> {
    fn shape(&self) -> ShapeDim {
        ShapeDim::Rank2 {
            rows: self.nrows,
            cols: self.ncols,
        }
    }
}

impl<T: Clone + fmt::Display> fmt::Display for NaMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "NaMatrix [{} x {}] (missing: {})",
            self.nrows,
            self.ncols,
            self.missing_count()
        )
    }
}
