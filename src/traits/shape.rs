//! # Shape Trait Module
//!
//! Unified way to describe the dimensionality "shape" of any container.

use crate::enums::shape_dim::ShapeDim;

/// Shape trait.
///
/// Returns the `ShapeDim` for the receiver.
///
/// Includes accessors for common use cases e.g., shape_1d, shape_2d,
/// which are automatic provided the implementor implements `shape`.
pub trait Shape {
    /// Returns the shape dimension for any data shape
    fn shape(&self) -> ShapeDim;

    /// Returns the first dimension shape
    ///
    /// Exists to bypass a match on `ShapeDim` for array shaped types
    fn shape_1d(&self) -> usize {
        match self.shape() {
            ShapeDim::Rank1(n) => n,
            ShapeDim::Rank2 { rows, .. } => rows,
        }
    }

    /// Returns the first and second dimension shapes
    ///
    /// Exists to bypass a match on `ShapeDim` for matrix shaped types
    fn shape_2d(&self) -> (usize, usize) {
        match self.shape() {
            ShapeDim::Rank1(n) => (n, 1),
            ShapeDim::Rank2 { rows, cols } => (rows, cols),
        }
    }
}
