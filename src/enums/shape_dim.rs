//! # ShapeDim Enum Module
//!
//! Companion to [crate::traits::shape::Shape];
//!
//! Contains all supported `Shape` variants.

use crate::traits::shape::Shape;

/// Dimensional rank for any Napool container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeDim {
    /// Array element count
    Rank1(usize),

    /// Matrix with row/column counts.
    Rank2 { rows: usize, cols: usize },
}

/// Implement `Shape` for `ShapeDim` so it can stand in for the container
/// it describes.
impl Shape for ShapeDim {
    fn shape(&self) -> ShapeDim {
        self.clone()
    }
}
