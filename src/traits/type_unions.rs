use std::fmt::Debug;
use std::hash::Hash;

use num_traits::{PrimInt, ToPrimitive};

use crate::impl_usize_conversions;

/// Trait for unsigned types valid as physical code storage in a
/// [`crate::Codes`] buffer.
///
/// Extends and constrains the *num-traits* `PrimInt` implementation to fit
/// the crate's type universe.
pub trait Integer:
    PrimInt
    + TryFrom<usize>
    + Default
    + Debug
    + ToPrimitive
    + 'static
{
    /// Lossless cast to `usize`
    fn to_usize(self) -> usize;

    /// Lossless cast from `usize`
    fn from_usize(v: usize) -> Self;
}

impl_usize_conversions!(u8, u16, u32, u64);

/// Trait for types valid as pool levels and pooled-array elements.
///
/// `Eq + Hash` is what the dictionary-build lookup requires; floats do not
/// qualify and stay in dense [`crate::NaArray`] form.
pub trait Element: Clone + Eq + Hash + Debug + 'static {}

impl<T: Clone + Eq + Hash + Debug + 'static> Element for T {}
