pub mod enums {
    pub mod codes;
    pub mod error;
    pub mod shape_dim;
}

pub mod structs {
    pub mod variants {
        pub mod dense;
        pub mod pooled;
    }
    pub mod bitmask;
    pub mod matrix;
    pub mod pool;
}

pub mod kernels {
    pub mod align;
    pub mod sort;
}

pub mod traits {
    pub mod concatenate;
    pub mod masked;
    pub mod print;
    pub mod selection;
    pub mod shape;
    pub mod type_unions;
}

pub mod aliases;
pub mod macros;
pub mod utils;

pub use aliases::{Length, LevelIndex, NaArr, Offset, PoolArr};
pub use enums::codes::{CodeWidth, Codes};
pub use enums::error::NapoolError;
pub use enums::shape_dim::ShapeDim;
pub use kernels::align::{align, align_values};
pub use kernels::sort::{argsort, sort, MissingOrder, SortOptions};
pub use structs::bitmask::Bitmask;
pub use structs::matrix::NaMatrix;
pub use structs::pool::Pool;
pub use structs::variants::dense::NaArray;
pub use structs::variants::pooled::PooledArray;
pub use traits::concatenate::Concatenate;
pub use traits::masked::Masked;
pub use traits::print::Print;
pub use traits::selection::{DataSelector, Selection};
pub use traits::shape::Shape;
pub use traits::type_unions::{Element, Integer};
