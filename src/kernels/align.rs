//! # **Alignment Kernels** - *Shared-Pool Re-Encoding*
//!
//! Re-encodes two inputs against one shared pool so equal values map to
//! equal codes across the pair. Grouping and join layers then compare
//! elements by code - `O(1)` equality without repeated value comparisons.
//!
//! The shared pool is the union of distinct values appearing in either
//! input, first input first, in first-seen order. Missing stays excluded
//! from the pool and keeps code `0` in both outputs.

use std::sync::Arc;

use crate::traits::type_unions::Element;
use crate::{Codes, Pool, PooledArray};

// Marks which pool positions a codes buffer actually references.
fn referenced(arr: &PooledArray<impl Element>) -> Vec<bool> {
    let mut seen = vec![false; arr.pool().len() + 1];
    for code in arr.indices().iter() {
        seen[code] = true;
    }
    seen
}

// Inserts the referenced levels of `arr` into `shared`, returning the
// old-code -> shared-code remap table.
fn merge_into<T: Element>(
    shared: &mut Pool<T>,
    arr: &PooledArray<T>,
    seen: &[bool],
) -> Vec<usize> {
    let mut remap = vec![0usize; arr.pool().len() + 1];
    for (pos, level) in arr.pool().iter().enumerate() {
        if seen[pos + 1] {
            remap[pos + 1] = shared.get_or_insert(level.clone());
        }
    }
    remap
}

/// Aligns two pooled arrays onto one shared pool.
///
/// Postcondition: equal values in the two inputs map to equal codes in the
/// two outputs, which share a single pool allocation.
pub fn align<T: Element>(
    a: &PooledArray<T>,
    b: &PooledArray<T>,
) -> (PooledArray<T>, PooledArray<T>) {
    let seen_a = referenced(a);
    let seen_b = referenced(b);

    let mut shared = Pool::with_capacity(a.pool().len() + b.pool().len());
    let remap_a = merge_into(&mut shared, a, &seen_a);
    let remap_b = merge_into(&mut shared, b, &seen_b);

    let n_levels = shared.len();
    let codes_a: Vec<usize> = a.indices().iter().map(|c| remap_a[c]).collect();
    let codes_b: Vec<usize> = b.indices().iter().map(|c| remap_b[c]).collect();

    let pool = Arc::new(shared);
    (
        PooledArray {
            codes: Codes::from_usizes(&codes_a, n_levels),
            pool: Arc::clone(&pool),
        },
        PooledArray {
            codes: Codes::from_usizes(&codes_b, n_levels),
            pool,
        },
    )
}

/// Aligns two raw `Option` sequences onto one shared pool; the plain-input
/// counterpart of [`align`].
pub fn align_values<T: Element>(
    a: &[Option<T>],
    b: &[Option<T>],
) -> (PooledArray<T>, PooledArray<T>) {
    let a = PooledArray::from_values(a.iter().cloned());
    let b = PooledArray::from_values(b.iter().cloned());
    align(&a, &b)
}
