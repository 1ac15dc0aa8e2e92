//! # **Sort Kernels** - *Pool-Indirect Sorting*
//!
//! Sorting a pooled array is reduced to sorting its (typically much
//! smaller) pool: the pool positions are ordered once, a position-to-rank
//! table is built, and every element's sort rank is then a single table
//! lookup per code - `O(pool log pool + codes)` instead of comparing raw
//! values pairwise across the full element count.
//!
//! Ties among equal values are inherently stable (equal values share one
//! pool position, hence one rank); remaining ties preserve original
//! relative order through the stable index sort.

use std::sync::Arc;

use crate::traits::type_unions::Element;
use crate::PooledArray;

/// Where missing elements sort relative to present ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingOrder {
    /// Missing elements come before every present value.
    First,
    /// Missing elements come after every present value.
    Last,
}

/// Ordering options for [`argsort`] / [`sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOptions {
    /// Sort present values in descending order.
    pub descending: bool,
    /// Placement of missing elements.
    pub missing: MissingOrder,
}

/// Ascending, missing last.
impl Default for SortOptions {
    fn default() -> Self {
        Self {
            descending: false,
            missing: MissingOrder::Last,
        }
    }
}

/// Computes the permutation that sorts `arr` under `options`.
///
/// The permutation is position-stable: elements with equal sort rank keep
/// their original relative order.
pub fn argsort<T: Element + Ord>(arr: &PooledArray<T>, options: &SortOptions) -> Vec<usize> {
    let levels = arr.levels();
    let n_levels = levels.len();

    // Order the pool once.
    let mut order: Vec<usize> = (1..=n_levels).collect();
    order.sort_by(|&a, &b| levels[a - 1].cmp(&levels[b - 1]));
    if options.descending {
        order.reverse();
    }

    // Position -> rank table, one slot per level plus the missing slot.
    // Present ranks occupy 1..=n so both missing policies stay clear of
    // them.
    let mut rank = vec![0usize; n_levels + 1];
    for (r, &pos) in order.iter().enumerate() {
        rank[pos] = r + 1;
    }
    rank[0] = match options.missing {
        MissingOrder::First => 0,
        MissingOrder::Last => n_levels + 1,
    };

    // One table lookup per element.
    let keys: Vec<usize> = arr.indices().iter().map(|code| rank[code]).collect();

    let mut perm: Vec<usize> = (0..arr.len()).collect();
    perm.sort_by_key(|&i| keys[i]);
    perm
}

/// Returns a new pooled array with elements in sorted order. The result
/// shares the input's pool; only the codes are permuted.
pub fn sort<T: Element + Ord>(arr: &PooledArray<T>, options: &SortOptions) -> PooledArray<T> {
    let perm = argsort(arr, options);
    PooledArray {
        codes: arr.indices().gather(&perm),
        pool: Arc::clone(&arr.pool),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Masked;

    #[test]
    fn ascending_sort_matches_plain_sort() {
        let arr = PooledArray::from_slice(&["B", "A", "C", "A", "B"]);
        let sorted = sort(&arr, &SortOptions::default());
        assert_eq!(sorted.to_dense().unwrap(), vec!["A", "A", "B", "B", "C"]);

        // Equivalent to sorting the plain-value array.
        let mut plain = arr.to_dense().unwrap();
        plain.sort();
        assert_eq!(sorted.to_dense().unwrap(), plain);
    }

    #[test]
    fn descending_sort() {
        let arr = PooledArray::from_slice(&[2, 5, 1, 5]);
        let sorted = sort(
            &arr,
            &SortOptions {
                descending: true,
                ..SortOptions::default()
            },
        );
        assert_eq!(sorted.to_dense().unwrap(), vec![5, 5, 2, 1]);
    }

    #[test]
    fn missing_first_and_last() {
        let arr = PooledArray::from_values(vec![Some(2), None, Some(1), None]);

        let last = sort(&arr, &SortOptions::default());
        assert_eq!(
            last.iter_opt().collect::<Vec<_>>(),
            vec![Some(1), Some(2), None, None]
        );

        let first = sort(
            &arr,
            &SortOptions {
                missing: MissingOrder::First,
                ..SortOptions::default()
            },
        );
        assert_eq!(
            first.iter_opt().collect::<Vec<_>>(),
            vec![None, None, Some(1), Some(2)]
        );
    }

    #[test]
    fn argsort_is_position_stable() {
        // Equal values keep original relative order.
        let arr = PooledArray::from_slice(&["b", "a", "b", "a"]);
        let perm = argsort(&arr, &SortOptions::default());
        assert_eq!(perm, vec![1, 3, 0, 2]);
    }

    #[test]
    fn sort_shares_the_pool() {
        let arr = PooledArray::from_slice(&["z", "y"]);
        let sorted = sort(&arr, &SortOptions::default());
        assert!(Arc::ptr_eq(&arr.pool, &sorted.pool));
        // Pool order itself is untouched; only codes moved.
        assert_eq!(sorted.levels(), &["z", "y"]);
    }

    #[test]
    fn sort_empty_and_all_missing() {
        let empty = PooledArray::<i32>::from_values(Vec::new());
        assert_eq!(argsort(&empty, &SortOptions::default()), Vec::<usize>::new());

        let gone = PooledArray::<i32>::from_values(vec![None, None, None]);
        let sorted = sort(&gone, &SortOptions::default());
        assert!(sorted.all_missing());
    }
}
