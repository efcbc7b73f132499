// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2D grids: common aliases and square-window queries.
//!
//! All queries return independent copies of the stored references in
//! unspecified order.

use alloc::vec::Vec;

use crate::buckets::{Bucket, HeapBucket, KeepSmallest, OrderedBucket, VecBucket};
use crate::cell::{CellBox, CellIndex2D};
use crate::scalar::GridScalar;
use crate::table::GridTable;

/// 2D grid with unbounded per-cell lists.
pub type Grid2D<T, R> = GridTable<T, CellIndex2D, VecBucket<R>>;

/// 2D grid keeping the `N` best keyed references per cell.
pub type HeapGrid2D<T, K, R, const N: usize, O = KeepSmallest> =
    GridTable<T, CellIndex2D, HeapBucket<K, R, N, O>>;

/// 2D grid keeping a run-time number of best keyed references per cell.
pub type OrderedGrid2D<T, K, R, O = KeepSmallest> =
    GridTable<T, CellIndex2D, OrderedBucket<K, R, O>>;

impl<T: GridScalar, B: Bucket> GridTable<T, CellIndex2D, B>
where
    B::Ref: Clone,
{
    /// References in the `(2 * half_size + 1)²` square of cells centered on `center`.
    ///
    /// A zero or negative `half_size` searches only `center`.
    pub fn square_search_cells(&self, center: CellIndex2D, half_size: i32) -> Vec<B::Ref> {
        self.refs_in(CellBox::around(center, half_size))
    }

    /// References in the inclusive box of cells between two corners, in either order.
    pub fn square_search_between(&self, a: CellIndex2D, b: CellIndex2D) -> Vec<B::Ref> {
        self.refs_in(CellBox::between(a, b))
    }

    /// References in cells overlapping the rectangle with real-space corners `a` and `b`.
    ///
    /// The corners may be given in either order.
    pub fn square_search_points(&self, a: [T; 2], b: [T; 2]) -> Vec<B::Ref> {
        self.refs_in(self.cell_box_between(&a, &b))
    }

    /// References in the square of cells around the cell of `center`, with
    /// `half_size * inv_cell_size` truncated to whole cells.
    ///
    /// This is a cheap approximation of the real-space square: it is a superset
    /// of it when `center` lies on a cell corner, but may miss cells on the far
    /// side otherwise. Use [`square_search_covering`][Self::square_search_covering]
    /// when a guaranteed superset is needed.
    pub fn square_search_radius(&self, center: [T; 2], half_size: T) -> Vec<B::Ref> {
        self.refs_in(self.cell_box_around(&center, half_size))
    }

    /// References in every cell overlapping the square of half side
    /// `half_size` around `center`.
    ///
    /// Always a superset of the references within Euclidean distance
    /// `half_size` of `center`; filter by true distance for an exact radius query.
    pub fn square_search_covering(&self, center: [T; 2], half_size: T) -> Vec<B::Ref> {
        self.refs_in(self.cell_box_covering(&center, half_size))
    }

    /// References stored in one cell; empty if the cell was never populated.
    pub fn cell_refs(&self, index: CellIndex2D) -> Vec<B::Ref> {
        self.refs_at(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buckets::KeepLargest;
    use crate::error::GridError;
    use hashbrown::HashSet;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn single_cell() {
        let mut grid: Grid2D<f32, usize> = Grid2D::new(10.0).unwrap();
        let point = [0.0, 0.0];
        grid.insert(point, 1).unwrap();
        let idx = grid.cell_index(&point).unwrap();
        assert_eq!(grid.cell_refs(idx), [1]);
        assert!(grid.cell_refs(CellIndex2D::new(1, 0)).is_empty());
    }

    #[test]
    fn random_square_window_in_both_orders() {
        let mut grid: Grid2D<f32, usize> = Grid2D::new(10.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let side = 1000.0_f32;
        let n = 10_000;
        for i in 0..n {
            let p = [rng.gen_range(0.0..side), rng.gen_range(0.0..side)];
            grid.insert(p, i).unwrap();
        }

        let lo = [0.0, 0.0];
        let hi = [side, side];
        assert_eq!(grid.square_search_points(lo, hi).len(), n);
        assert_eq!(grid.square_search_points(hi, lo).len(), n);
        // Mixed corners: swap only one axis.
        assert_eq!(grid.square_search_points([0.0, side], [side, 0.0]).len(), n);
        assert!(grid.cell_count() <= 100 * 100);
    }

    #[test]
    fn disk_within_truncated_square_around_origin() {
        let mut grid: Grid2D<f32, usize> = Grid2D::new(10.0).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let radius = 100.0_f32;
        let mut n = 0;
        while n < 10_000 {
            let p = [
                rng.gen_range(-radius..radius),
                rng.gen_range(-radius..radius),
            ];
            if p[0] * p[0] + p[1] * p[1] < radius * radius {
                grid.insert(p, n).unwrap();
                n += 1;
            }
        }
        assert_eq!(grid.square_search_radius([0.0, 0.0], radius).len(), n);
    }

    #[test]
    fn covering_search_is_a_superset_of_the_disk() {
        let mut grid: Grid2D<f64, usize> = Grid2D::new(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let points: Vec<[f64; 2]> = (0..2_000)
            .map(|_| [rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0)])
            .collect();
        for (i, &p) in points.iter().enumerate() {
            grid.insert(p, i).unwrap();
        }

        for _ in 0..50 {
            let center = [rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0)];
            let r: f64 = rng.gen_range(0.0..4.0);
            let found: HashSet<usize> = grid.square_search_covering(center, r).into_iter().collect();
            for (i, p) in points.iter().enumerate() {
                let (dx, dy) = (p[0] - center[0], p[1] - center[1]);
                if dx * dx + dy * dy <= r * r {
                    assert!(found.contains(&i), "point {i} within {r} of {center:?} missing");
                }
            }
        }
    }

    #[test]
    fn index_space_square() {
        let mut grid: Grid2D<f64, u32> = Grid2D::new(1.0).unwrap();
        for x in -3..=3 {
            for y in -3..=3 {
                grid.insert([f64::from(x) + 0.5, f64::from(y) + 0.5], 1).unwrap();
            }
        }
        let c = CellIndex2D::new(0, 0);
        assert_eq!(grid.square_search_cells(c, 1).len(), 9);
        assert_eq!(grid.square_search_cells(c, 0).len(), 1);
        assert_eq!(grid.square_search_cells(c, -2).len(), 1);
        assert_eq!(grid.square_search_cells(c, 100).len(), 49);
        assert_eq!(
            grid.square_search_between(CellIndex2D::new(3, -3), CellIndex2D::new(2, 3))
                .len(),
            14
        );
    }

    #[test]
    fn empty_region_is_empty_not_error() {
        let mut grid: Grid2D<f64, u32> = Grid2D::new(1.0).unwrap();
        assert!(grid.square_search_points([0.0, 0.0], [5.0, 5.0]).is_empty());
        grid.insert([100.0, 100.0], 1).unwrap();
        assert!(grid.square_search_points([0.0, 0.0], [5.0, 5.0]).is_empty());
        assert!(grid.square_search_radius([0.0, 0.0], 3.0).is_empty());
    }

    #[test]
    fn out_of_range_query_is_clamped() {
        let mut grid: Grid2D<f64, u32> = Grid2D::new(1.0).unwrap();
        grid.insert([0.5, 0.5], 1).unwrap();
        let far = [f64::MAX, f64::MAX];
        let near = [-1.0, -1.0];
        assert_eq!(grid.square_search_points(near, far), [1]);
        assert_eq!(grid.square_search_points([f64::NAN, 0.0], [1.0, 1.0]), [1]);
    }

    #[test]
    fn rejects_unrepresentable_points() {
        let mut grid: Grid2D<f64, u32> = Grid2D::new(1e-3).unwrap();
        assert!(matches!(
            grid.insert([3e6, 0.0], 1),
            Err(GridError::IndexOutOfRange { axis: 0, .. })
        ));
        assert!(grid.is_empty());
    }

    #[test]
    fn heap_grid_keeps_nearest_per_cell() {
        let mut grid: HeapGrid2D<f64, u32, &str, 2> = HeapGrid2D::new(10.0).unwrap();
        grid.insert_keyed([1.0, 1.0], 30, "c").unwrap();
        grid.insert_keyed([2.0, 2.0], 10, "a").unwrap();
        grid.insert_keyed([3.0, 3.0], 20, "b").unwrap();
        grid.insert_keyed([15.0, 1.0], 99, "z").unwrap();

        let cell = grid.get_cell(CellIndex2D::new(0, 0)).unwrap();
        assert_eq!(cell.len(), 2);
        let mut kept = grid.cell_refs(CellIndex2D::new(0, 0));
        kept.sort_unstable();
        assert_eq!(kept, ["a", "b"]);
        assert_eq!(grid.refs().count(), 3);
        assert_eq!(grid.square_search_cells(CellIndex2D::new(0, 0), 1).len(), 3);
    }

    #[test]
    fn ordered_grid_policy_is_explicit() {
        let mut smallest: OrderedGrid2D<f32, i32, char> =
            OrderedGrid2D::with_config(1.0, crate::Capacity(1)).unwrap();
        let mut largest: OrderedGrid2D<f32, i32, char, KeepLargest> =
            OrderedGrid2D::with_config(1.0, crate::Capacity(1)).unwrap();
        for (k, c) in [(2, 'b'), (1, 'a'), (3, 'c')] {
            smallest.insert_keyed([0.5, 0.5], k, c).unwrap();
            largest.insert_keyed([0.5, 0.5], k, c).unwrap();
        }
        assert_eq!(smallest.cell_refs(CellIndex2D::new(0, 0)), ['a']);
        assert_eq!(largest.cell_refs(CellIndex2D::new(0, 0)), ['c']);
    }
}
