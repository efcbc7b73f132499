// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 3D grids: common aliases and cube queries over voxels.

use alloc::vec::Vec;

use crate::buckets::{Bucket, HeapBucket, KeepSmallest, OrderedBucket, VecBucket};
use crate::cell::{CellBox, CellIndex3D};
use crate::scalar::GridScalar;
use crate::table::GridTable;

/// 3D grid with unbounded per-voxel lists.
pub type Grid3D<T, R> = GridTable<T, CellIndex3D, VecBucket<R>>;

/// 3D grid keeping the `N` best keyed references per voxel.
pub type HeapGrid3D<T, K, R, const N: usize, O = KeepSmallest> =
    GridTable<T, CellIndex3D, HeapBucket<K, R, N, O>>;

/// 3D grid keeping a run-time number of best keyed references per voxel.
pub type OrderedGrid3D<T, K, R, O = KeepSmallest> =
    GridTable<T, CellIndex3D, OrderedBucket<K, R, O>>;

impl<T: GridScalar, B: Bucket> GridTable<T, CellIndex3D, B>
where
    B::Ref: Clone,
{
    /// References in the `(2 * half_size + 1)³` cube of voxels centered on `center`.
    pub fn cube_search_cells(&self, center: CellIndex3D, half_size: i32) -> Vec<B::Ref> {
        self.refs_in(CellBox::around(center, half_size))
    }

    /// References in the inclusive box of voxels between two corners, in either order.
    pub fn cube_search_between(&self, a: CellIndex3D, b: CellIndex3D) -> Vec<B::Ref> {
        self.refs_in(CellBox::between(a, b))
    }

    /// References in voxels overlapping the box with real-space corners `a` and `b`.
    pub fn cube_search_points(&self, a: [T; 3], b: [T; 3]) -> Vec<B::Ref> {
        self.refs_in(self.cell_box_between(&a, &b))
    }

    /// References in the cube of voxels around the voxel of `center`, with
    /// `half_size * inv_cell_size` truncated to whole voxels.
    ///
    /// See [`square_search_radius`][GridTable::square_search_radius] for the
    /// coverage caveat.
    pub fn cube_search_radius(&self, center: [T; 3], half_size: T) -> Vec<B::Ref> {
        self.refs_in(self.cell_box_around(&center, half_size))
    }

    /// References in every voxel overlapping the cube of half side `half_size`
    /// around `center`; a superset of the ball of that radius.
    pub fn cube_search_covering(&self, center: [T; 3], half_size: T) -> Vec<B::Ref> {
        self.refs_in(self.cell_box_covering(&center, half_size))
    }

    /// References stored in one voxel; empty if it was never populated.
    pub fn voxel_refs(&self, index: CellIndex3D) -> Vec<B::Ref> {
        self.refs_at(index)
    }
}
