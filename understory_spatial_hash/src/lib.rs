// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_spatial_hash --heading-base-level=0

//! Understory Spatial Hash: a uniform-grid spatial hash for 2D and 3D points.
//!
//! Space is divided into square (2D) or cubic (3D) cells of a fixed side length.
//! Each point is quantized to the integer index of the cell containing it, and
//! only cells that have received at least one insertion are stored.
//!
//! - Insert references (ids, handles, small structs) at real-space points.
//! - Query a window of cells, either by integer cell indices or by real-space
//!   corners or a center and half size.
//! - Choose what each cell keeps: every reference ([`VecBucket`]), or only the
//!   best few by a ranking key ([`HeapBucket`], [`OrderedBucket`]).
//!
//! Queries are a broad phase: they return every reference stored in cells that
//! overlap the region, which may include points just outside it. Callers that
//! need exact containment filter the candidates themselves.
//!
//! The table is generic over the scalar type (`f32` or `f64`), the cell index
//! ([`CellIndex2D`] or [`CellIndex3D`]) and the bucket, and does not depend on
//! any geometry crate. Cell indices pack into a single `u64` ([`CellIndex2D::packed`],
//! [`CellIndex3D::packed`]), which is also what they hash as.
//!
//! ## Features
//!
//! - `std` *(default)*: enables `std` support in dependencies.
//! - `kurbo`: conversions between [`kurbo`](https://docs.rs/kurbo) points,
//!   rectangles and circles and 2D `f64` grids.
//! - `libm`: forwards `libm` to `kurbo` for `no_std` builds with the `kurbo` feature.
//!
//! # Example
//!
//! ```rust
//! use understory_spatial_hash::{CellIndex2D, Grid2D};
//!
//! // Cells 10 units wide.
//! let mut grid: Grid2D<f32, u32> = Grid2D::new(10.0).unwrap();
//! grid.insert([3.0, 4.0], 1).unwrap();
//! grid.insert([-3.0, 4.0], 2).unwrap();
//! grid.insert([55.0, 55.0], 3).unwrap();
//!
//! // Negative coordinates floor toward negative infinity.
//! assert_eq!(grid.cell_index(&[-3.0, 4.0]).unwrap(), CellIndex2D::new(-1, 0));
//!
//! // Everything in the 3x3 block of cells around the origin cell.
//! let mut near = grid.square_search_cells(CellIndex2D::new(0, 0), 1);
//! near.sort_unstable();
//! assert_eq!(near, [1, 2]);
//!
//! // Real-space corners, in any order.
//! assert_eq!(grid.square_search_points([60.0, 60.0], [50.0, 50.0]), [3]);
//! ```
//!
//! Ranked buckets keep only the best entries per cell:
//!
//! ```rust
//! use understory_spatial_hash::{CellIndex3D, HeapGrid3D};
//!
//! // Keep the two nearest samples per voxel, keyed by distance.
//! let mut grid: HeapGrid3D<f64, u32, &str, 2> = HeapGrid3D::new(1.0).unwrap();
//! grid.insert_keyed([0.5, 0.5, 0.5], 30, "far").unwrap();
//! grid.insert_keyed([0.4, 0.5, 0.5], 10, "near").unwrap();
//! grid.insert_keyed([0.6, 0.5, 0.5], 20, "mid").unwrap();
//!
//! let mut kept = grid.voxel_refs(CellIndex3D::new(0, 0, 0));
//! kept.sort_unstable();
//! assert_eq!(kept, ["mid", "near"]);
//! ```
//!
//! ## Choosing a bucket
//!
//! - [`VecBucket`]: keeps everything in insertion order. The default for
//!   [`Grid2D`] and [`Grid3D`].
//! - [`HeapBucket`]: keeps the `N` best `(key, ref)` entries, with `N` fixed at
//!   compile time. Cheapest bounded option.
//! - [`OrderedBucket`]: keeps the best [`Capacity`] entries, with the capacity
//!   chosen when the table is built. Iterates best first.
//!
//! Both bounded buckets keep the smallest keys by default; use [`KeepLargest`]
//! to invert that. Ties favor the earlier insertion.
//!
//! ### Index range
//!
//! 2D indices cover the full `i32` range on each axis. 3D indices are limited
//! to `[-2^20, 2^20 - 1]` per axis so that three of them fit in 64 bits.
//! Inserting a point outside that range, or one with a NaN or infinite
//! component, returns a [`GridError`] and leaves the table unchanged. Query
//! regions are clamped to the supported range instead.

#![no_std]

extern crate alloc;

pub mod buckets;
mod cell;
mod error;
mod grid2d;
mod grid3d;
#[cfg(feature = "kurbo")]
mod kurbo_adapter;
mod scalar;
mod table;

pub use buckets::{
    Bucket, Capacity, HeapBucket, KeepLargest, KeepSmallest, OrderedBucket, RankOrder, VecBucket,
};
pub use cell::{CellBox, CellIndex, CellIndex2D, CellIndex3D};
pub use error::{GridError, GridResult};
pub use grid2d::{Grid2D, HeapGrid2D, OrderedGrid2D};
pub use grid3d::{Grid3D, HeapGrid3D, OrderedGrid3D};
pub use scalar::GridScalar;
pub use table::GridTable;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_same_cell_in_both_dimensions() {
        let mut g2: Grid2D<f64, u8> = Grid2D::new(0.5).unwrap();
        let mut g3: Grid3D<f64, u8> = Grid3D::new(0.5).unwrap();
        let a = g2.insert([1.25, -0.75], 0).unwrap();
        let b = g3.insert([1.25, -0.75, 0.0], 0).unwrap();
        assert_eq!(a, CellIndex2D::new(2, -2));
        assert_eq!(b, CellIndex3D::new(2, -2, 0));
    }

    #[test]
    fn packed_keys_identify_cells() {
        let a = CellIndex2D::new(-1, 0);
        let b = CellIndex2D::new(0, -1);
        assert_ne!(a.packed(), b.packed());
        let c = CellIndex3D::new(-1, 0, 0);
        let d = CellIndex3D::new(0, 0, -1);
        assert_ne!(c.packed(), d.packed());
    }

    #[test]
    fn errors_are_reported_not_panicked() {
        assert!(matches!(
            Grid2D::<f32, u8>::new(-1.0),
            Err(GridError::InvalidCellSize(_))
        ));
        let mut grid: Grid3D<f32, u8> = Grid3D::new(1.0).unwrap();
        assert!(matches!(
            grid.insert([0.0, f32::INFINITY, 0.0], 0),
            Err(GridError::NonFiniteCoordinate { axis: 1 })
        ));
        assert!(matches!(
            grid.insert([0.0, 0.0, 2.0e6], 0),
            Err(GridError::IndexOutOfRange { axis: 2, .. })
        ));
        assert!(grid.is_empty());
    }
}
