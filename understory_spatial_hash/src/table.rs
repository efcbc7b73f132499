// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generic grid table over a lattice index and a bucket type.

use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;

use crate::buckets::Bucket;
use crate::cell::{CellBox, CellIndex};
use crate::error::{GridError, GridResult};
use crate::scalar::GridScalar;

/// Sparse uniform grid mapping cell indices to buckets.
///
/// Points are quantized with `floor(p * inv_cell_size)` per axis on insertion
/// and stored in the bucket of the resulting cell. Only cells that received an
/// insertion are present; there is no removal short of [`clear`][Self::clear].
///
/// The dimensionality comes from `I` ([`CellIndex2D`][crate::CellIndex2D] or
/// [`CellIndex3D`][crate::CellIndex3D]) and the per-cell container from `B`.
/// See the `grid2d` and `grid3d` aliases for the common combinations.
#[derive(Clone)]
pub struct GridTable<T: GridScalar, I: CellIndex, B: Bucket> {
    cell_size: T,
    inv_cell_size: T,
    config: B::Config,
    cells: HashMap<I, B>,
}

fn checked_inverse<T: GridScalar>(cell_size: T) -> GridResult<T> {
    if !(cell_size > T::ZERO) || !cell_size.is_finite() {
        return Err(GridError::InvalidCellSize(cell_size.to_f64()));
    }
    let inv = cell_size.recip();
    if !inv.is_finite() {
        return Err(GridError::InvalidCellSize(cell_size.to_f64()));
    }
    Ok(inv)
}

impl<T: GridScalar, I: CellIndex, B: Bucket> Debug for GridTable<T, I, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridTable")
            .field("cell_size", &self.cell_size)
            .field("config", &self.config)
            .field("cells", &self.cells.len())
            .field("entries", &self.entry_count())
            .finish_non_exhaustive()
    }
}

impl<T: GridScalar, I: CellIndex, B: Bucket> Default for GridTable<T, I, B> {
    /// Unit cells and the bucket type's default configuration.
    fn default() -> Self {
        Self {
            cell_size: T::ONE,
            inv_cell_size: T::ONE,
            config: B::Config::default(),
            cells: HashMap::new(),
        }
    }
}

impl<T: GridScalar, I: CellIndex, B: Bucket> GridTable<T, I, B> {
    /// Create an empty table with the given cell size.
    ///
    /// Fails unless `cell_size` is positive, finite, and has a finite reciprocal.
    pub fn new(cell_size: T) -> GridResult<Self> {
        Self::with_config(cell_size, B::Config::default())
    }

    /// Create an empty table with the given cell size and bucket configuration.
    pub fn with_config(cell_size: T, config: B::Config) -> GridResult<Self> {
        let inv_cell_size = checked_inverse(cell_size)?;
        Ok(Self {
            cell_size,
            inv_cell_size,
            config,
            cells: HashMap::new(),
        })
    }

    /// Change the cell size, discarding every stored entry.
    ///
    /// Existing indices are meaningless under a new scale, so the table is
    /// cleared. On error the table is left untouched.
    pub fn set_cell_size(&mut self, cell_size: T) -> GridResult<()> {
        let inv_cell_size = checked_inverse(cell_size)?;
        tracing::debug!(
            previous = ?self.cell_size,
            cell_size = ?cell_size,
            discarded = self.cells.len(),
            "grid cell size changed"
        );
        self.cells.clear();
        self.cell_size = cell_size;
        self.inv_cell_size = inv_cell_size;
        Ok(())
    }

    /// Remove every cell.
    pub fn clear(&mut self) {
        tracing::debug!(discarded = self.cells.len(), "grid cleared");
        self.cells.clear();
    }

    /// Side length of a cell.
    pub fn cell_size(&self) -> T {
        self.cell_size
    }

    /// Cached `1 / cell_size`.
    pub fn inv_cell_size(&self) -> T {
        self.inv_cell_size
    }

    /// Configuration handed to newly created buckets.
    pub fn bucket_config(&self) -> &B::Config {
        &self.config
    }

    /// Replace the configuration used for buckets created from now on.
    ///
    /// Buckets that already exist keep the configuration of their first write.
    pub fn set_bucket_config(&mut self, config: B::Config) {
        self.config = config;
    }

    /// Reserve room for at least `additional` more populated cells.
    pub fn reserve(&mut self, additional: usize) {
        self.cells.reserve(additional);
    }

    /// Cell index of `point`, exactly as [`insert`][Self::insert] computes it.
    pub fn cell_index(&self, point: &I::Point<T>) -> GridResult<I> {
        I::quantize(point, self.inv_cell_size)
    }

    /// Store `entry` in the bucket of the cell containing `point`.
    ///
    /// Returns the cell index. Fails, without modifying the table, if the point
    /// has a non-finite component or falls outside the supported index range.
    pub fn insert(&mut self, point: I::Point<T>, entry: B::Entry) -> GridResult<I> {
        let index = I::quantize(&point, self.inv_cell_size)?;
        self.cells
            .entry(index)
            .or_insert_with(|| B::with_config(&self.config))
            .push(entry);
        Ok(index)
    }

    /// Store a keyed reference in a ranked bucket.
    pub fn insert_keyed<K, R>(&mut self, point: I::Point<T>, key: K, value: R) -> GridResult<I>
    where
        B: Bucket<Entry = (K, R)>,
    {
        self.insert(point, (key, value))
    }

    /// The bucket at `index`, or `None` if nothing was ever inserted there.
    pub fn get_cell(&self, index: I) -> Option<&B> {
        self.cells.get(&index)
    }

    /// Number of populated cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is populated.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Total number of entries retained across all buckets.
    pub fn entry_count(&self) -> usize {
        self.cells.values().map(|bucket| bucket.len()).sum()
    }

    /// Iterate populated cells in arbitrary order.
    pub fn cells(&self) -> impl Iterator<Item = (I, &B)> {
        self.cells.iter().map(|(&index, bucket)| (index, bucket))
    }

    /// Iterate every retained reference in the table, discarding keys.
    pub fn refs(&self) -> impl Iterator<Item = &B::Ref> {
        self.cells.values().flat_map(|bucket| bucket.refs())
    }

    /// Box of cells covering a real-space square/cube of half side `half_size`
    /// around `center`.
    ///
    /// The half size converts to whole cells by truncation, so the box only
    /// approximates the real-space region; see [`cell_box_between`][Self::cell_box_between]
    /// for exact corner coverage.
    pub fn cell_box_around(&self, center: &I::Point<T>, half_size: T) -> CellBox<I> {
        let center = I::quantize_clamped(center, self.inv_cell_size);
        let half_extent = (half_size * self.inv_cell_size).trunc_to_extent();
        CellBox::around(center, half_extent)
    }

    /// Box of cells covering every point within `half_size` of `center` on each axis.
    ///
    /// Unlike [`cell_box_around`][Self::cell_box_around] this quantizes the
    /// real-space corners `center ∓ half_size`, so the result always contains
    /// the cells of every point inside the square/cube (and thus the ball) of
    /// that half size, wherever `center` sits inside its cell. Negative or NaN
    /// half sizes count as zero.
    pub fn cell_box_covering(&self, center: &I::Point<T>, half_size: T) -> CellBox<I> {
        let r = if half_size > T::ZERO {
            half_size
        } else {
            T::ZERO
        };
        CellBox::between(
            I::quantize_shifted_clamped(center, T::ZERO - r, self.inv_cell_size),
            I::quantize_shifted_clamped(center, r, self.inv_cell_size),
        )
    }

    /// Box of cells spanning two real-space corners given in any order.
    pub fn cell_box_between(&self, a: &I::Point<T>, b: &I::Point<T>) -> CellBox<I> {
        CellBox::between(
            I::quantize_clamped(a, self.inv_cell_size),
            I::quantize_clamped(b, self.inv_cell_size),
        )
    }

    /// Visit every populated cell inside `cells`.
    ///
    /// Walks the lattice box when it is no larger than the number of populated
    /// cells and filters the populated cells by containment otherwise. Both give
    /// the same cells; order is unspecified.
    pub fn visit_cells_in<'a, F: FnMut(I, &'a B)>(&'a self, cells: CellBox<I>, mut f: F) {
        let volume = cells.volume();
        let walk_lattice = volume <= self.cells.len() as u64;
        tracing::trace!(
            min = ?cells.min(),
            max = ?cells.max(),
            volume,
            populated = self.cells.len(),
            walk_lattice,
            "grid range scan"
        );
        if walk_lattice {
            cells.for_each(|index| {
                if let Some(bucket) = self.cells.get(&index) {
                    f(index, bucket);
                }
            });
        } else {
            for (&index, bucket) in &self.cells {
                if cells.contains(index) {
                    f(index, bucket);
                }
            }
        }
    }

    /// Populated cells inside `cells`.
    pub fn cells_in(&self, cells: CellBox<I>) -> Vec<(I, &B)> {
        let mut out = Vec::new();
        self.visit_cells_in(cells, |index, bucket| out.push((index, bucket)));
        out
    }

    /// Visit every reference stored in populated cells inside `cells`.
    pub fn visit_refs_in<F: FnMut(&B::Ref)>(&self, cells: CellBox<I>, mut f: F) {
        self.visit_cells_in(cells, |_, bucket| bucket.refs().for_each(&mut f));
    }

    /// Copies of every reference stored in populated cells inside `cells`.
    pub fn refs_in(&self, cells: CellBox<I>) -> Vec<B::Ref>
    where
        B::Ref: Clone,
    {
        let mut out = Vec::new();
        self.visit_refs_in(cells, |r| out.push(r.clone()));
        out
    }

    /// Copies of the references in one cell; empty if the cell is absent.
    pub fn refs_at(&self, index: I) -> Vec<B::Ref>
    where
        B::Ref: Clone,
    {
        self.get_cell(index)
            .map(|bucket| bucket.refs().cloned().collect())
            .unwrap_or_default()
    }
}
