// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer lattice coordinates, their packed hash keys, and inclusive cell boxes.

use core::fmt::Debug;
use core::hash::{Hash, Hasher};
use core::ops::{Add, Sub};

use crate::error::{GridError, GridResult};
use crate::scalar::GridScalar;

/// Bias added to each 2D axis before packing (`2^31`).
const BIAS_2D: i64 = 1 << 31;
/// Bias added to each 3D axis before packing (`2^20`).
const BIAS_3D: i64 = 1 << 20;
/// Width of one packed 3D field.
const FIELD_BITS_3D: u32 = 21;
const FIELD_MASK_3D: u64 = (1 << FIELD_BITS_3D) - 1;

/// A lattice coordinate that a grid can key its cells by.
///
/// Implementors compare component-wise and hash through [`pack`][Self::pack].
/// Each axis must stay within [`AXIS_MIN`][Self::AXIS_MIN]..=[`AXIS_MAX`][Self::AXIS_MAX];
/// outside that range the packed key aliases other indices. Insertion enforces
/// the range, queries clamp to it.
pub trait CellIndex: Copy + Eq + Hash + Debug {
    /// Real-space point type quantized into this index.
    type Point<T: GridScalar>: Copy + Debug;

    /// Number of axes.
    const DIM: usize;
    /// Smallest supported index on every axis.
    const AXIS_MIN: i32;
    /// Largest supported index on every axis.
    const AXIS_MAX: i32;

    /// Quantize a point: `floor(p[axis] * inv_cell_size)` on each axis.
    ///
    /// Fails for non-finite components and for indices outside the supported range.
    fn quantize<T: GridScalar>(point: &Self::Point<T>, inv_cell_size: T) -> GridResult<Self>;

    /// Quantize a point for querying, saturating each axis into the supported range.
    fn quantize_clamped<T: GridScalar>(point: &Self::Point<T>, inv_cell_size: T) -> Self {
        Self::quantize_shifted_clamped(point, T::ZERO, inv_cell_size)
    }

    /// Like [`quantize_clamped`][Self::quantize_clamped] for the point moved by
    /// `shift` along every axis.
    fn quantize_shifted_clamped<T: GridScalar>(
        point: &Self::Point<T>,
        shift: T,
        inv_cell_size: T,
    ) -> Self;

    /// Fold the index into a single 64-bit key.
    fn pack(self) -> u64;

    /// Component-wise minimum.
    fn min_each(self, other: Self) -> Self;

    /// Component-wise maximum.
    fn max_each(self, other: Self) -> Self;

    /// Add `delta` to every axis, clamping into the supported range.
    fn offset_clamped(self, delta: i32) -> Self;

    /// Whether `min <= self <= max` holds on every axis.
    fn within(self, min: Self, max: Self) -> bool;

    /// Number of lattice cells in the inclusive box `min..=max` (saturating).
    ///
    /// Expects `min <= max` on every axis.
    fn box_volume(min: Self, max: Self) -> u64;

    /// Call `f` for every lattice cell in the inclusive box `min..=max`, first axis outermost.
    fn for_each_between<F: FnMut(Self)>(min: Self, max: Self, f: F);
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "The value is clamped into an i32 sub-range before the cast."
)]
fn clamp_axis(index: i64, min: i32, max: i32) -> i32 {
    index.clamp(i64::from(min), i64::from(max)) as i32
}

fn quantize_axes<T: GridScalar, const N: usize>(
    point: &[T; N],
    inv_cell_size: T,
    min: i32,
    max: i32,
) -> GridResult<[i32; N]> {
    let mut out = [0_i32; N];
    for (axis, (&value, slot)) in point.iter().zip(out.iter_mut()).enumerate() {
        if !value.is_finite() {
            return Err(GridError::NonFiniteCoordinate { axis });
        }
        let index = (value * inv_cell_size).floor_saturating();
        if index < i64::from(min) || index > i64::from(max) {
            return Err(GridError::IndexOutOfRange {
                axis,
                index,
                min,
                max,
            });
        }
        *slot = clamp_axis(index, min, max);
    }
    Ok(out)
}

fn quantize_axes_clamped<T: GridScalar, const N: usize>(
    point: &[T; N],
    shift: T,
    inv_cell_size: T,
    min: i32,
    max: i32,
) -> [i32; N] {
    core::array::from_fn(|axis| {
        clamp_axis(
            ((point[axis] + shift) * inv_cell_size).floor_saturating(),
            min,
            max,
        )
    })
}

fn span(min: i32, max: i32) -> u64 {
    u64::from(max.abs_diff(min)) + 1
}

/// Index of a square cell in a 2D grid.
///
/// Both axes cover the full `i32` range, so the packed key never aliases.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CellIndex2D {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl CellIndex2D {
    /// Create an index from its components.
    #[inline(always)]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Packed key: each axis biased by `2^31` into its own 32-bit half.
    ///
    /// ```
    /// use understory_spatial_hash::CellIndex2D;
    ///
    /// assert_eq!(CellIndex2D::new(i32::MIN, i32::MIN).packed(), 0);
    /// assert_eq!(CellIndex2D::new(i32::MAX, i32::MAX).packed(), u64::MAX);
    /// ```
    #[allow(
        clippy::cast_sign_loss,
        reason = "Biased values are non-negative for every i32 input."
    )]
    #[inline]
    pub const fn packed(self) -> u64 {
        let x = (self.x as i64 + BIAS_2D) as u64;
        let y = (self.y as i64 + BIAS_2D) as u64;
        x | (y << 32)
    }
}

impl CellIndex for CellIndex2D {
    type Point<T: GridScalar> = [T; 2];

    const DIM: usize = 2;
    const AXIS_MIN: i32 = i32::MIN;
    const AXIS_MAX: i32 = i32::MAX;

    fn quantize<T: GridScalar>(point: &[T; 2], inv_cell_size: T) -> GridResult<Self> {
        quantize_axes(point, inv_cell_size, Self::AXIS_MIN, Self::AXIS_MAX).map(Self::from)
    }

    fn quantize_shifted_clamped<T: GridScalar>(
        point: &[T; 2],
        shift: T,
        inv_cell_size: T,
    ) -> Self {
        quantize_axes_clamped(point, shift, inv_cell_size, Self::AXIS_MIN, Self::AXIS_MAX).into()
    }

    #[inline]
    fn pack(self) -> u64 {
        self.packed()
    }

    fn min_each(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    fn max_each(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    fn offset_clamped(self, delta: i32) -> Self {
        let d = i64::from(delta);
        Self::new(
            clamp_axis(i64::from(self.x) + d, Self::AXIS_MIN, Self::AXIS_MAX),
            clamp_axis(i64::from(self.y) + d, Self::AXIS_MIN, Self::AXIS_MAX),
        )
    }

    fn within(self, min: Self, max: Self) -> bool {
        min.x <= self.x && self.x <= max.x && min.y <= self.y && self.y <= max.y
    }

    fn box_volume(min: Self, max: Self) -> u64 {
        span(min.x, max.x).saturating_mul(span(min.y, max.y))
    }

    fn for_each_between<F: FnMut(Self)>(min: Self, max: Self, mut f: F) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                f(Self::new(x, y));
            }
        }
    }
}

impl Hash for CellIndex2D {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.packed());
    }
}

impl Add for CellIndex2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for CellIndex2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<[i32; 2]> for CellIndex2D {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<CellIndex2D> for [i32; 2] {
    fn from(index: CellIndex2D) -> Self {
        [index.x, index.y]
    }
}

/// Index of a cubic cell (voxel) in a 3D grid.
///
/// Each axis packs into 21 bits, so indices must stay within
/// `[-2^20, 2^20 - 1]`; choose the cell size accordingly.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CellIndex3D {
    /// First axis.
    pub x: i32,
    /// Second axis.
    pub y: i32,
    /// Third axis.
    pub z: i32,
}

impl CellIndex3D {
    /// Create an index from its components.
    #[inline(always)]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Packed key: three 21-bit fields, each axis biased by `2^20`.
    ///
    /// Components outside the supported range are masked and alias other indices.
    #[allow(
        clippy::cast_sign_loss,
        reason = "Biased in-range values are non-negative; out-of-range values are masked."
    )]
    #[inline]
    pub const fn packed(self) -> u64 {
        let x = ((self.x as i64 + BIAS_3D) as u64) & FIELD_MASK_3D;
        let y = ((self.y as i64 + BIAS_3D) as u64) & FIELD_MASK_3D;
        let z = ((self.z as i64 + BIAS_3D) as u64) & FIELD_MASK_3D;
        x | (y << FIELD_BITS_3D) | (z << (2 * FIELD_BITS_3D))
    }
}

impl CellIndex for CellIndex3D {
    type Point<T: GridScalar> = [T; 3];

    const DIM: usize = 3;
    const AXIS_MIN: i32 = -(1 << 20);
    const AXIS_MAX: i32 = (1 << 20) - 1;

    fn quantize<T: GridScalar>(point: &[T; 3], inv_cell_size: T) -> GridResult<Self> {
        quantize_axes(point, inv_cell_size, Self::AXIS_MIN, Self::AXIS_MAX).map(Self::from)
    }

    fn quantize_shifted_clamped<T: GridScalar>(
        point: &[T; 3],
        shift: T,
        inv_cell_size: T,
    ) -> Self {
        quantize_axes_clamped(point, shift, inv_cell_size, Self::AXIS_MIN, Self::AXIS_MAX).into()
    }

    #[inline]
    fn pack(self) -> u64 {
        self.packed()
    }

    fn min_each(self, other: Self) -> Self {
        Self::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    fn max_each(self, other: Self) -> Self {
        Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    fn offset_clamped(self, delta: i32) -> Self {
        let d = i64::from(delta);
        Self::new(
            clamp_axis(i64::from(self.x) + d, Self::AXIS_MIN, Self::AXIS_MAX),
            clamp_axis(i64::from(self.y) + d, Self::AXIS_MIN, Self::AXIS_MAX),
            clamp_axis(i64::from(self.z) + d, Self::AXIS_MIN, Self::AXIS_MAX),
        )
    }

    fn within(self, min: Self, max: Self) -> bool {
        min.x <= self.x
            && self.x <= max.x
            && min.y <= self.y
            && self.y <= max.y
            && min.z <= self.z
            && self.z <= max.z
    }

    fn box_volume(min: Self, max: Self) -> u64 {
        span(min.x, max.x)
            .saturating_mul(span(min.y, max.y))
            .saturating_mul(span(min.z, max.z))
    }

    fn for_each_between<F: FnMut(Self)>(min: Self, max: Self, mut f: F) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    f(Self::new(x, y, z));
                }
            }
        }
    }
}

impl Hash for CellIndex3D {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.packed());
    }
}

impl Add for CellIndex3D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for CellIndex3D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl From<[i32; 3]> for CellIndex3D {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<CellIndex3D> for [i32; 3] {
    fn from(index: CellIndex3D) -> Self {
        [index.x, index.y, index.z]
    }
}

/// Inclusive box of cells with `min <= max` on every axis.
///
/// Construction normalizes its inputs, so corners may be given in any order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellBox<I> {
    min: I,
    max: I,
}

impl<I: CellIndex> CellBox<I> {
    /// Box spanning two opposite corners, swapped per axis as needed.
    pub fn between(a: I, b: I) -> Self {
        Self {
            min: a.min_each(b),
            max: a.max_each(b),
        }
    }

    /// Box of side `2 * half_extent + 1` centered on `center`.
    ///
    /// A negative half-extent is treated as zero. The box is clipped to the
    /// supported index range.
    pub fn around(center: I, half_extent: i32) -> Self {
        let half = half_extent.max(0);
        Self {
            min: center.offset_clamped(-half),
            max: center.offset_clamped(half),
        }
    }

    /// Box holding a single cell.
    pub fn single(index: I) -> Self {
        Self {
            min: index,
            max: index,
        }
    }

    /// Minimum corner (inclusive).
    pub fn min(&self) -> I {
        self.min
    }

    /// Maximum corner (inclusive).
    pub fn max(&self) -> I {
        self.max
    }

    /// Whether the box contains `index`.
    pub fn contains(&self, index: I) -> bool {
        index.within(self.min, self.max)
    }

    /// Number of lattice cells covered (saturating).
    pub fn volume(&self) -> u64 {
        I::box_volume(self.min, self.max)
    }

    /// Visit every lattice cell in the box.
    pub fn for_each<F: FnMut(I)>(&self, f: F) {
        I::for_each_between(self.min, self.max, f);
    }
}
