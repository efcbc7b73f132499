// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Real-valued coordinate types accepted by the grid.

use core::fmt::Debug;
use core::ops::{Add, Mul, Sub};

/// Floating-point scalar used for point coordinates and cell sizes.
///
/// Implemented for `f32` and `f64`. All conversions here avoid `std` so the
/// crate stays `no_std`; flooring is done by truncating and stepping toward −∞
/// when the truncation rounded up.
pub trait GridScalar:
    Copy + PartialOrd + Debug + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>
{
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;

    /// `1 / self`.
    fn recip(self) -> Self;

    /// Whether the value is neither NaN nor infinite.
    fn is_finite(self) -> bool;

    /// Lossless widening used for diagnostics.
    fn to_f64(self) -> f64;

    /// `floor(self)` as `i64`, saturating at the `i64` range. NaN maps to 0.
    fn floor_saturating(self) -> i64;

    /// Truncating conversion of a query half-extent (in cell units) to `i32`.
    ///
    /// Negative values and NaN give 0; large values saturate.
    fn trunc_to_extent(self) -> i32;
}

macro_rules! impl_grid_scalar {
    ($ty:ty) => {
        impl GridScalar for $ty {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;

            #[inline]
            fn recip(self) -> Self {
                1.0 / self
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$ty>::is_finite(self)
            }

            #[inline]
            fn to_f64(self) -> f64 {
                f64::from(self)
            }

            #[allow(
                clippy::cast_possible_truncation,
                reason = "Float to integer casts saturate; the result is corrected toward -inf below."
            )]
            #[inline]
            fn floor_saturating(self) -> i64 {
                let t = self as i64;
                // Round towards -∞ (the cast above has already truncated).
                if self < 0.0 && (t as Self) > self {
                    t.saturating_sub(1)
                } else {
                    t
                }
            }

            #[allow(
                clippy::cast_possible_truncation,
                reason = "Half-extents are intentionally truncated; out-of-range values saturate."
            )]
            #[inline]
            fn trunc_to_extent(self) -> i32 {
                if self > 0.0 { self as i32 } else { 0 }
            }
        }
    };
}

impl_grid_scalar!(f32);
impl_grid_scalar!(f64);
