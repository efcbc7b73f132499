// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for grid configuration and insertion.

/// Result type alias for fallible grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Errors raised when a grid is misconfigured or fed a point it cannot store.
///
/// Queries never produce these: empty cells and empty result sets are
/// ordinary outcomes, and out-of-range query regions are clamped.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum GridError {
    /// The cell size must be strictly positive with a finite reciprocal.
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f64),

    /// A point component was NaN or infinite.
    #[error("point component on axis {axis} is not finite")]
    NonFiniteCoordinate {
        /// Axis of the offending component.
        axis: usize,
    },

    /// A point quantized to a cell index the packed key cannot represent.
    #[error("cell index {index} on axis {axis} is outside the supported range [{min}, {max}]")]
    IndexOutOfRange {
        /// Axis of the offending component.
        axis: usize,
        /// The quantized index (saturated to `i64`).
        index: i64,
        /// Smallest supported index on this axis.
        min: i32,
        /// Largest supported index on this axis.
        max: i32,
    },
}
