// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters between [`kurbo`] geometry and 2D `f64` grids.
//!
//! These are thin conversions: points and rectangle corners become `[f64; 2]`
//! and go through the same quantization as the array-based API.

use alloc::vec::Vec;

use kurbo::{Circle, Point, Rect};

use crate::buckets::Bucket;
use crate::cell::CellIndex2D;
use crate::error::GridResult;
use crate::table::GridTable;

impl<B: Bucket> GridTable<f64, CellIndex2D, B> {
    /// Store `entry` in the cell containing `point`.
    pub fn insert_point(&mut self, point: Point, entry: B::Entry) -> GridResult<CellIndex2D> {
        self.insert([point.x, point.y], entry)
    }

    /// Real-space bounds of the cell at `index`.
    pub fn cell_rect(&self, index: CellIndex2D) -> Rect {
        let size = self.cell_size();
        let x0 = f64::from(index.x) * size;
        let y0 = f64::from(index.y) * size;
        Rect::new(x0, y0, x0 + size, y0 + size)
    }
}

impl<B: Bucket> GridTable<f64, CellIndex2D, B>
where
    B::Ref: Clone,
{
    /// References in cells overlapping `rect`.
    pub fn query_rect(&self, rect: Rect) -> Vec<B::Ref> {
        self.square_search_points([rect.x0, rect.y0], [rect.x1, rect.y1])
    }

    /// Candidate references for points inside `circle`.
    ///
    /// Every reference within the circle is returned, along with others from
    /// the overlapping cells; test true distances to narrow the result.
    pub fn query_circle(&self, circle: Circle) -> Vec<B::Ref> {
        self.square_search_covering([circle.center.x, circle.center.y], circle.radius)
    }
}
