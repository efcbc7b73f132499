// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broad + narrow phase radius query on a 2D grid.
//!
//! This example shows how to:
//! - bucket points into a `Grid2D` keyed by their index in a point list,
//! - pull candidates from the cells overlapping a circle with `query_circle`,
//! - narrow the candidates to the exact circle with a distance test.
//!
//! Run:
//! - `cargo run -p understory_demos --example radius_filter`

use kurbo::{Circle, Point, Vec2};
use understory_spatial_hash::Grid2D;

fn main() {
    // Points along a spiral, spreading out from the origin.
    let points: Vec<Point> = (0..500)
        .map(|i| {
            let t = f64::from(i) * 0.1;
            Point::ORIGIN + Vec2::from_angle(t) * (t * 2.0)
        })
        .collect();

    let mut grid: Grid2D<f64, usize> = Grid2D::new(8.0).unwrap();
    for (i, &p) in points.iter().enumerate() {
        grid.insert_point(p, i).unwrap();
    }
    println!(
        "{} points in {} cells of size {}",
        points.len(),
        grid.cell_count(),
        grid.cell_size()
    );

    let circle = Circle::new((20.0, -10.0), 15.0);
    let candidates = grid.query_circle(circle);
    let mut hits: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&i| points[i].distance(circle.center) <= circle.radius)
        .collect();
    hits.sort_unstable();

    println!(
        "circle at {:?} r={}: {} candidates, {} inside",
        circle.center,
        circle.radius,
        candidates.len(),
        hits.len()
    );
    for i in hits {
        let p = points[i];
        println!("  #{i:<3} ({:>7.2}, {:>7.2})", p.x, p.y);
    }

    // Brute force agrees with the filtered grid result.
    let brute = points
        .iter()
        .filter(|p| p.distance(circle.center) <= circle.radius)
        .count();
    println!("brute force: {brute} inside");
}
