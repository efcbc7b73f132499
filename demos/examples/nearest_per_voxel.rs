// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keep the samples closest to each voxel's center.
//!
//! A `HeapGrid3D` stores `(key, ref)` pairs and keeps only the `N` smallest
//! keys per voxel. Keying each sample by its squared distance to the voxel
//! center thins a dense cloud down to a few representatives per voxel.
//!
//! Run:
//! - `cargo run -p understory_demos --example nearest_per_voxel`

use understory_spatial_hash::{CellIndex3D, HeapGrid3D};

/// Squared distances are non-negative, so their bit patterns order like the values.
fn distance_key(d2: f64) -> u64 {
    d2.to_bits()
}

fn main() {
    let cell_size = 1.0;
    let mut grid: HeapGrid3D<f64, u64, usize, 3> = HeapGrid3D::new(cell_size).unwrap();

    // A regular 20x20x20 lattice of samples over [0, 2)^3: eight voxels, 1000 samples each.
    let mut samples = Vec::new();
    for x in 0..20 {
        for y in 0..20 {
            for z in 0..20 {
                samples.push([
                    f64::from(x) * 0.1 + 0.05,
                    f64::from(y) * 0.1 + 0.05,
                    f64::from(z) * 0.1 + 0.05,
                ]);
            }
        }
    }

    for (i, &p) in samples.iter().enumerate() {
        let voxel = grid.cell_index(&p).unwrap();
        let center = [
            (f64::from(voxel.x) + 0.5) * cell_size,
            (f64::from(voxel.y) + 0.5) * cell_size,
            (f64::from(voxel.z) + 0.5) * cell_size,
        ];
        let d2 = (0..3).map(|a| (p[a] - center[a]) * (p[a] - center[a])).sum();
        grid.insert_keyed(p, distance_key(d2), i).unwrap();
    }

    println!(
        "{} samples -> {} voxels, {} kept",
        samples.len(),
        grid.cell_count(),
        grid.entry_count()
    );

    let mut voxels: Vec<_> = grid.cells().collect();
    voxels.sort_by_key(|(index, _)| index.packed());
    for (index, bucket) in voxels {
        let mut kept: Vec<_> = bucket.iter().map(|(_, &i)| samples[i]).collect();
        kept.sort_by(|a, b| a.partial_cmp(b).unwrap());
        println!("voxel {:?}:", <[i32; 3]>::from(index));
        for p in kept {
            println!("  ({:.2}, {:.2}, {:.2})", p[0], p[1], p[2]);
        }
    }

    // Everything around the origin voxel.
    let around = grid.cube_search_cells(CellIndex3D::new(0, 0, 0), 1);
    println!("{} samples kept within one voxel of the origin", around.len());
}
