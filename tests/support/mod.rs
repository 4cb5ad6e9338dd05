//! Test support library
//! Provides mesh builders & helper functions shared by the integration tests.
#![allow(dead_code)]

use nalgebra::Point3;
use tribridge::Mesh;
use tribridge::float_types::Real;

/// Loose float comparison.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// A regular n×n-cell triangulated grid spanning `[lo, hi]²` at z = 0, with
/// counter-clockwise winding (+z normals). Element values come from
/// `value_fn(centroid_x, centroid_y)`.
pub fn grid_mesh_over(
    lo: Real,
    hi: Real,
    n: usize,
    channels: usize,
    value_fn: &dyn Fn(Real, Real) -> Vec<Real>,
) -> Mesh {
    let step = (hi - lo) / n as Real;
    let mut positions = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            positions.push(Point3::new(
                lo + i as Real * step,
                lo + j as Real * step,
                0.0,
            ));
        }
    }
    let idx = |i: usize, j: usize| j * (n + 1) + i;
    let mut tris = Vec::with_capacity(2 * n * n);
    for j in 0..n {
        for i in 0..n {
            tris.push([idx(i, j), idx(i + 1, j), idx(i + 1, j + 1)]);
            tris.push([idx(i, j), idx(i + 1, j + 1), idx(i, j + 1)]);
        }
    }
    let rows: Vec<Vec<Real>> = tris
        .iter()
        .map(|t| {
            let cx = (positions[t[0]].x + positions[t[1]].x + positions[t[2]].x) / 3.0;
            let cy = (positions[t[0]].y + positions[t[1]].y + positions[t[2]].y) / 3.0;
            value_fn(cx, cy)
        })
        .collect();
    Mesh::new(positions, tris, channels).with_element_values(rows)
}

/// A unit grid over `[0, 1]²`.
pub fn grid_mesh(n: usize, channels: usize, value_fn: &dyn Fn(Real, Real) -> Vec<Real>) -> Mesh {
    grid_mesh_over(0.0, 1.0, n, channels, value_fn)
}

/// A single small triangle whose centroid is exactly `(cx, cy, z)`, with
/// `size` controlling its footprint. Counter-clockwise (+z normal) unless
/// `flip` reverses the winding.
pub fn target_triangle_at(cx: Real, cy: Real, z: Real, size: Real, channels: usize, flip: bool) -> Mesh {
    let positions = vec![
        Point3::new(cx + size, cy, z),
        Point3::new(cx - size / 2.0, cy + size, z),
        Point3::new(cx - size / 2.0, cy - size, z),
    ];
    let tri = if flip { [0, 2, 1] } else { [0, 1, 2] };
    Mesh::new(positions, vec![tri], channels)
}

/// Several disconnected small triangles, one per `(cx, cy)` center, combined
/// into a single target mesh.
pub fn multi_target_mesh(centers: &[(Real, Real)], z: Real, size: Real, channels: usize) -> Mesh {
    let mut positions = Vec::with_capacity(3 * centers.len());
    let mut tris = Vec::with_capacity(centers.len());
    for &(cx, cy) in centers {
        let base = positions.len();
        positions.push(Point3::new(cx + size, cy, z));
        positions.push(Point3::new(cx - size / 2.0, cy + size, z));
        positions.push(Point3::new(cx - size / 2.0, cy - size, z));
        tris.push([base, base + 1, base + 2]);
    }
    Mesh::new(positions, tris, channels)
}

/// Scenario donor: two coplanar unit right triangles sharing the edge
/// between nodes 1 and 2, with element values 1.0 and 2.0.
pub fn shared_edge_donor() -> Mesh {
    Mesh::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2], [1, 3, 2]],
        1,
    )
    .with_element_values(vec![vec![1.0], vec![2.0]])
}
