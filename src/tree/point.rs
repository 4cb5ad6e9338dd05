//! Donor triangle records stored in the search tree.

use crate::float_types::Real;
use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};

/// One corner of a donor stencil: the donor node index, its position, and
/// its per-channel nodal values.
#[derive(Debug, Clone, PartialEq)]
pub struct StencilVertex {
    pub node: usize,
    pub pos: Point3<Real>,
    pub values: Vec<Real>,
}

/// A donor triangle as seen by the search: back-reference to the triangle,
/// its three stencil vertices, and the derived geometry candidates are
/// ranked on.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePoint {
    pub tri: usize,
    pub vertices: [StencilVertex; 3],
    pub centroid: Point3<Real>,
    pub normal: Vector3<Real>,
    pub area: Real,
}

impl SurfacePoint {
    /// Flatten a preprocessed donor mesh (centroids, normals, and nodal
    /// values must already be computed) into search records.
    pub fn collect(mesh: &Mesh) -> Vec<SurfacePoint> {
        mesh.tris
            .iter()
            .enumerate()
            .map(|(i, tri)| {
                let vertex = |n: usize| StencilVertex {
                    node: n,
                    pos: mesh.nodes[n].pos,
                    values: mesh.nodes[n].values.clone(),
                };
                SurfacePoint {
                    tri: i,
                    vertices: [vertex(tri.nodes[0]), vertex(tri.nodes[1]), vertex(tri.nodes[2])],
                    centroid: tri.centroid,
                    normal: tri.normal,
                    area: tri.area,
                }
            })
            .collect()
    }
}
