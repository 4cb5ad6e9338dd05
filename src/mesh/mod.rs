//! Donor/target surface meshes and the preprocessing passes that run before
//! a transfer: centroids, normals and areas, bounding box, and area-weighted
//! scattering of element values onto nodes.

use crate::aabb::Aabb;
use crate::float_types::{EPSILON, Real};
use nalgebra::{Point3, Vector3};
use std::sync::OnceLock;

/// A mesh node: position plus per-channel nodal values.
///
/// Nodal values start at zero and are populated by
/// [`Mesh::scatter_to_nodes`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub pos: Point3<Real>,
    pub values: Vec<Real>,
}

/// A surface triangle: node indices plus the derived geometry and the
/// per-channel element values sampled on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub nodes: [usize; 3],
    pub centroid: Point3<Real>,
    /// Unit normal; zero for a degenerate triangle.
    pub normal: Vector3<Real>,
    pub area: Real,
    pub values: Vec<Real>,
}

/// A triangulated surface mesh with N scalar field channels.
///
/// Two independent instances exist per transfer, donor and target; each is
/// preprocessed once and then treated as read-only for the run.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub nodes: Vec<MeshNode>,
    pub tris: Vec<Triangle>,
    channels: usize,
    bounding_box: OnceLock<Aabb>,
}

impl Mesh {
    /// Build a mesh from node positions and triangle node-index triples.
    ///
    /// Element values start at zero; fill them with
    /// [`with_element_values`](Self::with_element_values) for a donor mesh.
    /// Out-of-range node indices are a caller bug and panic.
    pub fn new(positions: Vec<Point3<Real>>, tri_nodes: Vec<[usize; 3]>, channels: usize) -> Self {
        let node_count = positions.len();
        let nodes = positions
            .into_iter()
            .map(|pos| MeshNode {
                pos,
                values: vec![0.0; channels],
            })
            .collect();
        let tris = tri_nodes
            .into_iter()
            .map(|nodes| {
                assert!(
                    nodes.iter().all(|&n| n < node_count),
                    "triangle references node outside the mesh"
                );
                Triangle {
                    nodes,
                    centroid: Point3::origin(),
                    normal: Vector3::zeros(),
                    area: 0.0,
                    values: vec![0.0; channels],
                }
            })
            .collect();
        Self {
            nodes,
            tris,
            channels,
            bounding_box: OnceLock::new(),
        }
    }

    /// Attach per-triangle element values, one row of `channels` values per
    /// triangle.
    pub fn with_element_values(mut self, rows: Vec<Vec<Real>>) -> Self {
        assert_eq!(rows.len(), self.tris.len(), "one value row per triangle");
        for (tri, row) in self.tris.iter_mut().zip(rows) {
            assert_eq!(row.len(), self.channels, "row width must match channel count");
            tri.values = row;
        }
        self
    }

    /// Number of scalar field channels carried by this mesh.
    pub const fn channels(&self) -> usize {
        self.channels
    }

    /// Apply a unit-conversion factor to all node positions. Must run before
    /// any derived geometry is computed.
    pub fn scale(&mut self, factor: Real) {
        for node in &mut self.nodes {
            node.pos.coords *= factor;
        }
        self.bounding_box = OnceLock::new();
    }

    /// Vertex-average centroid for every triangle.
    pub fn compute_centroids(&mut self) {
        for tri in &mut self.tris {
            let [a, b, c] = tri.nodes;
            tri.centroid = Point3::from(
                (self.nodes[a].pos.coords + self.nodes[b].pos.coords + self.nodes[c].pos.coords)
                    / 3.0,
            );
        }
    }

    /// Unit normal and area for every triangle: the cross product of the two
    /// edge vectors from vertex 0, with half its magnitude as the area.
    pub fn compute_normals(&mut self) {
        let mut total_area = 0.0;
        for tri in &mut self.tris {
            let [a, b, c] = tri.nodes;
            let edge1 = self.nodes[b].pos - self.nodes[a].pos;
            let edge2 = self.nodes[c].pos - self.nodes[a].pos;
            let cross = edge1.cross(&edge2);
            let area = 0.5 * cross.norm();
            tri.area = area;
            tri.normal = if area > EPSILON {
                cross * (0.5 / area)
            } else {
                Vector3::zeros()
            };
            total_area += area;
        }
        log::debug!("total surface area: {total_area}");
    }

    /// Negate every triangle normal.
    pub fn flip_normals(&mut self) {
        for tri in &mut self.tris {
            tri.normal = -tri.normal;
        }
    }

    /// Lazily computed bounding box over node positions.
    pub fn bounding_box(&self) -> &Aabb {
        self.bounding_box.get_or_init(|| {
            Aabb::from_points(self.nodes.iter().map(|n| &n.pos))
                .expect("bounding box of an empty mesh")
        })
    }

    /// Area-weighted scatter of per-triangle element values onto nodes.
    ///
    /// Every triangle adds (area × element value) to each of its three
    /// nodes' accumulators and its area to the node weight; each nodal value
    /// is then accumulator/weight. Precondition: every node is referenced by
    /// at least one triangle.
    pub fn scatter_to_nodes(&mut self) {
        let mut weight = vec![0.0 as Real; self.nodes.len()];
        for node in &mut self.nodes {
            node.values.iter_mut().for_each(|v| *v = 0.0);
        }
        for tri in &self.tris {
            for &n in &tri.nodes {
                for (acc, &v) in self.nodes[n].values.iter_mut().zip(&tri.values) {
                    *acc += tri.area * v;
                }
                weight[n] += tri.area;
            }
        }
        for (j, node) in self.nodes.iter_mut().enumerate() {
            assert!(
                weight[j] > 0.0,
                "mesh node {j} is not referenced by any triangle with area"
            );
            node.values.iter_mut().for_each(|v| *v /= weight[j]);
        }
    }
}
