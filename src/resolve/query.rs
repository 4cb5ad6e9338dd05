//! Mutable search state carried through a tree descent.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// What the search has found so far for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoundKind {
    /// Nothing yet.
    None,
    /// A candidate with a valid (or near-valid) interpolation stencil. Always
    /// outranks a closest-point fallback, regardless of raw distance.
    Stencil,
    /// A closest-point fallback with no usable stencil.
    Closest,
}

/// A target query and its running best-match state.
#[derive(Debug, Clone)]
pub struct Query {
    pub point: Point3<Real>,
    pub normal: Vector3<Real>,
    pub area: Real,
    /// Relax the orientation gate entirely.
    pub ignore_normals: bool,
    /// Pruning-radius multiplier; widened between retries.
    pub search_radius: Real,
    pub found: FoundKind,
    /// Best squared distance to the stencil-projected point, among
    /// stencil-valid candidates.
    pub stencil_dist2: Real,
    /// Best squared distance to the donor centroid, among fallback
    /// candidates.
    pub closest_dist2: Real,
    pub donor_tri: usize,
    pub donor_area: Real,
    pub nodes: [usize; 3],
    pub weights: [Real; 3],
    pub values: Vec<Real>,
    /// Query position blended through the winning stencil (its projection
    /// onto the donor plane for interior stencils).
    pub projected: Point3<Real>,
}

impl Query {
    pub fn new(point: Point3<Real>, normal: Vector3<Real>, area: Real, channels: usize) -> Self {
        Self {
            point,
            normal,
            area,
            ignore_normals: false,
            search_radius: 1.0,
            found: FoundKind::None,
            stencil_dist2: Real::INFINITY,
            closest_dist2: Real::INFINITY,
            donor_tri: 0,
            donor_area: 0.0,
            nodes: [0; 3],
            weights: [0.0; 3],
            values: vec![0.0; channels],
            projected: point,
        }
    }

    /// Clear the match state for another search pass; the orientation policy
    /// and search radius are kept.
    pub fn reset(&mut self) {
        self.found = FoundKind::None;
        self.stencil_dist2 = Real::INFINITY;
        self.closest_dist2 = Real::INFINITY;
    }
}

/// A resolved donor match, ready for recording.
#[derive(Debug, Clone, PartialEq)]
pub struct DonorMatch {
    /// `Stencil` or `Closest`; never `None`.
    pub kind: FoundKind,
    pub donor_tri: usize,
    pub nodes: [usize; 3],
    pub weights: [Real; 3],
    pub values: Vec<Real>,
    /// Resolved (unsquared) distance under the kind's ranking metric.
    pub distance: Real,
    /// Search-radius multiplier in effect when the match was found.
    pub search_radius: Real,
    /// Whether the orientation gate had to be relaxed.
    pub normals_relaxed: bool,
}
