//! Candidate policies run against every donor record in a visited terminal
//! tree node. The tree is generic over the policy, so the same index serves
//! both the full field-transfer test and a plain nearest-point query.

use crate::config::TransferConfig;
use crate::float_types::{EPSILON, Real};
use crate::interp;
use crate::resolve::query::{FoundKind, Query};
use crate::tree::SurfacePoint;
use nalgebra::Point3;

/// A policy deciding whether a donor candidate improves the query's current
/// best match, and recording it when it does.
pub trait CandidateTest {
    fn test(&self, donor: &SurfacePoint, query: &mut Query);
}

/// The field-transfer policy: orientation gate, stencil-validity test, and
/// clamped interpolation, with stencil-valid candidates always outranking
/// closest-point fallbacks.
#[derive(Debug, Clone)]
pub struct StencilTest {
    /// Orientation gate half-angle, radians.
    max_normal_angle: Real,
    area_ratio_limit: Real,
    excess_ratio_limit: Real,
}

impl StencilTest {
    pub fn new(config: &TransferConfig) -> Self {
        Self {
            max_normal_angle: config.max_normal_angle_deg.to_radians(),
            area_ratio_limit: config.stencil_area_ratio,
            excess_ratio_limit: config.stencil_excess_ratio,
        }
    }

    /// Signed sub-areas of the three edge/query triangles (twice the actual
    /// areas, signs fixed by the donor unit normal), plus the same quantity
    /// for the donor triangle itself. `areas[i]` belongs to the sub-triangle
    /// opposite vertex `i`, pairing it with that vertex's barycentric weight.
    fn signed_sub_areas(donor: &SurfacePoint, point: Point3<Real>) -> ([Real; 3], Real) {
        let [v0, v1, v2] = [
            donor.vertices[0].pos,
            donor.vertices[1].pos,
            donor.vertices[2].pos,
        ];
        let sub = |a: Point3<Real>, b: Point3<Real>| (b - a).cross(&(point - a)).dot(&donor.normal);
        let areas = [sub(v1, v2), sub(v2, v0), sub(v0, v1)];
        let total = (v1 - v0).cross(&(v2 - v0)).dot(&donor.normal);
        (areas, total)
    }

    /// A projection is fully valid when all sub-areas share a sign; it is
    /// still acceptable as near-valid while the absolute sub-area sum stays
    /// close to the true area and the excess stays small relative to the
    /// query element's own area. Beyond that it is extrapolation.
    fn stencil_is_valid(&self, areas: &[Real; 3], total: Real, query_area: Real) -> bool {
        let positive = areas.iter().filter(|a| **a >= 0.0).count();
        if positive == 0 || positive == 3 {
            return true;
        }
        if total.abs() <= EPSILON || query_area <= EPSILON {
            return false;
        }
        let abs_sum: Real = areas.iter().map(|a| a.abs()).sum();
        let area_ratio = abs_sum / total.abs();
        let excess_ratio = 0.5 * (abs_sum - total.abs()).abs() / query_area;
        area_ratio < self.area_ratio_limit && excess_ratio < self.excess_ratio_limit
    }
}

impl CandidateTest for StencilTest {
    fn test(&self, donor: &SurfacePoint, query: &mut Query) {
        let dot = donor.normal.dot(&query.normal);
        let aligned = dot > 0.0 && dot.clamp(-1.0, 1.0).acos() <= self.max_normal_angle;
        if !aligned && !query.ignore_normals {
            return;
        }

        let (areas, total) = Self::signed_sub_areas(donor, query.point);
        let sum = areas[0] + areas[1] + areas[2];
        if sum.abs() <= EPSILON {
            // Degenerate donor; it cannot carry a stencil.
            return;
        }
        let weights = [areas[0] / sum, areas[1] / sum, areas[2] / sum];
        let projected = interp::blend_position(&donor.vertices, &weights);

        if self.stencil_is_valid(&areas, total, query.area) {
            let dist2 = (query.point - projected).norm_squared();
            if dist2 <= query.stencil_dist2 {
                record(query, donor, weights, projected, dist2, FoundKind::Stencil);
            }
        } else if query.found != FoundKind::Stencil {
            let dist2 = (query.point - donor.centroid).norm_squared();
            if dist2 <= query.closest_dist2 {
                record(query, donor, weights, projected, dist2, FoundKind::Closest);
            }
        }
    }
}

/// Plain nearest-centroid policy: no orientation or stencil constraints,
/// every candidate competes on 3-D centroid distance. The degenerate
/// centroid stencil (equal thirds) carries the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestTest;

impl CandidateTest for NearestTest {
    fn test(&self, donor: &SurfacePoint, query: &mut Query) {
        let dist2 = (query.point - donor.centroid).norm_squared();
        if dist2 <= query.closest_dist2 {
            let third = 1.0 / 3.0;
            let weights = [third; 3];
            record(query, donor, weights, donor.centroid, dist2, FoundKind::Closest);
        }
    }
}

fn record(
    query: &mut Query,
    donor: &SurfacePoint,
    weights: [Real; 3],
    projected: Point3<Real>,
    dist2: Real,
    kind: FoundKind,
) {
    match kind {
        FoundKind::Stencil => query.stencil_dist2 = dist2,
        FoundKind::Closest => query.closest_dist2 = dist2,
        FoundKind::None => unreachable!("recording a match without a found kind"),
    }
    query.found = kind;
    query.donor_tri = donor.tri;
    query.donor_area = donor.area;
    query.nodes = [
        donor.vertices[0].node,
        donor.vertices[1].node,
        donor.vertices[2].node,
    ];
    query.weights = weights;
    query.values = interp::blend(&donor.vertices, &weights);
    query.projected = projected;
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn unit_donor(values: [Real; 3]) -> SurfacePoint {
        let vertex = |node: usize, x: Real, y: Real, v: Real| crate::tree::StencilVertex {
            node,
            pos: Point3::new(x, y, 0.0),
            values: vec![v],
        };
        SurfacePoint {
            tri: 0,
            vertices: [
                vertex(0, 0.0, 0.0, values[0]),
                vertex(1, 1.0, 0.0, values[1]),
                vertex(2, 0.0, 1.0, values[2]),
            ],
            centroid: Point3::new(1.0 / 3.0, 1.0 / 3.0, 0.0),
            normal: Vector3::z(),
            area: 0.5,
        }
    }

    fn query_at(x: Real, y: Real, z: Real) -> Query {
        Query::new(Point3::new(x, y, z), Vector3::z(), 0.01, 1)
    }

    fn test_with_defaults(donor: &SurfacePoint, query: &mut Query) {
        StencilTest::new(&TransferConfig::default()).test(donor, query);
    }

    #[test]
    fn interior_projection_is_stencil_valid() {
        let donor = unit_donor([1.0, 2.0, 3.0]);
        let mut query = query_at(0.25, 0.25, 0.5);
        test_with_defaults(&donor, &mut query);
        assert_eq!(query.found, FoundKind::Stencil);
        // Projection drops the z offset entirely.
        assert_relative_eq!(query.stencil_dist2, 0.25, epsilon = 1e-12);
        let sum: Real = query.weights.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        assert!(query.weights.iter().all(|w| (0.0..=1.0).contains(w)));
    }

    #[test]
    fn far_exterior_point_falls_back_to_closest() {
        let donor = unit_donor([1.0, 2.0, 3.0]);
        let mut query = query_at(30.0, 30.0, 0.0);
        test_with_defaults(&donor, &mut query);
        assert_eq!(query.found, FoundKind::Closest);
        // Fallback values still come out of the stencil range.
        assert!(query.values[0] >= 1.0 && query.values[0] <= 3.0);
    }

    #[test]
    fn orientation_gate_rejects_opposed_normals() {
        let donor = unit_donor([1.0, 2.0, 3.0]);
        let mut query = query_at(0.25, 0.25, 0.0);
        query.normal = -Vector3::z();
        test_with_defaults(&donor, &mut query);
        assert_eq!(query.found, FoundKind::None);

        query.ignore_normals = true;
        test_with_defaults(&donor, &mut query);
        assert_eq!(query.found, FoundKind::Stencil);
    }

    #[test]
    fn orientation_gate_edge_angle() {
        let donor = unit_donor([0.0; 3]);
        // 30° off-normal: outside the 25° gate even though the dot product
        // is positive.
        let tilt = (30.0 as Real).to_radians();
        let mut query = query_at(0.25, 0.25, 0.0);
        query.normal = Vector3::new(tilt.sin(), 0.0, tilt.cos());
        test_with_defaults(&donor, &mut query);
        assert_eq!(query.found, FoundKind::None);
    }

    #[test]
    fn stencil_beats_closer_fallback() {
        // Donor 0: stencil-valid but 5 units below the query plane.
        let mut stencil_donor = unit_donor([1.0; 3]);
        for v in &mut stencil_donor.vertices {
            v.pos.z = -5.0;
        }
        stencil_donor.centroid.z = -5.0;

        // Donor 1: centroid barely 3 units away, but the query projects far
        // outside its footprint.
        let mut fallback_donor = unit_donor([2.0; 3]);
        fallback_donor.tri = 1;
        for v in &mut fallback_donor.vertices {
            v.pos += Vector3::new(3.0, 0.0, 0.0);
        }
        fallback_donor.centroid += Vector3::new(3.0, 0.0, 0.0);

        let mut query = query_at(0.25, 0.25, 0.0);
        let test = StencilTest::new(&TransferConfig::default());
        test.test(&fallback_donor, &mut query);
        assert_eq!(query.found, FoundKind::Closest);

        // The farther stencil-valid donor displaces the closer fallback...
        test.test(&stencil_donor, &mut query);
        assert_eq!(query.found, FoundKind::Stencil);
        assert_eq!(query.donor_tri, 0);

        // ...and the fallback cannot take the lead back.
        test.test(&fallback_donor, &mut query);
        assert_eq!(query.found, FoundKind::Stencil);
        assert_eq!(query.donor_tri, 0);
    }

    #[test]
    fn nearest_test_ranks_by_centroid() {
        let near = unit_donor([1.0; 3]);
        let mut far = unit_donor([2.0; 3]);
        far.tri = 7;
        far.centroid += Vector3::new(10.0, 0.0, 0.0);

        let mut query = query_at(0.3, 0.3, 0.0);
        NearestTest.test(&far, &mut query);
        NearestTest.test(&near, &mut query);
        assert_eq!(query.donor_tri, 0);
        assert_eq!(query.found, FoundKind::Closest);
    }
}
