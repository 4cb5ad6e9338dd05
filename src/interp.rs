//! Stencil interpolation: weighted blends clamped to the stencil's own value
//! range, so no new extremum is ever introduced.

use crate::float_types::Real;
use crate::tree::StencilVertex;
use nalgebra::Point3;

/// Clamp `value` into the [min, max] range of the three stencil values.
pub fn limit(value: Real, v1: Real, v2: Real, v3: Real) -> Real {
    let lo = v1.min(v2).min(v3);
    let hi = v1.max(v2).max(v3);
    value.clamp(lo, hi)
}

/// Per-channel weighted sum of the stencil vertex values, clamped channel by
/// channel via [`limit`]. Weights may fall outside [0, 1] for near-valid
/// (extrapolated) stencils; the clamp bounds the result regardless.
pub fn blend(vertices: &[StencilVertex; 3], weights: &[Real; 3]) -> Vec<Real> {
    let channels = vertices[0].values.len();
    (0..channels)
        .map(|c| {
            let (v0, v1, v2) = (
                vertices[0].values[c],
                vertices[1].values[c],
                vertices[2].values[c],
            );
            limit(
                weights[0] * v0 + weights[1] * v1 + weights[2] * v2,
                v0,
                v1,
                v2,
            )
        })
        .collect()
}

/// Weighted blend of the stencil vertex positions.
pub fn blend_position(vertices: &[StencilVertex; 3], weights: &[Real; 3]) -> Point3<Real> {
    Point3::from(
        vertices[0].pos.coords * weights[0]
            + vertices[1].pos.coords * weights[1]
            + vertices[2].pos.coords * weights[2],
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn stencil(values: [Real; 3]) -> [StencilVertex; 3] {
        [
            StencilVertex {
                node: 0,
                pos: Point3::origin(),
                values: vec![values[0]],
            },
            StencilVertex {
                node: 1,
                pos: Point3::new(1.0, 0.0, 0.0),
                values: vec![values[1]],
            },
            StencilVertex {
                node: 2,
                pos: Point3::new(0.0, 1.0, 0.0),
                values: vec![values[2]],
            },
        ]
    }

    #[test]
    fn interior_blend_is_exact() {
        let verts = stencil([3.0, 5.0, 7.0]);
        let out = blend(&verts, &[0.5, 0.25, 0.25]);
        assert_relative_eq!(out[0], 4.5, epsilon = 1e-12);
    }

    #[test]
    fn extrapolated_weights_stay_clamped() {
        // Values 3, 5, 7 with an extrapolated weight vector from a point
        // just outside the triangle: the result must land inside [3, 7].
        let verts = stencil([3.0, 5.0, 7.0]);
        let out = blend(&verts, &[1.4, -0.3, -0.1]);
        assert_relative_eq!(out[0], 3.0, epsilon = 1e-12);
        assert!(out[0] >= 3.0 && out[0] <= 7.0);
    }

    #[test]
    fn limit_passes_in_range_values() {
        assert_relative_eq!(limit(4.0, 3.0, 5.0, 7.0), 4.0, epsilon = 1e-12);
        assert_relative_eq!(limit(9.0, 3.0, 5.0, 7.0), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn position_blend_reproduces_midpoint() {
        let verts = stencil([0.0, 0.0, 0.0]);
        let p = blend_position(&verts, &[0.0, 0.5, 0.5]);
        assert_relative_eq!(p.x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.5, epsilon = 1e-12);
    }
}
