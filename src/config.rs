//! Transfer configuration: option flags plus every empirically tuned
//! threshold, exposed with the defaults the thresholds were tuned to.

use crate::float_types::Real;

/// Symmetry-plane folding applied to target queries before resolution.
///
/// Folding lets a half-span donor mesh serve a full-span target: queries on
/// the mirrored side are reflected across the symmetry plane (point and
/// normal) before the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymmetryMode {
    /// No folding.
    #[default]
    None,
    /// Donor covers the positive side of the axis; fold negative-side
    /// targets onto it.
    FoldPositive,
    /// Donor covers the negative side of the axis; fold positive-side
    /// targets onto it.
    FoldNegative,
}

/// Spatial axis selector for the symmetry plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// Coordinate index of this axis.
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Options and tuning thresholds for a transfer run.
///
/// The numeric thresholds were tuned empirically per dataset in aerodynamic
/// post-processing use; the defaults reproduce that tuning.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Symmetry folding mode for target queries.
    pub symmetry: SymmetryMode,
    /// Axis whose coordinate plane is the symmetry plane.
    pub symmetry_axis: Axis,
    /// Unit-conversion factor applied to target node positions before any
    /// preprocessing (e.g. a structural mesh in different length units).
    pub unit_scale: Real,
    /// Negate all donor triangle normals before matching, when the donor
    /// mesh winding is known to be inverted relative to the target.
    pub swap_donor_normals: bool,
    /// Skip the donor bounding-box gate entirely.
    pub ignore_bounding_box: bool,
    /// When set, a target with no oriented match is left unresolved instead
    /// of retrying with the orientation gate relaxed.
    pub strict: bool,

    /// Orientation gate: maximum angle in degrees between donor and target
    /// unit normals.
    pub max_normal_angle_deg: Real,
    /// Near-valid stencil bound on Σ|sub-area| relative to the true donor
    /// triangle area.
    pub stencil_area_ratio: Real,
    /// Near-valid stencil bound on the sub-area excess relative to the
    /// query's own element area.
    pub stencil_excess_ratio: Real,
    /// Bounding-box tolerance as a fraction of each axis extent.
    pub box_tolerance_frac: Real,
    /// Maximum point count held by a terminal tree node.
    pub leaf_size: usize,
    /// Search passes per orientation policy; the radius widens between
    /// passes that found no stencil-valid match.
    pub max_retries: usize,
    /// Search-radius multiplier increment applied between retries.
    pub radius_increment: Real,
    /// Outlier filter: stencil-valid matches farther than this factor times
    /// √(donor area) are rejected.
    pub stencil_distance_factor: Real,
    /// Outlier filter factor for closest-point fallback matches.
    pub closest_distance_factor: Real,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            symmetry: SymmetryMode::None,
            symmetry_axis: Axis::Y,
            unit_scale: 1.0,
            swap_donor_normals: false,
            ignore_bounding_box: false,
            strict: false,
            max_normal_angle_deg: 25.0,
            stencil_area_ratio: 2.0,
            stencil_excess_ratio: 4.0,
            box_tolerance_frac: 0.01,
            leaf_size: 25,
            max_retries: 3,
            radius_increment: 50.0,
            stencil_distance_factor: 3.0,
            closest_distance_factor: 2.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn axis_indices() {
        assert_eq!(Axis::X.index(), 0);
        assert_eq!(Axis::Y.index(), 1);
        assert_eq!(Axis::Z.index(), 2);
    }

    #[test]
    fn defaults_match_tuning() {
        let cfg = TransferConfig::default();
        assert_eq!(cfg.max_normal_angle_deg, 25.0);
        assert_eq!(cfg.leaf_size, 25);
        assert_eq!(cfg.symmetry, SymmetryMode::None);
        assert!(!cfg.strict);
    }
}
