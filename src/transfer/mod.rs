//! Transfer driver: preprocesses both meshes, builds the donor tree, and
//! resolves every target triangle into a donor stencil record.

use crate::config::{SymmetryMode, TransferConfig};
use crate::errors::{ResolveFailure, TransferError};
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::resolve::query::FoundKind;
use crate::resolve::resolver::Resolver;
use crate::tree::{BuildStats, SearchTree, SurfacePoint};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Sentinel written into every channel of an unresolved target record.
pub const UNSET_VALUE: Real = -999.0;

/// How a target triangle was (or was not) resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    /// Resolved through a valid or near-valid interpolation stencil.
    Stencil,
    /// Resolved through the closest-point fallback.
    Closest,
    /// Unresolved; the record carries zero weights and sentinel values.
    Unresolved(ResolveFailure),
}

/// Per-target output: donor stencil node indices, weights summing to one
/// (all zero when unresolved), and the interpolated field vector (sentinel
/// values when unresolved). `status` is the authoritative marker.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRecord {
    pub donor_nodes: [usize; 3],
    pub weights: [Real; 3],
    pub values: Vec<Real>,
    pub status: TargetStatus,
}

/// Diagnostic counters accumulated over a run and reported once at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferStats {
    pub out_of_box: usize,
    pub no_donor: usize,
    pub normals_relaxed: usize,
    pub closest_fallback: usize,
    pub symmetry_rejected: usize,
    pub implausible: usize,
    pub max_search_radius: Real,
    pub tree: BuildStats,
}

/// The full result of a transfer: one record per target triangle, in target
/// order, plus the diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOutcome {
    pub records: Vec<TargetRecord>,
    pub stats: TransferStats,
}

struct TriOutcome {
    record: TargetRecord,
    search_radius: Real,
    normals_relaxed: bool,
}

/// Transfer the donor mesh's element fields onto the target mesh.
///
/// Both meshes are preprocessed in place (centroids, normals, donor nodal
/// values); the donor tree is built once and discarded at the end. Every
/// target triangle yields a record — per-target failures never abort the
/// run. The only fatal condition is an empty donor mesh.
pub fn transfer(
    donor: &mut Mesh,
    target: &mut Mesh,
    config: &TransferConfig,
) -> Result<TransferOutcome, TransferError> {
    if donor.tris.is_empty() {
        return Err(TransferError::EmptyDonorMesh);
    }

    if config.unit_scale != 1.0 {
        target.scale(config.unit_scale);
    }

    donor.compute_centroids();
    donor.compute_normals();
    target.compute_centroids();
    target.compute_normals();
    log::debug!("donor bounds: {:?}", donor.bounding_box());
    if !target.nodes.is_empty() {
        log::debug!("target bounds: {:?}", target.bounding_box());
    }

    if config.swap_donor_normals {
        donor.flip_normals();
    }

    donor.scatter_to_nodes();

    let points = SurfacePoint::collect(donor);
    let (tree, tree_stats) = SearchTree::build(points, config.leaf_size);
    log::debug!(
        "search tree: {} interior / {} terminal nodes over {} donors, depth {}",
        tree_stats.interior,
        tree_stats.terminal,
        tree_stats.points,
        tree_stats.max_depth
    );

    let donor: &Mesh = donor;
    let resolver = Resolver::new(&tree, donor, config);
    let axis = config.symmetry_axis.index();
    let axis_tol = resolver.box_tolerance()[axis];
    let channels = donor.channels();

    let outcomes = process_targets(target, &resolver, donor, config, axis, axis_tol, channels);

    let mut stats = TransferStats {
        tree: tree_stats,
        ..TransferStats::default()
    };
    let mut records = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome.record.status {
            TargetStatus::Stencil | TargetStatus::Closest => {
                if outcome.record.status == TargetStatus::Closest {
                    stats.closest_fallback += 1;
                }
                if outcome.normals_relaxed {
                    stats.normals_relaxed += 1;
                }
                stats.max_search_radius = stats.max_search_radius.max(outcome.search_radius);
            },
            TargetStatus::Unresolved(failure) => match failure {
                ResolveFailure::OutOfDomain => stats.out_of_box += 1,
                ResolveFailure::NoPlausibleDonor => stats.no_donor += 1,
                ResolveFailure::SymmetryMismatch => stats.symmetry_rejected += 1,
                ResolveFailure::ImplausibleDistance => stats.implausible += 1,
            },
        }
        records.push(outcome.record);
    }

    log_summary(&stats);
    Ok(TransferOutcome { records, stats })
}

#[cfg(not(feature = "parallel"))]
fn process_targets(
    target: &Mesh,
    resolver: &Resolver<'_>,
    donor: &Mesh,
    config: &TransferConfig,
    axis: usize,
    axis_tol: Real,
    channels: usize,
) -> Vec<TriOutcome> {
    target
        .tris
        .iter()
        .map(|tri| process_one(tri.centroid, tri.normal, tri.area, resolver, donor, config, axis, axis_tol, channels))
        .collect()
}

#[cfg(feature = "parallel")]
fn process_targets(
    target: &Mesh,
    resolver: &Resolver<'_>,
    donor: &Mesh,
    config: &TransferConfig,
    axis: usize,
    axis_tol: Real,
    channels: usize,
) -> Vec<TriOutcome> {
    target
        .tris
        .par_iter()
        .map(|tri| process_one(tri.centroid, tri.normal, tri.area, resolver, donor, config, axis, axis_tol, channels))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn process_one(
    mut point: Point3<Real>,
    mut normal: Vector3<Real>,
    area: Real,
    resolver: &Resolver<'_>,
    donor: &Mesh,
    config: &TransferConfig,
    axis: usize,
    axis_tol: Real,
    channels: usize,
) -> TriOutcome {
    match config.symmetry {
        SymmetryMode::FoldPositive if point[axis] < 0.0 => {
            point[axis] = -point[axis];
            normal[axis] = -normal[axis];
        },
        SymmetryMode::FoldNegative if point[axis] > 0.0 => {
            point[axis] = -point[axis];
            normal[axis] = -normal[axis];
        },
        _ => {},
    }

    match resolver.resolve(point, normal, area) {
        Ok(donor_match) => {
            if config.symmetry != SymmetryMode::None {
                // A donor stencil on the wrong side of the symmetry plane
                // cannot feed a folded query.
                let side: Real = donor_match
                    .nodes
                    .iter()
                    .map(|&n| donor.nodes[n].pos[axis])
                    .sum();
                if point[axis] * side < 0.0 && side.abs() > axis_tol {
                    return unresolved(ResolveFailure::SymmetryMismatch, channels);
                }
            }
            let status = match donor_match.kind {
                FoundKind::Stencil => TargetStatus::Stencil,
                FoundKind::Closest => TargetStatus::Closest,
                FoundKind::None => unreachable!("resolver returned an empty match"),
            };
            TriOutcome {
                record: TargetRecord {
                    donor_nodes: donor_match.nodes,
                    weights: donor_match.weights,
                    values: donor_match.values,
                    status,
                },
                search_radius: donor_match.search_radius,
                normals_relaxed: donor_match.normals_relaxed,
            }
        },
        Err(failure) => unresolved(failure, channels),
    }
}

fn unresolved(failure: ResolveFailure, channels: usize) -> TriOutcome {
    TriOutcome {
        record: TargetRecord {
            donor_nodes: [0; 3],
            weights: [0.0; 3],
            values: vec![UNSET_VALUE; channels],
            status: TargetStatus::Unresolved(failure),
        },
        search_radius: 0.0,
        normals_relaxed: false,
    }
}

fn log_summary(stats: &TransferStats) {
    log::info!(
        "used closest-point fallback for {} targets",
        stats.closest_fallback
    );
    log::info!(
        "relaxed normal constraints for {} targets",
        stats.normals_relaxed
    );
    log::info!("maximum search radius: {}", stats.max_search_radius);
    if stats.out_of_box > 0 {
        log::info!(
            "{} targets lie outside the donor bounding box",
            stats.out_of_box
        );
    }
    if stats.no_donor + stats.symmetry_rejected + stats.implausible > 0 {
        log::info!(
            "unresolved targets: {} without donor, {} symmetry-rejected, {} implausible",
            stats.no_donor,
            stats.symmetry_rejected,
            stats.implausible
        );
    }
}
