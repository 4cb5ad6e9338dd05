//! Donor resolution: bounding-box gate, retryable tree descent with radius
//! widening, orientation relaxation, and the scale-relative outlier filter.

use crate::aabb::Aabb;
use crate::config::TransferConfig;
use crate::errors::ResolveFailure;
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::resolve::candidate::StencilTest;
use crate::resolve::query::{DonorMatch, FoundKind, Query};
use crate::tree::SearchTree;
use nalgebra::{Point3, Vector3};

/// Resolves target queries against a built donor tree. Read-only once
/// constructed, so resolutions for different targets may run concurrently.
#[derive(Debug)]
pub struct Resolver<'a> {
    tree: &'a SearchTree,
    test: StencilTest,
    donor_box: Aabb,
    box_tolerance: Vector3<Real>,
    /// Squared axis-gap bound used while a search pass has found nothing.
    gap_tolerance: Real,
    config: &'a TransferConfig,
    channels: usize,
}

impl<'a> Resolver<'a> {
    /// `donor` must be preprocessed (bounding box derivable); the tree must
    /// have been built from the same mesh.
    pub fn new(tree: &'a SearchTree, donor: &Mesh, config: &'a TransferConfig) -> Self {
        let donor_box = *donor.bounding_box();
        let box_tolerance = donor_box.extent() * config.box_tolerance_frac;
        let gap = 2.0 * box_tolerance[0].max(box_tolerance[1]).max(box_tolerance[2]);
        Self {
            tree,
            test: StencilTest::new(config),
            donor_box,
            box_tolerance,
            gap_tolerance: gap * gap,
            config,
            channels: donor.channels(),
        }
    }

    /// Per-axis bounding-box slack, 1% of each extent by default.
    pub const fn box_tolerance(&self) -> &Vector3<Real> {
        &self.box_tolerance
    }

    /// Find the best donor stencil for a target centroid/normal/area, or
    /// report why none is acceptable.
    pub fn resolve(
        &self,
        point: Point3<Real>,
        normal: Vector3<Real>,
        area: Real,
    ) -> Result<DonorMatch, ResolveFailure> {
        if !self.config.ignore_bounding_box
            && !self
                .donor_box
                .contains_with_tolerance(&point, &self.box_tolerance)
        {
            return Err(ResolveFailure::OutOfDomain);
        }

        let mut query = Query::new(point, normal, area, self.channels);
        loop {
            query.search_radius = 1.0;
            let mut pass = 1;
            while pass <= self.config.max_retries && query.found != FoundKind::Stencil {
                query.reset();
                self.tree.search(&mut query, &self.test, self.gap_tolerance);
                if query.found != FoundKind::Stencil && pass < self.config.max_retries {
                    query.search_radius += self.config.radius_increment;
                }
                pass += 1;
            }
            if query.found != FoundKind::None {
                break;
            }
            // Nothing at all: relax the orientation gate once unless the
            // caller demanded strict interpolation.
            if query.ignore_normals || self.config.strict {
                return Err(ResolveFailure::NoPlausibleDonor);
            }
            query.ignore_normals = true;
        }

        let (dist2, factor) = match query.found {
            FoundKind::Stencil => (query.stencil_dist2, self.config.stencil_distance_factor),
            FoundKind::Closest => (query.closest_dist2, self.config.closest_distance_factor),
            FoundKind::None => unreachable!("search loop exits only with a match"),
        };
        let distance = dist2.sqrt();
        if distance > factor * query.donor_area.sqrt() {
            return Err(ResolveFailure::ImplausibleDistance);
        }

        Ok(DonorMatch {
            kind: query.found,
            donor_tri: query.donor_tri,
            nodes: query.nodes,
            weights: query.weights,
            values: query.values,
            distance,
            search_radius: query.search_radius,
            normals_relaxed: query.ignore_normals,
        })
    }
}
