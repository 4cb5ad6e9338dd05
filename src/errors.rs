//! Transfer errors and per-target resolution failures

use thiserror::Error;

/// Fatal errors that abort a whole transfer before any per-target work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The donor mesh holds no triangles, so no partial result is meaningful.
    #[error("donor mesh contains no triangles")]
    EmptyDonorMesh,
}

/// Per-target failures. None of these abort the transfer: each yields a
/// sentinel record for its target triangle and bumps a diagnostic counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveFailure {
    /// The target centroid lies outside the (tolerance-expanded) donor
    /// bounding box while strict domain checking is active.
    #[error("target lies outside the donor bounding box")]
    OutOfDomain,
    /// The tree search exhausted every retry, including the normals-relaxed
    /// pass, without producing a single candidate.
    #[error("no plausible donor found after exhausting search retries")]
    NoPlausibleDonor,
    /// The resolved donor stencil sits on the wrong side of the symmetry
    /// plane for the folded target.
    #[error("donor stencil straddles the symmetry plane")]
    SymmetryMismatch,
    /// The match survived the search but its distance is out of proportion
    /// to the donor element's own scale.
    #[error("match distance is implausible for the donor element scale")]
    ImplausibleDistance,
}
