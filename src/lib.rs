//! Scalar surface-field transfer between **independently triangulated
//! meshes** covering the same geometry, built around a binary spatial
//! partition tree over donor-triangle centroids.
//!
//! Given a donor mesh carrying per-triangle field samples (pressure
//! coefficients, circulation strengths, ...) and a target mesh with no
//! shared connectivity, [`transfer`] finds the best-matching donor triangle
//! for every target triangle — subject to surface-orientation agreement and
//! interpolation-stencil soundness — and produces area-based interpolation
//! weights and clamped field values, degrading gracefully where no
//! plausible donor exists.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to resolve target triangles concurrently

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod aabb;
pub mod config;
pub mod errors;
pub mod float_types;
pub mod interp;
pub mod mesh;
pub mod resolve;
pub mod transfer;
pub mod tree;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use config::{Axis, SymmetryMode, TransferConfig};
pub use errors::{ResolveFailure, TransferError};
pub use mesh::Mesh;
pub use transfer::{TargetRecord, TargetStatus, TransferOutcome, TransferStats, transfer};
