//! Donor resolution against the spatial partition tree.

pub mod candidate;
pub mod query;
pub mod resolver;

pub use candidate::{CandidateTest, NearestTest, StencilTest};
pub use query::{DonorMatch, FoundKind, Query};
pub use resolver::Resolver;
