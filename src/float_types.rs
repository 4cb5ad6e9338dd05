// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

/// Tolerance used by degenerate-geometry guards across the crate.
#[cfg(feature = "f32")]
pub const EPSILON: Real = 1e-4;
/// Tolerance used by degenerate-geometry guards across the crate.
#[cfg(feature = "f64")]
pub const EPSILON: Real = 1e-10;

/// Archimedes' constant (π)
#[cfg(feature = "f32")]
pub const PI: Real = core::f32::consts::PI;
/// Archimedes' constant (π)
#[cfg(feature = "f64")]
pub const PI: Real = core::f64::consts::PI;
