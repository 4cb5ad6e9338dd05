use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Axis-aligned bounding box over mesh node positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub mins: Point3<Real>,
    pub maxs: Point3<Real>,
}

impl Aabb {
    #[inline]
    pub const fn new(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        Self { mins, maxs }
    }

    /// Smallest box containing all `points`; `None` for an empty set.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<Real>>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut boxed = Self::new(first, first);
        for p in iter {
            for i in 0..3 {
                if p[i] < boxed.mins[i] {
                    boxed.mins[i] = p[i];
                }
                if p[i] > boxed.maxs[i] {
                    boxed.maxs[i] = p[i];
                }
            }
        }
        Some(boxed)
    }

    #[inline]
    pub fn extent(&self) -> Vector3<Real> {
        self.maxs - self.mins
    }

    /// Containment test with a per-axis slack, so points marginally outside
    /// the box still count as inside.
    #[inline]
    pub fn contains_with_tolerance(&self, p: &Point3<Real>, tol: &Vector3<Real>) -> bool {
        (0..3).all(|i| p[i] - self.mins[i] >= -tol[i] && self.maxs[i] - p[i] >= -tol[i])
    }
}
