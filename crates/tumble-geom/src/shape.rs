//! Collision shape variants.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::hull::ConvexPolyhedron;

/// Collision shape attached to a body.
///
/// Dispatch between shape pairs is a plain `match` in the narrow phase;
/// there is no virtual shape trait.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Shape {
    /// Infinite plane: local z = 0, outward normal +Z.
    Plane,
    /// Sphere around the local origin.
    Sphere {
        /// Sphere radius.
        radius: f32,
    },
    /// Convex hull.
    Convex {
        /// The hull geometry, shared by value.
        hull: ConvexPolyhedron,
    },
}

impl Shape {
    /// The canonical z = 0 plane.
    pub fn plane() -> Self {
        Shape::Plane
    }

    /// A sphere of the given radius.
    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere { radius }
    }

    /// A box hull from half-extents.
    pub fn cuboid(half_extents: Vec3) -> Self {
        Shape::Convex {
            hull: ConvexPolyhedron::cuboid(half_extents),
        }
    }

    /// Wraps an existing hull.
    pub fn convex(hull: ConvexPolyhedron) -> Self {
        Shape::Convex { hull }
    }

    /// The hull, if this shape is convex.
    pub fn as_convex(&self) -> Option<&ConvexPolyhedron> {
        match self {
            Shape::Convex { hull } => Some(hull),
            _ => None,
        }
    }
}
