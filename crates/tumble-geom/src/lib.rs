//! Convex geometry for the tumble rigid body engine.
//!
//! This crate holds the shape-side half of the simulation:
//!
//! - [`Transform`] - rigid pose (position + rotation), local-to-world mapping
//! - [`ConvexPolyhedron`] - immutable convex hull with faces, outward
//!   normals, and unique edge directions
//! - [`Shape`] - tagged collision shape (plane, sphere, convex hull)
//! - [`clip_polygon_against_plane`] - Sutherland-Hodgman half-space clip
//! - [`separating_axis`] / [`clip_against_hull`] - SAT test and
//!   reference-face clipping between two transformed hulls
//!
//! All approximate comparisons go through [`approx_eq`] / [`approx_eq_vec3`]
//! with a single shared [`EPSILON`].

use glam::Vec3;

pub mod clip;
pub mod error;
pub mod hull;
pub mod sat;
pub mod shape;
pub mod transform;

pub use clip::{ClipPoint, clip_against_hull, clip_polygon_against_plane};
pub use error::HullError;
pub use hull::ConvexPolyhedron;
pub use sat::separating_axis;
pub use shape::Shape;
pub use transform::Transform;

/// Shared tolerance for approximate comparisons: edge uniqueness, axis
/// length, coplanarity, convexity.
pub const EPSILON: f32 = 1.0e-4;

/// Approximate scalar equality within [`EPSILON`].
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}

/// Approximate component-wise vector equality within [`EPSILON`].
#[inline]
pub fn approx_eq_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() <= EPSILON
}
