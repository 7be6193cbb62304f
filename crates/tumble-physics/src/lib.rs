//! Rigid body dynamics for tumble.
//!
//! Simulates convex rigid bodies under gravity with normal-direction
//! contact resolution, so boxes stack, collide, and come to rest on planes
//! without sinking through:
//!
//! - [`Body`] - mass, pose, velocities, force accumulators, attached shapes
//! - [`World`] - body registry, gravity, per-step pipeline, fold read-out
//! - [`ContactEquation`] - per-step contact constraints from the narrow phase
//! - [`StepSettings`] - solver sweep count and Baumgarte coefficient
//! - [`PairSource`] / [`ExhaustivePairs`] - broad-phase seam
//!
//! A step runs synchronously: gravity, narrow phase over candidate pairs,
//! fixed-count Gauss-Seidel contact relaxation, semi-implicit Euler
//! integration, accumulator clear. Same world in, same world out: stepping
//! is deterministic for a given body insertion order.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use tumble_geom::Shape;
//! use tumble_physics::{Body, World};
//!
//! let mut world = World::new();
//! world.set_gravity(Vec3::new(0.0, 0.0, -10.0));
//!
//! // Static ground plane at the origin, normal +Z.
//! let mut ground = Body::new();
//! ground.add_shape(Shape::plane());
//! world.add_body(ground);
//!
//! // A unit cube dropped from above.
//! let mut cube = Body::new();
//! cube.set_mass(1.0);
//! cube.add_shape(Shape::cuboid(Vec3::splat(0.5)));
//! cube.offset_by(Vec3::new(0.0, 0.0, 3.0));
//! let id = world.add_body(cube);
//!
//! for _ in 0..240 {
//!     world.step(1.0 / 60.0);
//! }
//!
//! // The cube rests on the plane instead of falling through.
//! let z = world.body(id).unwrap().position.z;
//! assert!(z > 0.0 && z < 1.0);
//! ```

pub mod body;
pub mod ids;
pub mod narrowphase;
pub mod solver;
pub mod world;

pub use body::Body;
pub use ids::{BodyId, ShapeId};
pub use narrowphase::ContactEquation;
pub use solver::StepSettings;
pub use world::{
    ContactEntry, EdgeEntry, ExhaustivePairs, FaceNormalEntry, PairSource, ShapeEntry, World,
};
