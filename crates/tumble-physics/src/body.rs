//! Rigid bodies.

use glam::{Mat3, Quat, Vec3};
use tumble_geom::{Shape, Transform};

use crate::ids::ShapeId;

#[derive(Clone, Debug)]
struct AttachedShape {
    shape: Shape,
    local: Transform,
}

/// A rigid body: pose, velocities, force accumulators, and attached shapes.
///
/// A body starts massless, which makes it static (`inv_mass == 0`); give it
/// mass with [`Body::set_mass`] to let the solver move it. Force and torque
/// accumulators are cleared at the end of every world step.
#[derive(Clone, Debug)]
pub struct Body {
    /// Position in world space.
    pub position: Vec3,
    /// Orientation as quaternion.
    pub rotation: Quat,
    /// Linear velocity.
    pub velocity: Vec3,
    /// Angular velocity.
    pub angular_velocity: Vec3,
    /// Mass (0 = infinite/static).
    pub mass: f32,
    /// Inverse mass (cached; 0 for static bodies).
    pub inv_mass: f32,
    shapes: Vec<AttachedShape>,
    pub(crate) force: Vec3,
    pub(crate) torque: Vec3,
}

impl Default for Body {
    fn default() -> Self {
        Self::new()
    }
}

impl Body {
    /// Creates a static body at the origin with no shapes.
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: 0.0,
            inv_mass: 0.0,
            shapes: Vec::new(),
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    /// Sets the mass, recomputing the cached inverse. Zero mass makes the
    /// body static.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inv_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
    }

    /// Whether the solver will never move this body.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Attaches a shape at the body origin.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        self.add_shape_at(shape, Transform::IDENTITY)
    }

    /// Attaches a shape with a local offset from the body frame.
    pub fn add_shape_at(&mut self, shape: Shape, local: Transform) -> ShapeId {
        let id = ShapeId(self.shapes.len() as u32);
        self.shapes.push(AttachedShape { shape, local });
        id
    }

    /// The shape behind a handle.
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.index()).map(|s| &s.shape)
    }

    /// Iterates attached shapes with their local transforms, in id order.
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape, &Transform)> {
        self.shapes
            .iter()
            .enumerate()
            .map(|(i, s)| (ShapeId(i as u32), &s.shape, &s.local))
    }

    /// The body pose as a transform.
    #[inline]
    pub fn pose(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }

    /// World transform of an attached shape (body pose composed with the
    /// shape's local offset).
    pub fn shape_world_transform(&self, id: ShapeId) -> Option<Transform> {
        self.shapes
            .get(id.index())
            .map(|s| self.pose().then(&s.local))
    }

    /// Translates the body.
    pub fn offset_by(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Rotates the body pose around a world axis.
    pub fn rotate_by(&mut self, axis: Vec3, angle: f32) {
        let rotation = Quat::from_axis_angle(axis.normalize(), angle);
        self.rotation = (rotation * self.rotation).normalize();
    }

    /// Accumulates a force at the center of mass for this step.
    pub fn apply_force(&mut self, force: Vec3) {
        if !self.is_static() {
            self.force += force;
        }
    }

    /// Accumulates a torque for this step.
    pub fn apply_torque(&mut self, torque: Vec3) {
        if !self.is_static() {
            self.torque += torque;
        }
    }

    /// Velocity of a world-space point rigidly attached to the body.
    pub fn velocity_at_point(&self, point: Vec3) -> Vec3 {
        self.velocity + self.angular_velocity.cross(point - self.position)
    }

    /// World-space inverse inertia tensor.
    ///
    /// Kept as inverse-mass-scaled identity, which is rotation invariant
    /// and adequate for the box-like bodies the solver targets.
    #[inline]
    pub fn inv_inertia_world(&self) -> Mat3 {
        Mat3::from_diagonal(Vec3::splat(self.inv_mass))
    }

    pub(crate) fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_new_body_is_static() {
        let body = Body::new();
        assert!(body.is_static());
        assert_eq!(body.inv_mass, 0.0);
    }

    #[test]
    fn test_set_mass_updates_inverse() {
        let mut body = Body::new();
        body.set_mass(4.0);
        assert!(!body.is_static());
        assert_eq!(body.inv_mass, 0.25);
        body.set_mass(0.0);
        assert!(body.is_static());
    }

    #[test]
    fn test_shape_ids_are_dense() {
        let mut body = Body::new();
        let a = body.add_shape(Shape::sphere(1.0));
        let b = body.add_shape(Shape::plane());
        assert_eq!(a, ShapeId(0));
        assert_eq!(b, ShapeId(1));
        assert!(body.shape(b).is_some());
    }

    #[test]
    fn test_static_body_ignores_forces() {
        let mut body = Body::new();
        body.apply_force(Vec3::X * 100.0);
        body.apply_torque(Vec3::Y);
        assert_eq!(body.force, Vec3::ZERO);
        assert_eq!(body.torque, Vec3::ZERO);
    }

    #[test]
    fn test_shape_world_transform_composes_offset() {
        let mut body = Body::new();
        let id = body.add_shape_at(
            Shape::sphere(0.5),
            Transform::from_position(Vec3::new(0.0, 0.0, 1.0)),
        );
        body.offset_by(Vec3::new(2.0, 0.0, 0.0));
        body.rotate_by(Vec3::X, FRAC_PI_2);

        let t = body.shape_world_transform(id).unwrap();
        // The +Z offset rotates onto -Y before translating.
        assert!((t.position - Vec3::new(2.0, -1.0, 0.0)).length() < 1.0e-5);
    }

    #[test]
    fn test_velocity_at_point() {
        let mut body = Body::new();
        body.set_mass(1.0);
        body.velocity = Vec3::X;
        body.angular_velocity = Vec3::Z;
        // Spinning about +Z: a point at +X picks up +Y surface speed.
        let v = body.velocity_at_point(Vec3::X);
        assert!((v - Vec3::new(1.0, 1.0, 0.0)).length() < 1.0e-6);
    }
}
