//! Physics simulation world.
//!
//! The [`World`] owns every body, drives the per-step pipeline (gravity,
//! narrow phase, contact relaxation, integration, accumulator clear, in
//! that order), and exposes fold-based read-out for render hosts.

use glam::{Mat4, Vec3};
use tumble_geom::Shape;

use crate::body::Body;
use crate::ids::{BodyId, ShapeId};
use crate::narrowphase::{ContactEquation, generate_contacts};
use crate::solver::{StepSettings, integrate_forces, integrate_poses, solve_contacts};

/// A source of candidate body pairs for the narrow phase.
///
/// The default is exhaustive enumeration; an accelerated broad phase can be
/// plugged in through [`World::step_with`] without touching the rest of the
/// pipeline. Implementations must return pairs with the lower id first, in
/// ascending order, so stepping stays deterministic.
pub trait PairSource {
    /// Candidate pairs for this step.
    fn pairs(&mut self, bodies: &[Body]) -> Vec<(BodyId, BodyId)>;
}

/// The O(n^2) pair source: every unordered body pair `{i, j}` with `i < j`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExhaustivePairs;

impl PairSource for ExhaustivePairs {
    fn pairs(&mut self, bodies: &[Body]) -> Vec<(BodyId, BodyId)> {
        let n = bodies.len() as u32;
        let mut out = Vec::with_capacity((bodies.len() * bodies.len().saturating_sub(1)) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                out.push((BodyId(i), BodyId(j)));
            }
        }
        out
    }
}

/// One shape occurrence yielded by [`World::fold_shapes`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeEntry {
    /// Owning body.
    pub body: BodyId,
    /// Shape handle within the body.
    pub shape: ShapeId,
    /// World matrix composing body pose and shape offset.
    pub transform: Mat4,
}

/// One contact point yielded by [`World::fold_contacts`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEntry {
    /// First body of the pair.
    pub body1: BodyId,
    /// Second body of the pair.
    pub body2: BodyId,
    /// Contact point in world space.
    pub point: Vec3,
    /// Contact normal, from body1 toward body2.
    pub normal: Vec3,
}

/// One face normal yielded by [`World::fold_face_normals`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceNormalEntry {
    /// Owning body.
    pub body: BodyId,
    /// Owning shape.
    pub shape: ShapeId,
    /// Outward face normal in world space.
    pub normal: Vec3,
    /// Face centroid in world space.
    pub center: Vec3,
}

/// One unique edge direction yielded by [`World::fold_unique_edges`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeEntry {
    /// Owning body.
    pub body: BodyId,
    /// Owning shape.
    pub shape: ShapeId,
    /// Unit edge direction in world space.
    pub direction: Vec3,
}

/// The simulation world: body registry, gravity, and step orchestration.
#[derive(Default)]
pub struct World {
    bodies: Vec<Body>,
    gravity: Vec3,
    settings: StepSettings,
    contacts: Vec<ContactEquation>,
}

impl World {
    /// Creates an empty world with zero gravity and default solver settings.
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            gravity: Vec3::ZERO,
            settings: StepSettings::default(),
            contacts: Vec::new(),
        }
    }

    /// Creates an empty world with explicit solver settings.
    pub fn with_settings(settings: StepSettings) -> Self {
        Self {
            settings,
            ..Self::new()
        }
    }

    /// Sets the gravity acceleration applied to every dynamic body.
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    /// Current gravity.
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Adds a body, returning its dense id (previous body count).
    pub fn add_body(&mut self, body: Body) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(body);
        id
    }

    /// The body behind a handle.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    /// Mutable access to a body.
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.index())
    }

    /// All bodies in id order.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the world holds no bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Advances the simulation by `dt` seconds using exhaustive pair
    /// enumeration.
    pub fn step(&mut self, dt: f32) {
        self.step_with(dt, &mut ExhaustivePairs);
    }

    /// Advances the simulation by `dt` seconds with a caller-supplied pair
    /// source.
    ///
    /// Runs to completion synchronously: gravity, narrow phase, contact
    /// relaxation, pose integration, accumulator clear.
    pub fn step_with<P: PairSource>(&mut self, dt: f32, broadphase: &mut P) {
        if dt <= 0.0 {
            return;
        }
        integrate_forces(&mut self.bodies, self.gravity, dt);

        let pairs = broadphase.pairs(&self.bodies);
        self.contacts.clear();
        generate_contacts(&self.bodies, &pairs, &mut self.contacts);

        solve_contacts(&mut self.bodies, &self.contacts, dt, &self.settings);
        integrate_poses(&mut self.bodies, dt);
    }

    /// Folds over every shape of every body, in id order.
    pub fn fold_shapes<A, F>(&self, init: A, mut f: F) -> A
    where
        F: FnMut(A, ShapeEntry) -> A,
    {
        let mut acc = init;
        for (b, body) in self.bodies.iter().enumerate() {
            for (shape_id, _, local) in body.shapes() {
                acc = f(
                    acc,
                    ShapeEntry {
                        body: BodyId(b as u32),
                        shape: shape_id,
                        transform: body.pose().then(local).to_matrix(),
                    },
                );
            }
        }
        acc
    }

    /// Folds over the contact points produced by the most recent step.
    pub fn fold_contacts<A, F>(&self, init: A, mut f: F) -> A
    where
        F: FnMut(A, ContactEntry) -> A,
    {
        let mut acc = init;
        for contact in &self.contacts {
            let point = self.bodies[contact.body1.index()].position + contact.ri;
            acc = f(
                acc,
                ContactEntry {
                    body1: contact.body1,
                    body2: contact.body2,
                    point,
                    normal: contact.ni,
                },
            );
        }
        acc
    }

    /// Folds over the world-space face normals of every convex shape.
    /// Planes and spheres are skipped.
    pub fn fold_face_normals<A, F>(&self, init: A, mut f: F) -> A
    where
        F: FnMut(A, FaceNormalEntry) -> A,
    {
        let mut acc = init;
        for (b, body) in self.bodies.iter().enumerate() {
            for (shape_id, shape, local) in body.shapes() {
                let Shape::Convex { hull } = shape else {
                    continue;
                };
                let t = body.pose().then(local);
                for (face, &normal) in hull.normals().iter().enumerate() {
                    let vertices = hull.world_face_vertices(&t, face);
                    let center = vertices.iter().sum::<Vec3>() / vertices.len() as f32;
                    acc = f(
                        acc,
                        FaceNormalEntry {
                            body: BodyId(b as u32),
                            shape: shape_id,
                            normal: t.vector_to_world(normal),
                            center,
                        },
                    );
                }
            }
        }
        acc
    }

    /// Folds over the world-space unique edge directions of every convex
    /// shape. Planes and spheres are skipped.
    pub fn fold_unique_edges<A, F>(&self, init: A, mut f: F) -> A
    where
        F: FnMut(A, EdgeEntry) -> A,
    {
        let mut acc = init;
        for (b, body) in self.bodies.iter().enumerate() {
            for (shape_id, shape, local) in body.shapes() {
                let Shape::Convex { hull } = shape else {
                    continue;
                };
                let t = body.pose().then(local);
                for &edge in hull.unique_edges() {
                    acc = f(
                        acc,
                        EdgeEntry {
                            body: BodyId(b as u32),
                            shape: shape_id,
                            direction: t.vector_to_world(edge),
                        },
                    );
                }
            }
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tumble_geom::Transform;

    const DT: f32 = 1.0 / 60.0;

    fn ground_plane_at(z: f32) -> Body {
        let mut body = Body::new();
        body.add_shape(Shape::plane());
        body.position = Vec3::new(0.0, 0.0, z);
        body
    }

    fn dynamic_box(half: f32, z: f32) -> Body {
        let mut body = Body::new();
        body.set_mass(1.0);
        body.add_shape(Shape::cuboid(Vec3::splat(half)));
        body.position = Vec3::new(0.0, 0.0, z);
        body
    }

    #[test]
    fn test_body_ids_are_dense() {
        let mut world = World::new();
        assert_eq!(world.add_body(Body::new()), BodyId(0));
        assert_eq!(world.add_body(Body::new()), BodyId(1));
        assert_eq!(world.add_body(Body::new()), BodyId(2));
        assert_eq!(world.len(), 3);
    }

    #[test]
    fn test_free_body_moves_by_velocity() {
        let mut world = World::new();
        let mut body = dynamic_box(0.5, 0.0);
        body.velocity = Vec3::new(1.0, -2.0, 3.0);
        let id = world.add_body(body);

        world.step(DT);

        let p = world.body(id).unwrap().position;
        assert!((p - Vec3::new(1.0, -2.0, 3.0) * DT).length() < 1.0e-6);
    }

    #[test]
    fn test_gravity_accelerates_dynamic_bodies_only() {
        let mut world = World::new();
        world.set_gravity(Vec3::new(0.0, 0.0, -10.0));
        let falling = world.add_body(dynamic_box(0.5, 10.0));
        let fixed = world.add_body(ground_plane_at(0.0));

        world.step(DT);

        assert!(world.body(falling).unwrap().velocity.z < 0.0);
        assert_eq!(world.body(fixed).unwrap().velocity, Vec3::ZERO);
    }

    #[test]
    fn test_box_rests_on_plane() {
        // Gravity (0,0,-10), plane at z = -1, unit box dropped from z = 2:
        // after two seconds of steps it sits on the plane, not through it.
        let mut world = World::new();
        world.set_gravity(Vec3::new(0.0, 0.0, -10.0));
        world.add_body(ground_plane_at(-1.0));
        let boxid = world.add_body(dynamic_box(1.0, 2.0));

        for _ in 0..120 {
            world.step(DT);
        }

        let body = world.body(boxid).unwrap();
        assert!(
            body.position.z > -0.5 && body.position.z < 0.5,
            "z = {}",
            body.position.z
        );
        assert!(body.velocity.length() < 1.0, "|v| = {}", body.velocity.length());
    }

    #[test]
    fn test_stacked_boxes_settle() {
        let mut world = World::new();
        world.set_gravity(Vec3::new(0.0, 0.0, -10.0));
        world.add_body(ground_plane_at(0.0));
        let lower = world.add_body(dynamic_box(0.5, 0.6));
        let upper = world.add_body(dynamic_box(0.5, 1.8));

        for _ in 0..240 {
            world.step(DT);
        }

        let z1 = world.body(lower).unwrap().position.z;
        let z2 = world.body(upper).unwrap().position.z;
        assert!(z1 > 0.2, "lower box sank to {z1}");
        assert!(z2 > z1 + 0.5, "stack collapsed: {z1} vs {z2}");
    }

    #[test]
    fn test_stepping_is_deterministic() {
        let build = || {
            let mut world = World::new();
            world.set_gravity(Vec3::new(0.0, 0.0, -10.0));
            world.add_body(ground_plane_at(0.0));
            let mut tilted = dynamic_box(0.5, 2.0);
            tilted.rotate_by(Vec3::new(1.0, 1.0, 0.0), 0.3);
            world.add_body(tilted);
            world
        };
        let mut a = build();
        let mut b = build();
        for _ in 0..90 {
            a.step(DT);
            b.step(DT);
        }
        let pa = a.body(BodyId(1)).unwrap();
        let pb = b.body(BodyId(1)).unwrap();
        assert_eq!(pa.position, pb.position);
        assert_eq!(pa.rotation, pb.rotation);
    }

    #[test]
    fn test_zero_dt_is_a_no_op() {
        let mut world = World::new();
        world.set_gravity(Vec3::new(0.0, 0.0, -10.0));
        let id = world.add_body(dynamic_box(0.5, 1.0));
        world.step(0.0);
        assert_eq!(world.body(id).unwrap().position, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(world.body(id).unwrap().velocity, Vec3::ZERO);
    }

    #[test]
    fn test_fold_shapes_composes_transforms() {
        let mut world = World::new();
        let mut body = Body::new();
        body.add_shape(Shape::plane());
        body.add_shape_at(
            Shape::cuboid(Vec3::splat(0.5)),
            Transform::from_position(Vec3::new(0.0, 0.0, 2.0)),
        );
        body.position = Vec3::new(1.0, 0.0, 0.0);
        world.add_body(body);

        let entries = world.fold_shapes(Vec::new(), |mut acc, e| {
            acc.push(e);
            acc
        });
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].shape, ShapeId(0));
        // The offset shape's matrix carries body position + local offset.
        let origin = entries[1].transform.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 0.0, 2.0)).length() < 1.0e-5);
    }

    #[test]
    fn test_fold_contacts_yields_world_points() {
        let mut world = World::new();
        world.set_gravity(Vec3::new(0.0, 0.0, -10.0));
        world.add_body(ground_plane_at(0.0));
        world.add_body(dynamic_box(0.5, 0.45));

        world.step(DT);

        let contacts = world.fold_contacts(Vec::new(), |mut acc, c| {
            acc.push(c);
            acc
        });
        assert_eq!(contacts.len(), 4);
        for c in &contacts {
            assert_eq!(c.normal, Vec3::Z);
            // Points sit on the plane surface.
            assert!(c.point.z.abs() < 1.0e-4, "z = {}", c.point.z);
        }
    }

    #[test]
    fn test_fold_face_normals_skips_non_convex() {
        let mut world = World::new();
        let mut body = Body::new();
        body.add_shape(Shape::plane());
        body.add_shape(Shape::sphere(1.0));
        body.add_shape(Shape::cuboid(Vec3::ONE));
        world.add_body(body);

        let count = world.fold_face_normals(0, |acc, _| acc + 1);
        assert_eq!(count, 6);
    }

    #[test]
    fn test_fold_unique_edges_rotates_into_world() {
        let mut world = World::new();
        let mut body = Body::new();
        body.add_shape(Shape::cuboid(Vec3::ONE));
        body.rotate_by(Vec3::Z, std::f32::consts::FRAC_PI_2);
        world.add_body(body);

        let edges = world.fold_unique_edges(Vec::new(), |mut acc, e| {
            acc.push(e.direction);
            acc
        });
        assert_eq!(edges.len(), 3);
        // Local +X rotates onto +Y.
        assert!((edges[0] - Vec3::Y).length() < 1.0e-5);
    }
}
