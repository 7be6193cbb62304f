//! Narrow-phase contact generation.
//!
//! Takes candidate body pairs from a [`PairSource`](crate::world::PairSource)
//! and dispatches on the ordered shape-kind pair, emitting one
//! [`ContactEquation`] per touching point. Contact order is deterministic:
//! pairs in `(BodyId, BodyId)` order, shapes in `ShapeId` order, clip points
//! in clipping order.

use glam::Vec3;
use tumble_geom::{ConvexPolyhedron, EPSILON, Shape, Transform, clip_against_hull, separating_axis};

use crate::body::Body;
use crate::ids::BodyId;

/// Depth band handed to hull clipping; generous on purpose, the solver
/// ignores non-penetrating points by clamping their impulse at zero.
const CLIP_MIN_DEPTH: f32 = -100.0;
const CLIP_MAX_DEPTH: f32 = 100.0;

/// A single normal-direction contact between two bodies, valid for one step.
///
/// `ni` points from `body1` toward `body2`; `ri` and `rj` are the contact
/// point offsets from each body's position, in world axes. `depth` is the
/// signed separation measured by the generator (non-positive while
/// penetrating), which the solver turns into its positional bias.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEquation {
    /// First body (always the lower id).
    pub body1: BodyId,
    /// Second body.
    pub body2: BodyId,
    /// Contact normal, unit length, from body1 toward body2.
    pub ni: Vec3,
    /// Contact point relative to body1's position.
    pub ri: Vec3,
    /// Contact point relative to body2's position.
    pub rj: Vec3,
    /// Signed separation at the contact.
    pub depth: f32,
}

/// Generates contact equations for every candidate pair into `out`.
///
/// `out` is a reusable buffer owned by the world; it is appended to, not
/// cleared, so the caller controls the lifetime of the batch.
pub fn generate_contacts(bodies: &[Body], pairs: &[(BodyId, BodyId)], out: &mut Vec<ContactEquation>) {
    for &(id1, id2) in pairs {
        let b1 = &bodies[id1.index()];
        let b2 = &bodies[id2.index()];
        if b1.is_static() && b2.is_static() {
            continue;
        }
        for (_, shape1, local1) in b1.shapes() {
            let t1 = b1.pose().then(local1);
            for (_, shape2, local2) in b2.shapes() {
                let t2 = b2.pose().then(local2);
                match (shape1, shape2) {
                    (Shape::Plane, Shape::Plane) => {}
                    (Shape::Plane, Shape::Convex { hull }) => {
                        plane_convex(id1, b1, &t1, id2, b2, &t2, hull, false, out);
                    }
                    (Shape::Convex { hull }, Shape::Plane) => {
                        plane_convex(id2, b2, &t2, id1, b1, &t1, hull, true, out);
                    }
                    (Shape::Convex { hull: h1 }, Shape::Convex { hull: h2 }) => {
                        convex_convex(id1, b1, &t1, h1, id2, b2, &t2, h2, out);
                    }
                    (Shape::Sphere { radius: r1 }, Shape::Sphere { radius: r2 }) => {
                        sphere_sphere(id1, b1, &t1, *r1, id2, b2, &t2, *r2, out);
                    }
                    (Shape::Plane, Shape::Sphere { radius }) => {
                        sphere_plane(id1, b1, &t1, id2, b2, &t2, *radius, false, out);
                    }
                    (Shape::Sphere { radius }, Shape::Plane) => {
                        sphere_plane(id2, b2, &t2, id1, b1, &t1, *radius, true, out);
                    }
                    // Sphere-vs-hull is not implemented; the kinds are
                    // enumerated so adding it stays a local change.
                    (Shape::Sphere { .. }, Shape::Convex { .. }) => {}
                    (Shape::Convex { .. }, Shape::Sphere { .. }) => {}
                }
            }
        }
    }
}

/// Plane against hull: one contact per hull vertex at or below the plane.
///
/// `flipped` means the convex body is `body1` of the pair, so the bodies
/// swap roles and the normal negates.
#[allow(clippy::too_many_arguments)]
fn plane_convex(
    plane_id: BodyId,
    plane_body: &Body,
    plane_t: &Transform,
    convex_id: BodyId,
    convex_body: &Body,
    convex_t: &Transform,
    hull: &ConvexPolyhedron,
    flipped: bool,
    out: &mut Vec<ContactEquation>,
) {
    let normal = plane_t.vector_to_world(Vec3::Z);
    for &vertex in hull.vertices() {
        let world = convex_t.point_to_world(vertex);
        let depth = (world - plane_t.position).dot(normal);
        if depth > 0.0 {
            continue;
        }
        let on_plane = world - normal * depth;
        let eq = if flipped {
            ContactEquation {
                body1: convex_id,
                body2: plane_id,
                ni: -normal,
                ri: world - convex_body.position,
                rj: on_plane - plane_body.position,
                depth,
            }
        } else {
            ContactEquation {
                body1: plane_id,
                body2: convex_id,
                ni: normal,
                ri: on_plane - plane_body.position,
                rj: world - convex_body.position,
                depth,
            }
        };
        out.push(eq);
    }
}

/// Hull against hull: SAT, then reference-face clipping of the manifold.
#[allow(clippy::too_many_arguments)]
fn convex_convex(
    id1: BodyId,
    b1: &Body,
    t1: &Transform,
    h1: &ConvexPolyhedron,
    id2: BodyId,
    b2: &Body,
    t2: &Transform,
    h2: &ConvexPolyhedron,
    out: &mut Vec<ContactEquation>,
) {
    let Some((axis, _)) = separating_axis(t1, h1, t2, h2) else {
        return;
    };
    let ni = -axis;
    for clip in clip_against_hull(t1, h1, t2, h2, axis, CLIP_MIN_DEPTH, CLIP_MAX_DEPTH) {
        out.push(ContactEquation {
            body1: id1,
            body2: id2,
            ni,
            ri: clip.point + (-clip.normal * clip.depth) - b1.position,
            rj: clip.point - b2.position,
            depth: clip.depth,
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn sphere_sphere(
    id1: BodyId,
    b1: &Body,
    t1: &Transform,
    r1: f32,
    id2: BodyId,
    b2: &Body,
    t2: &Transform,
    r2: f32,
    out: &mut Vec<ContactEquation>,
) {
    let delta = t2.position - t1.position;
    let dist = delta.length();
    let depth = dist - (r1 + r2);
    if depth > 0.0 {
        return;
    }
    // Concentric spheres have no meaningful normal; fall back to +Z.
    let ni = if dist > EPSILON { delta / dist } else { Vec3::Z };
    out.push(ContactEquation {
        body1: id1,
        body2: id2,
        ni,
        ri: t1.position + ni * r1 - b1.position,
        rj: t2.position - ni * r2 - b2.position,
        depth,
    });
}

#[allow(clippy::too_many_arguments)]
fn sphere_plane(
    plane_id: BodyId,
    plane_body: &Body,
    plane_t: &Transform,
    sphere_id: BodyId,
    sphere_body: &Body,
    sphere_t: &Transform,
    radius: f32,
    flipped: bool,
    out: &mut Vec<ContactEquation>,
) {
    let normal = plane_t.vector_to_world(Vec3::Z);
    let center = sphere_t.position;
    let height = (center - plane_t.position).dot(normal);
    let depth = height - radius;
    if depth > 0.0 {
        return;
    }
    let surface = center - normal * radius;
    let on_plane = center - normal * height;
    let eq = if flipped {
        ContactEquation {
            body1: sphere_id,
            body2: plane_id,
            ni: -normal,
            ri: surface - sphere_body.position,
            rj: on_plane - plane_body.position,
            depth,
        }
    } else {
        ContactEquation {
            body1: plane_id,
            body2: sphere_id,
            ni: normal,
            ri: on_plane - plane_body.position,
            rj: surface - sphere_body.position,
            depth,
        }
    };
    out.push(eq);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_2;

    fn pair() -> Vec<(BodyId, BodyId)> {
        vec![(BodyId(0), BodyId(1))]
    }

    fn plane_body() -> Body {
        let mut body = Body::new();
        body.add_shape(Shape::plane());
        body
    }

    fn box_body(half: f32, mass: f32) -> Body {
        let mut body = Body::new();
        body.set_mass(mass);
        body.add_shape(Shape::cuboid(Vec3::splat(half)));
        body
    }

    #[test]
    fn test_plane_convex_touching_emits_bottom_face() {
        let plane = plane_body();
        let mut cube = box_body(0.5, 1.0);
        cube.position = Vec3::new(0.0, 0.0, 0.4);
        let bodies = [plane, cube];

        let mut out = Vec::new();
        generate_contacts(&bodies, &pair(), &mut out);

        // Four bottom vertices are 0.1 below the plane.
        assert_eq!(out.len(), 4);
        for c in &out {
            assert_eq!(c.body1, BodyId(0));
            assert_eq!(c.body2, BodyId(1));
            assert_eq!(c.ni, Vec3::Z);
            assert!((c.depth - -0.1).abs() < 1.0e-5);
            // ri lands on the plane surface.
            assert!(c.ri.z.abs() < 1.0e-5);
        }
    }

    #[test]
    fn test_convex_plane_flipped_negates_normal() {
        let mut cube = box_body(0.5, 1.0);
        cube.position = Vec3::new(0.0, 0.0, 0.4);
        let bodies = [cube, plane_body()];

        let mut out = Vec::new();
        generate_contacts(&bodies, &pair(), &mut out);

        assert_eq!(out.len(), 4);
        for c in &out {
            assert_eq!(c.body1, BodyId(0));
            assert_eq!(c.ni, Vec3::NEG_Z);
        }
    }

    #[test]
    fn test_separated_pair_has_no_contacts() {
        let plane = plane_body();
        let mut cube = box_body(0.5, 1.0);
        cube.position = Vec3::new(0.0, 0.0, 3.0);
        let bodies = [plane, cube];

        let mut out = Vec::new();
        generate_contacts(&bodies, &pair(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_convex_convex_manifold() {
        // Two rotated boxes meeting face to face: four contacts with the
        // normal pointing from the lower box to the upper one.
        let rot = Quat::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let mut lower = box_body(1.0, 1.0);
        lower.position = Vec3::new(0.0, 0.0, 2.1);
        lower.rotation = rot;
        let mut upper = box_body(1.0, 1.0);
        upper.position = Vec3::new(0.0, 0.0, 4.0);
        upper.rotation = rot;
        let bodies = [lower, upper];

        let mut out = Vec::new();
        generate_contacts(&bodies, &pair(), &mut out);

        assert_eq!(out.len(), 4);
        for c in &out {
            assert!((c.ni - Vec3::Z).length() < 1.0e-4);
            assert!((c.depth - -0.1).abs() < 1.0e-4);
        }
    }

    #[test]
    fn test_sphere_sphere_contact() {
        let mut a = Body::new();
        a.set_mass(1.0);
        a.add_shape(Shape::sphere(1.0));
        let mut b = Body::new();
        b.set_mass(1.0);
        b.add_shape(Shape::sphere(1.0));
        b.position = Vec3::new(1.5, 0.0, 0.0);
        let bodies = [a, b];

        let mut out = Vec::new();
        generate_contacts(&bodies, &pair(), &mut out);

        assert_eq!(out.len(), 1);
        let c = &out[0];
        assert_eq!(c.ni, Vec3::X);
        assert!((c.depth - -0.5).abs() < 1.0e-5);
        assert!((c.ri - Vec3::X).length() < 1.0e-5);
        assert!((c.rj - Vec3::NEG_X).length() < 1.0e-5);
    }

    #[test]
    fn test_sphere_plane_contact() {
        let plane = plane_body();
        let mut ball = Body::new();
        ball.set_mass(1.0);
        ball.add_shape(Shape::sphere(1.0));
        ball.position = Vec3::new(0.0, 0.0, 0.75);
        let bodies = [plane, ball];

        let mut out = Vec::new();
        generate_contacts(&bodies, &pair(), &mut out);

        assert_eq!(out.len(), 1);
        let c = &out[0];
        assert_eq!(c.ni, Vec3::Z);
        assert!((c.depth - -0.25).abs() < 1.0e-5);
    }

    #[test]
    fn test_static_static_pair_is_skipped() {
        let a = plane_body();
        let mut b = box_body(0.5, 0.0);
        b.position = Vec3::new(0.0, 0.0, -0.2);
        let bodies = [a, b];

        let mut out = Vec::new();
        generate_contacts(&bodies, &pair(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_shape_local_offset_is_respected() {
        let plane = plane_body();
        let mut body = Body::new();
        body.set_mass(1.0);
        // Box hangs 1 below the body origin.
        body.add_shape_at(
            Shape::cuboid(Vec3::splat(0.5)),
            Transform::from_position(Vec3::new(0.0, 0.0, -1.0)),
        );
        body.position = Vec3::new(0.0, 0.0, 1.4);
        let bodies = [plane, body];

        let mut out = Vec::new();
        generate_contacts(&bodies, &pair(), &mut out);

        assert_eq!(out.len(), 4);
        for c in &out {
            assert!((c.depth - -0.1).abs() < 1.0e-5);
        }
    }
}
