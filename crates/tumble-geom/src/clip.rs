//! Polygon clipping against planes and hulls.
//!
//! The contact manifold between two overlapping hulls comes from clipping
//! the incident face of one hull against the reference face region of the
//! other (Sutherland-Hodgman), then keeping the clipped points that lie
//! within a depth band of the reference face plane.

use glam::Vec3;

use crate::hull::ConvexPolyhedron;
use crate::transform::Transform;

/// A candidate contact produced by hull clipping.
///
/// `depth` is the signed distance from `point` to the reference face plane;
/// negative means the point penetrates the reference hull. `normal` is the
/// negated world normal of the reference face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPoint {
    /// Clipped point in world space.
    pub point: Vec3,
    /// Negated reference-face world normal.
    pub normal: Vec3,
    /// Signed distance to the reference face plane.
    pub depth: f32,
}

/// Clips a polygon against the half-space `normal . x + constant <= 0`.
///
/// Standard Sutherland-Hodgman pass: walking each edge, the current point
/// is emitted when it lies inside the half-space, and the edge's plane
/// crossing is emitted whenever the endpoints straddle the plane. Clipping
/// an already-inside polygon returns it unchanged.
pub fn clip_polygon_against_plane(polygon: &[Vec3], normal: Vec3, constant: f32) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(polygon.len() + 1);
    if polygon.is_empty() {
        return out;
    }
    let mut prev = polygon[polygon.len() - 1];
    let mut d_prev = normal.dot(prev) + constant;
    for &curr in polygon {
        let d_curr = normal.dot(curr) + constant;
        if d_prev * d_curr < 0.0 {
            let t = d_prev / (d_prev - d_curr);
            out.push(prev + (curr - prev) * t);
        }
        if d_curr <= 0.0 {
            out.push(curr);
        }
        prev = curr;
        d_prev = d_curr;
    }
    out
}

/// Clips a world-space polygon against every face plane of `hull` except
/// `skip_face`, then filters the survivors to the depth band
/// `[min_depth, max_depth]` measured against `skip_face`'s plane.
pub fn clip_face_against_hull(
    transform: &Transform,
    hull: &ConvexPolyhedron,
    skip_face: usize,
    mut polygon: Vec<Vec3>,
    min_depth: f32,
    max_depth: f32,
) -> Vec<ClipPoint> {
    for face in 0..hull.face_count() {
        if face == skip_face {
            continue;
        }
        let (normal, constant) = hull.world_face_plane(transform, face);
        polygon = clip_polygon_against_plane(&polygon, normal, constant);
        if polygon.is_empty() {
            break;
        }
    }

    let (ref_normal, ref_constant) = hull.world_face_plane(transform, skip_face);
    polygon
        .into_iter()
        .filter_map(|point| {
            let depth = ref_normal.dot(point) + ref_constant;
            (depth >= min_depth && depth <= max_depth).then_some(ClipPoint {
                point,
                normal: -ref_normal,
                depth,
            })
        })
        .collect()
}

/// Clips hull2's incident face against hull1's reference face region.
///
/// `axis` is the separating axis as returned by
/// [`separating_axis`](crate::separating_axis), oriented from hull2 toward
/// hull1. Internally the contact normal `-axis` (hull1 toward hull2) picks
/// the reference face on hull1 (most aligned) and the incident face on
/// hull2 (most anti-parallel).
pub fn clip_against_hull(
    t1: &Transform,
    hull1: &ConvexPolyhedron,
    t2: &Transform,
    hull2: &ConvexPolyhedron,
    axis: Vec3,
    min_depth: f32,
    max_depth: f32,
) -> Vec<ClipPoint> {
    let contact_normal = -axis;

    let mut ref_face = 0;
    let mut best = f32::MIN;
    for (face, &normal) in hull1.normals().iter().enumerate() {
        let d = t1.vector_to_world(normal).dot(contact_normal);
        if d > best {
            best = d;
            ref_face = face;
        }
    }

    let mut incident_face = 0;
    let mut worst = f32::MAX;
    for (face, &normal) in hull2.normals().iter().enumerate() {
        let d = t2.vector_to_world(normal).dot(contact_normal);
        if d < worst {
            worst = d;
            incident_face = face;
        }
    }

    let polygon = hull2.world_face_vertices(t2, incident_face);
    clip_face_against_hull(t1, hull1, ref_face, polygon, min_depth, max_depth)
}
