//! Separating-axis test between transformed convex hulls.

use glam::Vec3;

use crate::EPSILON;
use crate::hull::ConvexPolyhedron;
use crate::transform::Transform;

/// Finds the minimum-overlap separating axis between two transformed hulls.
///
/// Candidate axes are hull1's world face normals, then hull2's, then the
/// cross products of the hulls' unique edge directions (near-parallel pairs
/// skipped). Returns `None` as soon as any candidate separates the hulls.
/// Otherwise returns the axis of smallest positive overlap together with
/// that overlap depth; ties keep the earliest candidate.
///
/// The returned axis is oriented so that
/// `(t2.position - t1.position).dot(axis) < 0`, i.e. it points from hull2
/// toward hull1.
pub fn separating_axis(
    t1: &Transform,
    hull1: &ConvexPolyhedron,
    t2: &Transform,
    hull2: &ConvexPolyhedron,
) -> Option<(Vec3, f32)> {
    let mut best_axis = Vec3::ZERO;
    let mut best_depth = f32::MAX;

    let mut consider = |axis: Vec3| -> bool {
        let (max1, min1) = hull1.project(t1, axis);
        let (max2, min2) = hull2.project(t2, axis);
        let depth = (max1 + min2).min(max2 + min1);
        if depth < 0.0 {
            return false;
        }
        if depth < best_depth {
            best_depth = depth;
            best_axis = axis;
        }
        true
    };

    for &normal in hull1.normals() {
        if !consider(t1.vector_to_world(normal)) {
            return None;
        }
    }
    for &normal in hull2.normals() {
        if !consider(t2.vector_to_world(normal)) {
            return None;
        }
    }
    for &e1 in hull1.unique_edges() {
        let w1 = t1.vector_to_world(e1);
        for &e2 in hull2.unique_edges() {
            let cross = w1.cross(t2.vector_to_world(e2));
            let len = cross.length();
            if len < EPSILON {
                continue;
            }
            if !consider(cross / len) {
                return None;
            }
        }
    }

    let delta = t2.position - t1.position;
    if delta.dot(best_axis) > 0.0 {
        best_axis = -best_axis;
    }
    Some((best_axis, best_depth))
}
