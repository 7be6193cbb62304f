//! Immutable convex polyhedra.
//!
//! A [`ConvexPolyhedron`] is built once and then shared freely between
//! bodies; nothing mutates it after construction. Besides the vertex and
//! face lists it caches one outward unit normal per face and the set of
//! unique edge directions, which the separating-axis test consumes.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::HullError;
use crate::transform::Transform;
use crate::{EPSILON, approx_eq_vec3};

/// An immutable convex hull in local coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConvexPolyhedron {
    vertices: Vec<Vec3>,
    faces: Vec<Vec<usize>>,
    normals: Vec<Vec3>,
    unique_edges: Vec<Vec3>,
}

impl ConvexPolyhedron {
    /// Builds an axis-aligned box hull from half-extents.
    ///
    /// The face order (and therefore the normal order) is fixed: -Z, +Z,
    /// -Y, +Y, -X, +X, each normal exact. The unique edges are the three
    /// coordinate axes, returned directly rather than recomputed, so the
    /// common box case carries no floating-point drift.
    pub fn cuboid(half_extents: Vec3) -> Self {
        let Vec3 { x, y, z } = half_extents;
        let vertices = vec![
            Vec3::new(-x, -y, -z),
            Vec3::new(x, -y, -z),
            Vec3::new(x, y, -z),
            Vec3::new(-x, y, -z),
            Vec3::new(-x, -y, z),
            Vec3::new(x, -y, z),
            Vec3::new(x, y, z),
            Vec3::new(-x, y, z),
        ];
        let faces = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![2, 3, 7, 6],
            vec![0, 4, 7, 3],
            vec![1, 2, 6, 5],
        ];
        let normals = vec![
            Vec3::NEG_Z,
            Vec3::Z,
            Vec3::NEG_Y,
            Vec3::Y,
            Vec3::NEG_X,
            Vec3::X,
        ];
        Self {
            vertices,
            faces,
            normals,
            unique_edges: vec![Vec3::X, Vec3::Y, Vec3::Z],
        }
    }

    /// Builds a hull from vertices and face index loops.
    ///
    /// Each face must be wound so its outward normal follows the right-hand
    /// rule; the normal is taken from the face's first three vertices. The
    /// caller is responsible for supplying convex, outward-wound input (see
    /// [`ConvexPolyhedron::validate`]).
    pub fn from_vertices_and_faces(vertices: Vec<Vec3>, faces: Vec<Vec<usize>>) -> Self {
        let normals = faces
            .iter()
            .map(|face| {
                let v0 = vertices[face[0]];
                let v1 = vertices[face[1]];
                let v2 = vertices[face[2]];
                (v1 - v0).cross(v2 - v0).normalize()
            })
            .collect();
        let unique_edges = unique_edge_directions(&vertices, &faces, Vec::new());
        Self {
            vertices,
            faces,
            normals,
            unique_edges,
        }
    }

    /// Local-space vertices.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Face index loops, outward wound.
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// One outward unit normal per face, in face order.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Unique edge directions, deduplicated up to sign.
    pub fn unique_edges(&self) -> &[Vec3] {
        &self.unique_edges
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Local face plane as `(normal, constant)` with `normal . x + constant = 0`
    /// for points `x` on the plane.
    pub fn face_plane(&self, face: usize) -> (Vec3, f32) {
        let normal = self.normals[face];
        let v0 = self.vertices[self.faces[face][0]];
        (normal, -normal.dot(v0))
    }

    /// World-space face plane under `transform`, same convention as
    /// [`ConvexPolyhedron::face_plane`].
    pub fn world_face_plane(&self, transform: &Transform, face: usize) -> (Vec3, f32) {
        let normal = transform.vector_to_world(self.normals[face]);
        let v0 = transform.point_to_world(self.vertices[self.faces[face][0]]);
        (normal, -normal.dot(v0))
    }

    /// World-space vertices of one face, in winding order.
    pub fn world_face_vertices(&self, transform: &Transform, face: usize) -> Vec<Vec3> {
        self.faces[face]
            .iter()
            .map(|&i| transform.point_to_world(self.vertices[i]))
            .collect()
    }

    /// Projects the transformed hull onto `axis`.
    ///
    /// Returns `(max, min)` where `max` is the largest world-vertex dot
    /// product with `axis` and `min` the largest with `-axis`; callers read
    /// the pair as the interval `[-min, max]`.
    pub fn project(&self, transform: &Transform, axis: Vec3) -> (f32, f32) {
        let mut max = f32::MIN;
        let mut min = f32::MIN;
        for &v in &self.vertices {
            let d = transform.point_to_world(v).dot(axis);
            max = max.max(d);
            min = min.max(-d);
        }
        (max, min)
    }

    /// Checks hull well-formedness: face sizes, index ranges, coplanarity,
    /// and convexity, all within [`EPSILON`].
    ///
    /// The pipeline never calls this; it exists for callers feeding in
    /// untrusted geometry and for tests.
    pub fn validate(&self) -> Result<(), HullError> {
        for (f, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(HullError::FaceTooSmall {
                    face: f,
                    len: face.len(),
                });
            }
            for &i in face {
                if i >= self.vertices.len() {
                    return Err(HullError::IndexOutOfRange { face: f, index: i });
                }
            }
            let (normal, constant) = self.face_plane(f);
            for &i in face {
                if (normal.dot(self.vertices[i]) + constant).abs() > EPSILON {
                    return Err(HullError::NonPlanarFace { face: f });
                }
            }
            for (v, &vertex) in self.vertices.iter().enumerate() {
                if normal.dot(vertex) + constant > EPSILON {
                    return Err(HullError::NotConvex { face: f, vertex: v });
                }
            }
        }
        Ok(())
    }
}

/// Collects the unique edge directions of a face list, deduplicated up to
/// sign within [`EPSILON`].
///
/// Order-preserving on first occurrence; `seed` pre-populates the result so
/// callers can pin a deterministic prefix (the box constructor seeds the
/// three coordinate axes this way).
pub fn unique_edge_directions(
    vertices: &[Vec3],
    faces: &[Vec<usize>],
    seed: Vec<Vec3>,
) -> Vec<Vec3> {
    let mut edges = seed;
    for face in faces {
        for (k, &a) in face.iter().enumerate() {
            let b = face[(k + 1) % face.len()];
            let edge = vertices[b] - vertices[a];
            if edge.length() <= EPSILON {
                continue;
            }
            let dir = edge.normalize();
            let seen = edges
                .iter()
                .any(|&e| approx_eq_vec3(e, dir) || approx_eq_vec3(e, -dir));
            if !seen {
                edges.push(dir);
            }
        }
    }
    edges
}
