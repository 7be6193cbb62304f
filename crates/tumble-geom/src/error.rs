//! Error types for tumble-geom.

use thiserror::Error;

/// Well-formedness violations detected by [`ConvexPolyhedron::validate`].
///
/// The simulation pipeline never reports these itself; construction stays
/// infallible and malformed hulls produce undefined (but non-fatal)
/// behaviour. `validate` exists so callers can check untrusted geometry up
/// front.
///
/// [`ConvexPolyhedron::validate`]: crate::ConvexPolyhedron::validate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HullError {
    /// A face has fewer than three vertex indices.
    #[error("face {face} has {len} indices, need at least 3")]
    FaceTooSmall {
        /// Face index.
        face: usize,
        /// Number of indices in the face.
        len: usize,
    },

    /// A face references a vertex index outside the vertex list.
    #[error("face {face} references vertex {index}, out of range")]
    IndexOutOfRange {
        /// Face index.
        face: usize,
        /// Offending vertex index.
        index: usize,
    },

    /// A face's vertices do not lie on a common plane.
    #[error("face {face} is not planar")]
    NonPlanarFace {
        /// Face index.
        face: usize,
    },

    /// A vertex lies in front of a face plane, so the hull is not convex.
    #[error("vertex {vertex} lies outside face {face}: hull is not convex")]
    NotConvex {
        /// Face index.
        face: usize,
        /// Offending vertex index.
        vertex: usize,
    },
}
