//! Rigid transform type (position + rotation, no scale).

use glam::{Mat4, Quat, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rigid pose: translation followed by rotation.
///
/// Bodies and per-shape offsets are rigid, so unlike a full TRS transform
/// there is no scale channel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform {
    /// Position offset.
    pub position: Vec3,
    /// Rotation quaternion (unit length).
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Identity transform (origin, no rotation).
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Creates a new transform.
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Creates a transform with only translation.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Creates a transform with only rotation.
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Maps a local point into the parent frame.
    #[inline]
    pub fn point_to_world(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }

    /// Maps a local direction into the parent frame (ignores translation).
    #[inline]
    pub fn vector_to_world(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }

    /// Combines two transforms: `self` is the outer frame, `local` is nested
    /// inside it.
    ///
    /// `a.then(&b).point_to_world(p) == a.point_to_world(b.point_to_world(p))`.
    pub fn then(&self, local: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * local.position,
            rotation: (self.rotation * local.rotation).normalize(),
        }
    }

    /// Converts to a 4x4 world matrix.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

impl From<Transform> for Mat4 {
    fn from(t: Transform) -> Self {
        t.to_matrix()
    }
}
