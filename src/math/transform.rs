use crate::math::{Vector3, Quaternion, Rotation};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A rigid pose in 3D space: a rotation basis followed by a translation.
///
/// Joint frames use the basis columns by convention: X is the angle reference
/// direction, Z is the hinge axis, and Y completes the right-handed basis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Transform {
    /// Origin of the frame
    pub position: Vector3,

    /// Basis of the frame, as a unit quaternion
    pub rotation: Quaternion,
}

impl Transform {
    #[inline]
    pub fn new(position: Vector3, rotation: Quaternion) -> Self {
        Self { position, rotation }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new(Vector3::zero(), Quaternion::identity())
    }

    #[inline]
    pub fn from_position(position: Vector3) -> Self {
        Self::new(position, Quaternion::identity())
    }

    #[inline]
    pub fn from_position_rotation(position: Vector3, rotation: Quaternion) -> Self {
        Self::new(position, rotation)
    }

    /// Transforms a point by this transform
    #[inline]
    pub fn transform_point(&self, point: Vector3) -> Vector3 {
        self.rotation.rotate_vector(point) + self.position
    }

    /// Transforms a direction vector by this transform (ignoring translation)
    #[inline]
    pub fn transform_direction(&self, direction: Vector3) -> Vector3 {
        self.rotation.rotate_vector(direction)
    }

    /// Maps a world point into this transform's local space
    #[inline]
    pub fn inverse_transform_point(&self, point: Vector3) -> Vector3 {
        self.rotation.conjugate().rotate_vector(point - self.position)
    }

    /// Maps a world direction into this transform's local space
    #[inline]
    pub fn inverse_transform_direction(&self, direction: Vector3) -> Vector3 {
        self.rotation.conjugate().rotate_vector(direction)
    }

    /// Returns basis column `index` (0 = X, 1 = Y, 2 = Z) in the parent space
    #[inline]
    pub fn axis(&self, index: usize) -> Vector3 {
        self.rotation.rotate_vector(Vector3::unit(index))
    }

    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.conjugate();

        Self {
            position: -inv_rotation.rotate_vector(self.position),
            rotation: inv_rotation,
        }
    }

    /// Returns `self * local`: `local` is applied first, then `self`.
    ///
    /// A joint frame expressed in body space becomes a world frame with
    /// `body_transform.compose(&frame)`.
    pub fn compose(&self, local: &Self) -> Self {
        Self {
            position: self.transform_point(local.position),
            rotation: (self.rotation * local.rotation).normalize(),
        }
    }
}
