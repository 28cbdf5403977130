use glam::{DMat4, DQuat, DVec3};

/// Position + orientation of a single node.
///
/// Importers that deliver rigid poses instead of matrices use this through
/// [`NodeAnimation::add_key_frame_pose`](crate::animation::NodeAnimation::add_key_frame_pose).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: DVec3,
    pub rotation: DQuat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    #[must_use]
    pub fn new(position: DVec3, rotation: DQuat) -> Self {
        Self { position, rotation }
    }

    /// Builds the rotation matrix first, then sets the translation column.
    #[inline]
    #[must_use]
    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.rotation, self.position)
    }

    /// Splits a transform into translation and rotation.
    ///
    /// Any scale or shear in `mat` is discarded.
    #[must_use]
    pub fn from_matrix(mat: &DMat4) -> Self {
        let (_scale, rotation, position) = mat.to_scale_rotation_translation();
        Self {
            position,
            rotation: rotation.normalize(),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Pose> for DMat4 {
    fn from(pose: Pose) -> Self {
        pose.to_matrix()
    }
}

/// Translation column of a transform.
#[inline]
#[must_use]
pub fn translation(mat: &DMat4) -> DVec3 {
    mat.w_axis.truncate()
}

/// Replaces the translation column of `mat` in place.
#[inline]
pub fn set_translation(mat: &mut DMat4, position: DVec3) {
    mat.w_axis = position.extend(1.0);
}
