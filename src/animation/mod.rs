//! Keyframe Animation
//!
//! - [`NodeAnimation`]: sorted keyframe timeline of one node, sampled with
//!   linear translation and spherical rotation blending
//! - [`SkeletonAnimation`]: a clip owning one timeline per node, sampled as a
//!   whole [`SkeletonPose`]
//!
//! Importers fill a clip through `add_key_frame`; playback only queries it.
//!
//! ```rust
//! use glam::{DMat4, DVec3};
//! use skeletal_keyframes::SkeletonAnimation;
//!
//! let mut clip = SkeletonAnimation::new("walk");
//! clip.add_key_frame("hips", 0.0, DMat4::IDENTITY);
//! clip.add_key_frame("hips", 10.0, DMat4::from_translation(DVec3::X * 10.0));
//!
//! let pose = clip.pose_at(15.0, true).unwrap();
//! assert!((pose["hips"].w_axis.x - 5.0).abs() < 1e-9);
//! ```

mod values;
pub mod node;
pub mod pose;
pub mod skeleton;

pub use node::{KeyFrame, KeyframeCursor, NodeAnimation};
pub use pose::Pose;
pub use skeleton::{SkeletonAnimation, SkeletonPose};
pub use values::Interpolatable;
