#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Keyframe storage and sampling for skeletal animation clips.
//!
//! The crate does not load files, skin meshes, or blend clips. Importers push
//! keyframes in through [`SkeletonAnimation::add_key_frame`], and renderers
//! read per-node transforms back out with [`SkeletonAnimation::pose_at`].

pub mod animation;
pub mod errors;
pub mod utils;

pub use animation::{
    Interpolatable, KeyFrame, KeyframeCursor, NodeAnimation, Pose, SkeletonAnimation,
    SkeletonPose,
};
pub use errors::{AnimationError, Result};
pub use utils::TIME_EPSILON;
