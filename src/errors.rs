//! Error Types
//!
//! [`AnimationError`] covers every way a keyframe query can fail. Errors are
//! local to a single call: a failed query never modifies stored keyframes.
//!
//! ```rust
//! use skeletal_keyframes::{AnimationError, SkeletonAnimation};
//!
//! let clip = SkeletonAnimation::new("walk");
//! match clip.node_pose_at("hips", 0.5, true) {
//!     Err(AnimationError::NodeNotFound(name)) => assert_eq!(name, "hips"),
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```

use thiserror::Error;

/// The error type for keyframe storage and sampling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    // ========================================================================
    // Caller Errors
    // ========================================================================
    /// A keyframe was requested by an ordinal past the end of the timeline.
    #[error("Invalid key frame index {index} (frame count: {count})")]
    KeyFrameIndexOutOfRange {
        /// The requested index
        index: usize,
        /// Number of keyframes stored
        count: usize,
    },

    /// The named node has no animation in this clip.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The node animation holds no keyframes, so there is nothing to sample.
    #[error("Node animation '{0}' has no key frames")]
    EmptyAnimation(String),

    // ========================================================================
    // Internal Invariant Violations
    // ========================================================================
    /// The interpolation fraction fell outside `[0, 1]`, meaning the
    /// surrounding keyframes were located incorrectly.
    #[error("Invalid time range: fraction {fraction} at time {time}")]
    InterpolationOutOfRange {
        /// The computed fraction
        fraction: f64,
        /// The (wrapped or clamped) query time
        time: f64,
    },

    /// Two adjacent keyframes share the same time, so the interpolation
    /// fraction would divide by zero.
    #[error("Degenerate key frame interval [{start}, {end}]")]
    DegenerateInterval {
        /// Time of the earlier keyframe
        start: f64,
        /// Time of the later keyframe
        end: f64,
    },
}

/// Alias for `Result<T, AnimationError>`.
pub type Result<T> = std::result::Result<T, AnimationError>;
