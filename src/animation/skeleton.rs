use glam::DMat4;
use rustc_hash::FxHashMap;

use crate::animation::node::NodeAnimation;
use crate::animation::pose::{self, Pose};
use crate::errors::{AnimationError, Result};
use crate::utils::float::{self, TIME_EPSILON};

/// Transform of every animated node at one instant, keyed by node name.
pub type SkeletonPose = FxHashMap<String, DMat4>;

/// An animation clip: one [`NodeAnimation`] per animated node.
///
/// Nodes are created on their first keyframe. Each node keeps its own
/// timeline, and nothing forces nodes onto a shared keyframe grid: whole
/// skeleton queries sample every node independently, which is well defined
/// per node but only visually coherent when the importer produced aligned
/// keyframes (as BVH does).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "SkeletonAnimationRepr", into = "SkeletonAnimationRepr")
)]
pub struct SkeletonAnimation {
    name: String,
    animations: FxHashMap<String, NodeAnimation>,
    length: f64,
}

impl SkeletonAnimation {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            animations: FxHashMap::default(),
            length: 0.0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // ========================================================================
    // Population
    // ========================================================================

    pub fn add_key_frame(&mut self, node: &str, time: f64, transform: DMat4) {
        self.with_node(node, |animation| animation.add_key_frame(time, transform));
    }

    pub fn add_key_frame_pose(&mut self, node: &str, time: f64, pose: &Pose) {
        self.with_node(node, |animation| animation.add_key_frame_pose(time, pose));
    }

    /// Runs `insert` on the node (created if unseen), then folds the node's
    /// stored length into the clip length.
    fn with_node(&mut self, node: &str, insert: impl FnOnce(&mut NodeAnimation)) {
        let was_empty = self.animations.is_empty();

        if !self.animations.contains_key(node) {
            log::debug!("SkeletonAnimation '{}': new node '{node}'", self.name);
        }
        let animation = self
            .animations
            .entry(node.to_owned())
            .or_insert_with(|| NodeAnimation::new(node));
        insert(animation);

        let node_length = animation.length();
        if was_empty || node_length > self.length {
            self.length = node_length;
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn has_node(&self, node: &str) -> bool {
        self.animations.contains_key(node)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.animations.len()
    }

    #[must_use]
    pub fn node(&self, node: &str) -> Option<&NodeAnimation> {
        self.animations.get(node)
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.animations.keys().map(String::as_str)
    }

    /// Clip duration: the largest keyframe time over all nodes.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Transform of a single node at `time`.
    pub fn node_pose_at(&self, node: &str, time: f64, looping: bool) -> Result<DMat4> {
        self.require_node(node)?.frame_at(time, looping)
    }

    /// Transform of every node at `time`. An empty clip yields an empty pose.
    pub fn pose_at(&self, time: f64, looping: bool) -> Result<SkeletonPose> {
        let mut pose =
            SkeletonPose::with_capacity_and_hasher(self.animations.len(), Default::default());
        for (name, animation) in &self.animations {
            pose.insert(name.clone(), animation.frame_at(time, looping)?);
        }
        Ok(pose)
    }

    /// Skeleton pose at the moment `node` reaches translation X `x`.
    ///
    /// `x` is clamped to the node's first keyframe X from below. Beyond the
    /// last keyframe X it is clamped when not looping, and otherwise wrapped
    /// by subtracting the last X.
    pub fn pose_at_x(&self, x: f64, node: &str, looping: bool) -> Result<SkeletonPose> {
        let animation = self.require_node(node)?;

        let first_x = pose::translation(&animation.key_frame(0)?.transform).x;
        let last_index = animation.frame_count() - 1;
        let last_x = pose::translation(&animation.key_frame(last_index)?.transform).x;

        let mut x = x.max(first_x);
        if x > last_x {
            x = if looping && last_x > TIME_EPSILON {
                float::wrap_periodic(x, last_x)
            } else {
                last_x
            };
        }

        let time = animation.time_at_x(x)?;
        self.pose_at(time, looping)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Scales the translation of every keyframe of every node.
    pub fn scale(&mut self, factor: f64) {
        for animation in self.animations.values_mut() {
            animation.scale(factor);
        }
    }

    fn require_node(&self, node: &str) -> Result<&NodeAnimation> {
        self.animations.get(node).ok_or_else(|| {
            log::warn!("SkeletonAnimation '{}': no node named '{node}'", self.name);
            AnimationError::NodeNotFound(node.to_owned())
        })
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct SkeletonAnimationRepr {
    name: String,
    nodes: Vec<NodeAnimation>,
}

#[cfg(feature = "serde")]
impl From<SkeletonAnimation> for SkeletonAnimationRepr {
    fn from(skeleton: SkeletonAnimation) -> Self {
        let mut nodes: Vec<NodeAnimation> = skeleton.animations.into_values().collect();
        nodes.sort_by(|a, b| a.name().cmp(b.name()));
        Self {
            name: skeleton.name,
            nodes,
        }
    }
}

#[cfg(feature = "serde")]
impl From<SkeletonAnimationRepr> for SkeletonAnimation {
    fn from(repr: SkeletonAnimationRepr) -> Self {
        let mut skeleton = SkeletonAnimation::new(repr.name);
        for node in repr.nodes {
            if node.is_empty() {
                log::warn!(
                    "SkeletonAnimation '{}': dropping node '{}' with no key frames",
                    skeleton.name,
                    node.name()
                );
                continue;
            }
            if skeleton.has_node(node.name()) {
                log::warn!(
                    "SkeletonAnimation '{}': duplicate node '{}', merging key frames",
                    skeleton.name,
                    node.name()
                );
            }
            for frame in node.key_frames() {
                skeleton.add_key_frame(node.name(), frame.time, frame.transform);
            }
        }
        skeleton
    }
}
