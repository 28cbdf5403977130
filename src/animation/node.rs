use glam::DMat4;

use crate::animation::pose::{self, Pose};
use crate::animation::values::Interpolatable;
use crate::errors::{AnimationError, Result};
use crate::utils::float::{self, TIME_EPSILON};

/// How far a [`KeyframeCursor`] scans around its last position before
/// falling back to binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// A single `(time, transform)` sample of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyFrame {
    pub time: f64,
    pub transform: DMat4,
}

/// Remembers where the previous lookup landed so sequential playback
/// avoids a binary search per query.
#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    /// Index of the first keyframe strictly after the last query time.
    pub last_index: usize,
}

/// Keyframe timeline of one animated node.
///
/// Keyframes may be added in any order; they are kept sorted by time with
/// unique times (two times within [`TIME_EPSILON`] are the same key and the
/// later write wins).
///
/// Mutation needs `&mut self` and sampling only `&self`, so a filled
/// animation can be shared read-only between threads. Interleaving writes and
/// reads across threads requires an external lock.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "NodeAnimationRepr", into = "NodeAnimationRepr")
)]
pub struct NodeAnimation {
    name: String,
    /// Ascending, pairwise further apart than `TIME_EPSILON`.
    times: Vec<f64>,
    /// Parallel to `times`.
    transforms: Vec<DMat4>,
    length: f64,
}

impl NodeAnimation {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            times: Vec::new(),
            transforms: Vec::new(),
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
    // Keyframe storage
    // ========================================================================

    /// Inserts a keyframe, overwriting any keyframe already stored at `time`.
    pub fn add_key_frame(&mut self, time: f64, transform: DMat4) {
        let was_empty = self.times.is_empty();

        let idx = self.times.partition_point(|&t| t < time);
        let stored = if idx < self.times.len() && float::equal(self.times[idx], time) {
            self.transforms[idx] = transform;
            idx
        } else if idx > 0 && float::equal(self.times[idx - 1], time) {
            self.transforms[idx - 1] = transform;
            idx - 1
        } else {
            self.times.insert(idx, time);
            self.transforms.insert(idx, transform);
            idx
        };

        // A merged key keeps its original time, so track the stored one.
        let stored_time = self.times[stored];
        if was_empty || stored_time > self.length {
            self.length = stored_time;
        }
    }

    /// Inserts a keyframe given as position + orientation.
    pub fn add_key_frame_pose(&mut self, time: f64, pose: &Pose) {
        self.add_key_frame(time, pose.to_matrix());
    }

    /// Number of distinct keyframe times.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Keyframe at ordinal `index` in ascending time order.
    pub fn key_frame(&self, index: usize) -> Result<KeyFrame> {
        match (self.times.get(index), self.transforms.get(index)) {
            (Some(&time), Some(&transform)) => Ok(KeyFrame { time, transform }),
            _ => Err(AnimationError::KeyFrameIndexOutOfRange {
                index,
                count: self.times.len(),
            }),
        }
    }

    /// All keyframes in ascending time order.
    pub fn key_frames(&self) -> impl ExactSizeIterator<Item = KeyFrame> + '_ {
        self.times
            .iter()
            .zip(&self.transforms)
            .map(|(&time, &transform)| KeyFrame { time, transform })
    }

    /// Largest keyframe time inserted so far, `0.0` while empty.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Multiplies every stored translation by `factor`. Rotations are left
    /// untouched. Repeated calls compound.
    pub fn scale(&mut self, factor: f64) {
        for transform in &mut self.transforms {
            let position = pose::translation(transform);
            pose::set_translation(transform, position * factor);
        }
    }

    // ========================================================================
    // Sampling
    // ========================================================================

    /// Transform of this node at `time`.
    ///
    /// Past the end the clip either wraps with period [`length`](Self::length)
    /// (`looping`) or holds the last keyframe. Before the first keyframe the
    /// first keyframe is held. Between keyframes translation is blended
    /// linearly and rotation spherically along the shortest arc.
    pub fn frame_at(&self, time: f64, looping: bool) -> Result<DMat4> {
        let time = self.resolve_time(time, looping)?;
        if let Some(last) = self.frame_at_end(time) {
            return Ok(last);
        }

        let next = self.times.partition_point(|&t| t <= time);
        self.frame_before(next, time)
    }

    /// Same result as [`frame_at`](Self::frame_at), starting the keyframe
    /// search from where `cursor` stopped last time.
    pub fn frame_at_with_cursor(
        &self,
        time: f64,
        looping: bool,
        cursor: &mut KeyframeCursor,
    ) -> Result<DMat4> {
        let time = self.resolve_time(time, looping)?;
        if let Some(last) = self.frame_at_end(time) {
            cursor.last_index = self.times.len();
            return Ok(last);
        }

        let next = self.upper_bound_from(time, cursor);
        self.frame_before(next, time)
    }

    /// Time at which the node's translation X first reaches `x`.
    ///
    /// Keyframes are scanned in time order for the first one whose X is at
    /// least `x`; the time is interpolated linearly against its predecessor.
    /// If the first keyframe already reaches `x` its time is returned, and if
    /// no keyframe reaches `x` the last keyframe time is returned.
    ///
    /// Only meaningful when X is monotonic in time. Otherwise the result is
    /// the first upward crossing of `x`.
    pub fn time_at_x(&self, x: f64) -> Result<f64> {
        let last = self.last_index()?;
        let x_at = |i: usize| pose::translation(&self.transforms[i]).x;

        let Some(hit) = (0..=last).find(|&i| x_at(i) >= x || float::equal(x_at(i), x)) else {
            return Ok(self.times[last]);
        };

        if hit == 0 || float::equal(x_at(hit), x) {
            return Ok(self.times[hit]);
        }

        let prev = hit - 1;
        let (x1, x2) = (x_at(prev), x_at(hit));
        let (t1, t2) = (self.times[prev], self.times[hit]);

        Ok(t1 + (t2 - t1) * (x - x1) / (x2 - x1))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn last_index(&self) -> Result<usize> {
        self.times
            .len()
            .checked_sub(1)
            .ok_or_else(|| AnimationError::EmptyAnimation(self.name.clone()))
    }

    /// Maps a query time into `[.., length]` by wrapping or clamping.
    fn resolve_time(&self, time: f64, looping: bool) -> Result<f64> {
        self.last_index()?;

        if time <= self.length {
            Ok(time)
        } else if looping {
            Ok(float::wrap_periodic(time, self.length))
        } else {
            Ok(self.length)
        }
    }

    fn frame_at_end(&self, time: f64) -> Option<DMat4> {
        if float::equal(time, self.length) {
            self.transforms.last().copied()
        } else {
            None
        }
    }

    /// `next` is the index of the first keyframe after `time`.
    fn frame_before(&self, next: usize, time: f64) -> Result<DMat4> {
        let last = self.last_index()?;

        if next == 0 {
            return Ok(self.transforms[0]);
        }
        if next > last {
            return Ok(self.transforms[last]);
        }
        if float::equal(self.times[next], time) {
            return Ok(self.transforms[next]);
        }

        let prev = next - 1;
        if float::equal(self.times[prev], time) {
            return Ok(self.transforms[prev]);
        }

        self.interpolate(prev, next, time)
    }

    fn interpolate(&self, prev: usize, next: usize, time: f64) -> Result<DMat4> {
        let (start, end) = (self.times[prev], self.times[next]);
        let span = end - start;
        if span <= TIME_EPSILON {
            log::error!(
                "NodeAnimation '{}': degenerate interval [{start}, {end}]",
                self.name
            );
            return Err(AnimationError::DegenerateInterval { start, end });
        }

        let fraction = (time - start) / span;
        if !(0.0..=1.0).contains(&fraction) {
            log::error!(
                "NodeAnimation '{}': interpolation fraction {fraction} out of range at time {time}",
                self.name
            );
            return Err(AnimationError::InterpolationOutOfRange { fraction, time });
        }

        let from = Pose::from_matrix(&self.transforms[prev]);
        let to = Pose::from_matrix(&self.transforms[next]);
        Ok(Pose::interpolate_linear(&from, &to, fraction).to_matrix())
    }

    /// Upper bound of `time`, checking a few keyframes around the cursor
    /// before binary searching. Updates the cursor.
    fn upper_bound_from(&self, time: f64, cursor: &mut KeyframeCursor) -> usize {
        let len = self.times.len();
        let start = cursor.last_index.min(len);
        let lo = start.saturating_sub(MAX_SCAN_OFFSET);
        let hi = (start + MAX_SCAN_OFFSET).min(len);

        let is_upper_bound = |idx: usize| {
            let after_prev = idx == 0 || self.times[idx - 1] <= time;
            let before_next = idx == len || self.times[idx] > time;
            after_prev && before_next
        };

        let next = (start..=hi)
            .chain((lo..start).rev())
            .find(|&idx| is_upper_bound(idx))
            .unwrap_or_else(|| self.times.partition_point(|&t| t <= time));

        cursor.last_index = next;
        next
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct NodeAnimationRepr {
    name: String,
    key_frames: Vec<KeyFrame>,
}

#[cfg(feature = "serde")]
impl From<NodeAnimation> for NodeAnimationRepr {
    fn from(node: NodeAnimation) -> Self {
        let key_frames = node.key_frames().collect();
        Self {
            name: node.name,
            key_frames,
        }
    }
}

#[cfg(feature = "serde")]
impl From<NodeAnimationRepr> for NodeAnimation {
    fn from(repr: NodeAnimationRepr) -> Self {
        let mut node = NodeAnimation::new(repr.name);
        for frame in repr.key_frames {
            node.add_key_frame(frame.time, frame.transform);
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;

    fn at_x(x: f64) -> DMat4 {
        DMat4::from_translation(DVec3::new(x, 0.0, 0.0))
    }

    #[test]
    fn insertion_keeps_times_sorted_and_unique() {
        let mut node = NodeAnimation::new("bone");
        node.add_key_frame(2.0, at_x(2.0));
        node.add_key_frame(0.0, at_x(0.0));
        node.add_key_frame(1.0, at_x(1.0));
        node.add_key_frame(1.0 + TIME_EPSILON * 0.5, at_x(7.0));

        assert_eq!(node.times.len(), 3);
        assert!(node.times.windows(2).all(|w| w[1] - w[0] > TIME_EPSILON));
        assert_eq!(pose::translation(&node.transforms[1]).x, 7.0);
    }

    #[test]
    fn cursor_upper_bound_matches_partition_point() {
        let mut node = NodeAnimation::new("bone");
        for i in 0..20 {
            node.add_key_frame(f64::from(i), at_x(f64::from(i)));
        }

        let mut cursor = KeyframeCursor::default();
        for time in [0.5, 0.7, 3.2, 3.9, 18.5, 2.0, -1.0, 11.0, 11.0] {
            let expected = node.times.partition_point(|&t| t <= time);
            assert_eq!(node.upper_bound_from(time, &mut cursor), expected, "time={time}");
        }
    }

    #[test]
    fn merged_tail_key_keeps_length_on_stored_time() {
        let mut node = NodeAnimation::new("bone");
        node.add_key_frame(0.0, at_x(0.0));
        node.add_key_frame(10.0, at_x(10.0));
        node.add_key_frame(10.0 + TIME_EPSILON * 0.5, at_x(12.0));

        assert_eq!(node.times.len(), 2);
        assert_eq!(node.length(), 10.0);
        assert_eq!(node.length(), node.times[node.times.len() - 1]);
        assert_eq!(pose::translation(&node.transforms[1]).x, 12.0);
    }

    #[test]
    fn fraction_outside_segment_is_reported() {
        let mut node = NodeAnimation::new("bone");
        node.add_key_frame(0.0, at_x(0.0));
        node.add_key_frame(10.0, at_x(10.0));

        assert!(matches!(
            node.interpolate(0, 1, 20.0),
            Err(AnimationError::InterpolationOutOfRange { fraction, time })
                if fraction == 2.0 && time == 20.0
        ));
        assert!(matches!(
            node.interpolate(0, 1, -5.0),
            Err(AnimationError::InterpolationOutOfRange { .. })
        ));
    }

    #[test]
    fn equal_adjacent_times_are_reported() {
        let mut node = NodeAnimation::new("bone");
        node.times.extend([1.0, 1.0]);
        node.transforms.extend([at_x(0.0), at_x(1.0)]);
        node.length = 1.0;

        assert_eq!(
            node.interpolate(0, 1, 1.0),
            Err(AnimationError::DegenerateInterval { start: 1.0, end: 1.0 })
        );
    }

    #[test]
    fn non_finite_time_clamps_to_length() {
        let mut node = NodeAnimation::new("bone");
        node.add_key_frame(0.0, at_x(0.0));
        node.add_key_frame(10.0, at_x(10.0));

        for looping in [true, false] {
            for time in [f64::INFINITY, f64::NAN] {
                let frame = node.frame_at(time, looping).unwrap();
                assert_eq!(pose::translation(&frame).x, 10.0, "time={time}, looping={looping}");
            }
        }
    }

    #[test]
    fn stale_cursor_is_tolerated() {
        let mut node = NodeAnimation::new("bone");
        node.add_key_frame(0.0, at_x(0.0));
        node.add_key_frame(1.0, at_x(1.0));

        let mut cursor = KeyframeCursor { last_index: 42 };
        assert_eq!(node.upper_bound_from(0.5, &mut cursor), 1);
        assert_eq!(cursor.last_index, 1);
    }
}
