use glam::{DQuat, DVec3};

use crate::animation::pose::Pose;

pub trait Interpolatable: Copy + Clone + Sized {
    fn interpolate_linear(start: &Self, end: &Self, t: f64) -> Self;
}

impl Interpolatable for DVec3 {
    fn interpolate_linear(start: &Self, end: &Self, t: f64) -> Self {
        start.lerp(*end, t)
    }
}

impl Interpolatable for DQuat {
    /// Spherical interpolation along the shortest arc.
    fn interpolate_linear(start: &Self, end: &Self, t: f64) -> Self {
        let end = if start.dot(*end) < 0.0 { -*end } else { *end };
        start.slerp(end, t).normalize()
    }
}

impl Interpolatable for Pose {
    /// Translation is blended linearly, rotation spherically.
    fn interpolate_linear(start: &Self, end: &Self, t: f64) -> Self {
        Pose {
            position: DVec3::interpolate_linear(&start.position, &end.position, t),
            rotation: DQuat::interpolate_linear(&start.rotation, &end.rotation, t),
        }
    }
}
