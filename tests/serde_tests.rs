//! Serialization Tests (`serde` feature)
//!
//! Deserialized clips are rebuilt through `add_key_frame`, so ordering and
//! length invariants hold even for hand-edited input.

#![cfg(feature = "serde")]

use glam::{DMat4, DVec3};

use skeletal_keyframes::animation::{NodeAnimation, SkeletonAnimation};

fn at_x(x: f64) -> DMat4 {
    DMat4::from_translation(DVec3::new(x, 0.0, 0.0))
}

#[test]
fn skeleton_survives_json() {
    let mut clip = SkeletonAnimation::new("walk");
    clip.add_key_frame("root", 0.0, at_x(0.0));
    clip.add_key_frame("root", 2.0, at_x(4.0));
    clip.add_key_frame("arm", 1.0, at_x(1.0));

    let json = serde_json::to_string(&clip).unwrap();
    let restored: SkeletonAnimation = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, clip);
    assert_eq!(restored.length(), 2.0);
    assert_eq!(
        restored.pose_at(1.0, false).unwrap(),
        clip.pose_at(1.0, false).unwrap()
    );
}

#[test]
fn unsorted_node_input_is_normalized() {
    let mut reference = NodeAnimation::new("bone");
    reference.add_key_frame(3.0, at_x(3.0));
    reference.add_key_frame(1.0, at_x(1.0));

    let mut value = serde_json::to_value(&reference).unwrap();
    value["key_frames"].as_array_mut().unwrap().reverse();

    let restored: NodeAnimation = serde_json::from_value(value).unwrap();
    assert_eq!(restored, reference);
    assert_eq!(restored.key_frame(0).unwrap().time, 1.0);
    assert_eq!(restored.length(), 3.0);
}

#[test]
fn empty_and_duplicate_nodes_are_tolerated() {
    let json = serde_json::json!({
        "name": "walk",
        "nodes": [
            { "name": "ghost", "key_frames": [] },
            { "name": "root", "key_frames": [
                { "time": 0.0, "transform": DMat4::IDENTITY }
            ] },
            { "name": "root", "key_frames": [
                { "time": 2.0, "transform": at_x(2.0) }
            ] }
        ]
    });

    let restored: SkeletonAnimation = serde_json::from_value(json).unwrap();
    assert!(!restored.has_node("ghost"));
    assert_eq!(restored.node_count(), 1);
    assert_eq!(restored.node("root").unwrap().frame_count(), 2);
    assert_eq!(restored.length(), 2.0);
}
