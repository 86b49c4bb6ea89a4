use std::f64::consts::FRAC_PI_2;

use slog;

use crate::builder::FrameTreeBuilder;
use crate::frame::FrameId;
use crate::state::{SnapshotState, State};
use crate::tree::FrameTree;
use crate::types::*;

// Ground at the identity, a body frame rotated a quarter turn about Z
// relative to ground, and a marker one unit out along the body's X axis.
//
// Built twice: once with the body rigidly attached to ground, and once
// with the body's pose coming from the state. Both must agree.
struct RotatedArm {
    tree: FrameTree,
    body: FrameId,
    marker: FrameId,
}

impl RotatedArm {
    fn attached() -> RotatedArm {
        // Log to nowhere.
        let root_log = slog::Logger::root(slog::Discard, o!());
        let mut builder = FrameTreeBuilder::new(&root_log);
        let ground = builder.ground();
        let body = builder
            .add_attached_frame("body", ground, iso_from_axis_angle(Vec3::z(), FRAC_PI_2))
            .unwrap();
        let marker = builder
            .add_attached_frame("marker", body, iso_from_translation(Vec3::x()))
            .unwrap();
        RotatedArm {
            tree: builder.freeze().unwrap(),
            body,
            marker,
        }
    }

    fn grounded() -> (RotatedArm, SnapshotState) {
        let root_log = slog::Logger::root(slog::Discard, o!());
        let mut builder = FrameTreeBuilder::new(&root_log);
        let body = builder.add_grounded_frame("body").unwrap();
        let marker = builder
            .add_attached_frame("marker", body, iso_from_translation(Vec3::x()))
            .unwrap();
        let arm = RotatedArm {
            tree: builder.freeze().unwrap(),
            body,
            marker,
        };
        let mut state = SnapshotState::new(&arm.tree);
        let body_index = arm.tree.frame(body).unwrap().body().unwrap();
        state
            .set_body_pose(body_index, iso_from_axis_angle(Vec3::z(), FRAC_PI_2))
            .unwrap();
        (arm, state)
    }

    fn marker_point_in_ground<S: State>(&self, state: &S) -> Vec3 {
        let marker = self.tree.frame(self.marker).unwrap();
        marker
            .find_location_in_another_frame(state, &Vec3::x(), self.tree.ground_frame())
            .unwrap()
    }
}

#[test]
fn point_on_marker_lands_on_ground_y_axis() {
    let arm = RotatedArm::attached();
    let state = SnapshotState::new(&arm.tree);

    // Marker offset first (x = 2 in the body), then the body's quarter turn.
    let point = arm.marker_point_in_ground(&state);
    assert_relative_eq!(point, Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-12);

    // Same answer on every evaluation.
    for _ in 0..3 {
        assert_eq!(arm.marker_point_in_ground(&state), point);
    }
}

#[test]
fn state_driven_body_agrees_with_attached_body() {
    let attached = RotatedArm::attached();
    let attached_state = SnapshotState::new(&attached.tree);
    let (grounded, grounded_state) = RotatedArm::grounded();

    assert_relative_eq!(
        grounded.marker_point_in_ground(&grounded_state),
        attached.marker_point_in_ground(&attached_state),
        epsilon = 1e-12
    );
}

#[test]
fn ground_transforms_compose_child_first() {
    let arm = RotatedArm::attached();
    let state = SnapshotState::new(&arm.tree);
    let body = arm.tree.frame(arm.body).unwrap();
    let marker = arm.tree.frame(arm.marker).unwrap();

    let x_gb = body.ground_transform(&state).unwrap();
    let x_gm = marker.ground_transform(&state).unwrap();
    assert_relative_eq!(x_gm, x_gb * iso_from_translation(Vec3::x()), epsilon = 1e-12);
    assert_relative_eq!(x_gm.translation.vector, Vec3::y(), epsilon = 1e-12);
    assert_relative_eq!(marker.find_transform_in_base_frame(), x_gm, epsilon = 1e-12);
}

#[test]
fn ground_is_the_base_of_rigidly_attached_frames() {
    let arm = RotatedArm::attached();
    let marker = arm.tree.frame(arm.marker).unwrap();
    assert_eq!(marker.find_base_frame(), arm.tree.ground_frame());

    let (grounded, _) = RotatedArm::grounded();
    let marker = grounded.tree.frame(grounded.marker).unwrap();
    assert_eq!(marker.find_base_frame().id(), grounded.body);
    assert_relative_eq!(
        marker.find_transform_in_base_frame(),
        iso_from_translation(Vec3::x())
    );
}

#[test]
fn direction_on_marker_only_rotates() {
    let arm = RotatedArm::attached();
    let state = SnapshotState::new(&arm.tree);
    let marker = arm.tree.frame(arm.marker).unwrap();
    let dir = marker
        .express_vector_in_another_frame(&state, &Vec3::x(), arm.tree.ground_frame())
        .unwrap();
    assert_relative_eq!(dir, Vec3::y(), epsilon = 1e-12);
}

#[test]
fn moving_the_body_moves_the_marker() {
    let (arm, mut state) = RotatedArm::grounded();
    assert_relative_eq!(
        arm.marker_point_in_ground(&state),
        Vec3::new(0.0, 2.0, 0.0),
        epsilon = 1e-12
    );

    let body_index = arm.tree.frame(arm.body).unwrap().body().unwrap();
    state
        .set_body_pose(body_index, iso_from_translation(Vec3::new(0.0, 0.0, 5.0)))
        .unwrap();
    assert_relative_eq!(
        arm.marker_point_in_ground(&state),
        Vec3::new(2.0, 0.0, 5.0),
        epsilon = 1e-12
    );
}
