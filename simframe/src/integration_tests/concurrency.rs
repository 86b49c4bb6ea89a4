use std::thread;

use slog;

use crate::builder::FrameTreeBuilder;
use crate::state::{SnapshotState, State};
use crate::tree::FrameTree;
use crate::types::*;

const THREADS: usize = 8;

// A handful of bodies, each with a short chain of markers,
// so threads have overlapping ancestors to fight over.
fn skeleton() -> FrameTree {
    let root_log = slog::Logger::root(slog::Discard, o!());
    let mut builder = FrameTreeBuilder::new(&root_log);
    for b in 0..4 {
        let body = builder.add_grounded_frame(&format!("body_{}", b)).unwrap();
        let mut tip = body;
        for m in 0..3 {
            tip = builder
                .add_attached_frame(
                    &format!("marker_{}_{}", b, m),
                    tip,
                    Iso3::new(Vec3::new(0.1, 0.0, 0.02 * m as f64), Vec3::new(0.0, 0.0, 0.3)),
                )
                .unwrap();
        }
    }
    builder.freeze().unwrap()
}

fn posed_state(tree: &FrameTree) -> SnapshotState {
    let mut state = SnapshotState::new(tree);
    for frame in tree.frames() {
        if let Some(body) = frame.body() {
            let offset = body.0 as f64;
            state
                .set_body_pose(
                    body,
                    Iso3::new(Vec3::new(offset, -offset, 0.5), Vec3::new(0.1 * offset, 0.2, 0.0)),
                )
                .unwrap();
        }
    }
    state
}

#[test]
fn parallel_queries_agree_with_serial_ones() {
    let tree = skeleton();

    // Reference answers from a separate, single-threaded snapshot.
    let reference_state = posed_state(&tree);
    let ground = tree.ground_frame();
    let expected: Vec<Iso3> = tree
        .frames()
        .map(|frame| frame.find_transform_between(&reference_state, ground).unwrap())
        .collect();

    let state = posed_state(&tree);
    thread::scope(|scope| {
        for t in 0..THREADS {
            let tree = &tree;
            let state = &state;
            let expected = &expected;
            scope.spawn(move || {
                // Stagger the starting frame so threads collide on different entries.
                let frames: Vec<_> = tree.frames().collect();
                for i in 0..frames.len() * 4 {
                    let index = (i + t) % frames.len();
                    let got = frames[index]
                        .find_transform_between(state, tree.ground_frame())
                        .unwrap();
                    assert_relative_eq!(got, expected[index], epsilon = 1e-12);
                }
            });
        }
    });

    // Every frame was computed at least once; racing threads may
    // occasionally both compute the same entry, but never more
    // entries than frames are kept.
    let cache = state.transform_cache();
    assert!(cache.misses() >= tree.len());
    assert_eq!(cache.len(), tree.len());
}
