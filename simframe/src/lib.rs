/*!
# simframe

**simframe** gives simulation code named reference frames for locating things
(joint centres, muscle attachments, contact normals) and for doing spatial
calculations between them.

Each frame's pose relative to the global _ground_ frame depends on the
current state of the simulation, which is owned by someone else: a physics
engine, an integrator, a test harness. Frames never store that state; every
spatial query takes it as an explicit argument.


## High-level design

Frames are assembled with a [`FrameTreeBuilder`](builder/struct.FrameTreeBuilder.html)
and then frozen into an immutable [`FrameTree`](tree/struct.FrameTree.html).
There are three kinds of frame:

  - _Ground_, always at the identity.
  - _Grounded_ frames, whose pose relative to ground is read straight out of the
    state (e.g. the pose of a simulated rigid body).
  - _Attached_ frames, fixed to a parent frame at a constant offset.

All pairwise queries pivot through ground: the transform from F to A is
`X_GA^-1 * X_GF`. Transforms compose outer-first, so "A to B, then B to C"
is written `X_CB * X_BA`.

Ground transforms are memoized in a [`TransformCache`](cache/struct.TransformCache.html)
owned by the state snapshot and keyed by the state's stamp, so repeated
queries against an unchanged state don't walk the same chains again.
*/

extern crate nalgebra as na;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate slog;
#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod frame;
pub mod state;
pub mod tree;
pub mod types;

pub use crate::builder::FrameTreeBuilder;
pub use crate::cache::TransformCache;
pub use crate::config::TreeConfig;
pub use crate::error::{FrameError, Result};
pub use crate::frame::{FrameId, FrameKind, FrameRef};
pub use crate::state::{BodyIndex, ModelId, SnapshotState, Stamp, State};
pub use crate::tree::FrameTree;
pub use crate::types::*;
