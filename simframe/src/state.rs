//! The dynamical state that frames are evaluated against.
//!
//! The simulation engine owns the real state; frames only need to
//! know which model a state belongs to, when it last changed, and
//! where each simulated body currently is.

use std::fmt;

use crate::cache::TransformCache;
use crate::error::{FrameError, Result};
use crate::tree::FrameTree;
use crate::types::*;

/// Identifies one frozen frame tree.
///
/// A state built for one model is rejected by every other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(pub u64);

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "model#{}", self.0)
    }
}

/// Version of a state snapshot. Strictly increases on every mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Stamp(pub u64);

impl Stamp {
    pub fn next(self) -> Stamp {
        Stamp(self.0 + 1)
    }
}

/// Index of a simulated rigid body whose pose the state stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyIndex(pub usize);

/// What frames need from a simulation state.
///
/// Implementations must return the same pose for the same body
/// for as long as `stamp()` is unchanged.
pub trait State {
    fn model_id(&self) -> ModelId;
    fn stamp(&self) -> Stamp;
    /// Pose of the body relative to ground (`X_GB`).
    fn body_pose(&self, body: BodyIndex) -> Result<Iso3>;
    /// Memo of ground transforms computed against this state.
    fn transform_cache(&self) -> &TransformCache;
}

/// Simple in-memory state for one frame tree.
pub struct SnapshotState {
    model_id: ModelId,
    stamp: Stamp,
    body_poses: Vec<Iso3>,
    cache: TransformCache,
}

impl SnapshotState {
    /// All bodies start at the ground origin.
    pub fn new(tree: &FrameTree) -> SnapshotState {
        SnapshotState {
            model_id: tree.model_id(),
            stamp: Stamp::default(),
            body_poses: vec![Iso3::identity(); tree.num_bodies()],
            cache: TransformCache::new(),
        }
    }

    pub fn set_body_pose(&mut self, body: BodyIndex, pose: Iso3) -> Result<()> {
        let model_id = self.model_id;
        let num_bodies = self.body_poses.len();
        let slot = self.body_poses.get_mut(body.0).ok_or_else(|| {
            FrameError::invalid_state(format!(
                "body {} out of range; {} has {} bodies",
                body.0, model_id, num_bodies
            ))
        })?;
        *slot = pose;
        self.stamp = self.stamp.next();
        Ok(())
    }

    /// Mark the state as changed without changing any pose.
    pub fn touch(&mut self) {
        self.stamp = self.stamp.next();
    }
}

impl State for SnapshotState {
    fn model_id(&self) -> ModelId {
        self.model_id
    }

    fn stamp(&self) -> Stamp {
        self.stamp
    }

    fn body_pose(&self, body: BodyIndex) -> Result<Iso3> {
        self.body_poses.get(body.0).cloned().ok_or_else(|| {
            FrameError::invalid_state(format!(
                "body {} out of range; {} has {} bodies",
                body.0,
                self.model_id,
                self.body_poses.len()
            ))
        })
    }

    fn transform_cache(&self) -> &TransformCache {
        &self.cache
    }
}
