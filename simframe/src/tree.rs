use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use slog::Logger;

use crate::config::TreeConfig;
use crate::error::{FrameError, Result};
use crate::frame::{Frame, FrameId, FrameRef};
use crate::state::{ModelId, State};

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(1);

/// An immutable forest of frames, rooted at ground and at each grounded frame.
///
/// Produced by `FrameTreeBuilder::freeze`; the topology never changes
/// afterwards, so a tree can be shared freely between threads that are
/// querying it.
pub struct FrameTree {
    log: Logger,
    model_id: ModelId,
    config: TreeConfig,
    frames: Vec<Frame>,
    names: HashMap<String, FrameId>,
    num_bodies: usize,
}

impl FrameTree {
    // Only the builder gets to call this, after it has
    // checked every parent link.
    pub(crate) fn from_validated(
        parent_log: &Logger,
        config: TreeConfig,
        frames: Vec<Frame>,
        names: HashMap<String, FrameId>,
        num_bodies: usize,
    ) -> FrameTree {
        let model_id = ModelId(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed));
        let log = parent_log.new(o!("model_id" => model_id.0));
        if !config.cache_ground_transforms {
            debug!(log, "Ground transform caching disabled");
        }
        FrameTree {
            log,
            model_id,
            config,
            frames,
            names,
            num_bodies,
        }
    }

    pub fn model_id(&self) -> ModelId {
        self.model_id
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn log(&self) -> &Logger {
        &self.log
    }

    /// Number of frames, including ground.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    // Never true in practice; ground always exists.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of state bodies grounded frames read from.
    pub fn num_bodies(&self) -> usize {
        self.num_bodies
    }

    pub fn ground_frame(&self) -> FrameRef<'_> {
        FrameRef::new(self, FrameId::GROUND)
    }

    pub fn frame(&self, id: FrameId) -> Result<FrameRef<'_>> {
        if id.0 < self.frames.len() {
            Ok(FrameRef::new(self, id))
        } else {
            Err(FrameError::unknown_frame(format!(
                "{:?} in {}",
                id, self.model_id
            )))
        }
    }

    pub fn frame_by_name(&self, name: &str) -> Result<FrameRef<'_>> {
        self.names
            .get(name)
            .map(|&id| FrameRef::new(self, id))
            .ok_or_else(|| FrameError::unknown_frame(name))
    }

    pub fn frames(&self) -> impl Iterator<Item = FrameRef<'_>> + '_ {
        (0..self.frames.len()).map(move |index| FrameRef::new(self, FrameId(index)))
    }

    pub fn depth_of(&self, id: FrameId) -> Result<usize> {
        self.frame(id).map(|frame| frame.depth())
    }

    pub(crate) fn node(&self, id: FrameId) -> &Frame {
        &self.frames[id.0]
    }

    // For ids read back out of this tree's own parent links.
    pub(crate) fn frame_unchecked(&self, id: FrameId) -> FrameRef<'_> {
        debug_assert!(id.0 < self.frames.len());
        FrameRef::new(self, id)
    }

    pub(crate) fn check_state<S: State + ?Sized>(&self, state: &S) -> Result<()> {
        let state_model = state.model_id();
        if state_model == self.model_id {
            Ok(())
        } else {
            Err(FrameError::invalid_state(format!(
                "state belongs to {}, frames belong to {}",
                state_model, self.model_id
            )))
        }
    }
}
