use std::collections::HashMap;

use slog::Logger;

use crate::config::TreeConfig;
use crate::error::{FrameError, Result};
use crate::frame::{Frame, FrameId, FrameKind};
use crate::state::BodyIndex;
use crate::tree::FrameTree;
use crate::types::*;

pub const GROUND_NAME: &str = "ground";

enum PendingKind {
    Ground,
    Grounded { body: BodyIndex },
    // Parent may be wired up after the frame is added.
    Attached { parent: Option<FrameId>, offset: Iso3 },
}

struct PendingFrame {
    name: String,
    kind: PendingKind,
}

/// Assembles frames and their parent links, then freezes them into
/// an immutable `FrameTree`.
///
/// Structural problems (a frame never given a parent, a cycle of
/// parents, ...) are reported by `freeze`, never by later queries.
#[must_use]
pub struct FrameTreeBuilder {
    log: Logger,
    config: TreeConfig,
    frames: Vec<PendingFrame>,
    names: HashMap<String, FrameId>,
    num_bodies: usize,
}

impl FrameTreeBuilder {
    /// Starts out containing only the ground frame.
    pub fn new(parent_log: &Logger) -> FrameTreeBuilder {
        let mut builder = FrameTreeBuilder {
            log: parent_log.new(o!()),
            config: TreeConfig::default(),
            frames: Vec::new(),
            names: HashMap::new(),
            num_bodies: 0,
        };
        builder.frames.push(PendingFrame {
            name: GROUND_NAME.to_string(),
            kind: PendingKind::Ground,
        });
        builder.names.insert(GROUND_NAME.to_string(), FrameId::GROUND);
        builder
    }

    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn ground(&self) -> FrameId {
        FrameId::GROUND
    }

    /// Add a frame whose pose is read from the state.
    ///
    /// Bodies are numbered in the order their frames are added.
    pub fn add_grounded_frame(&mut self, name: &str) -> Result<FrameId> {
        let body = BodyIndex(self.num_bodies);
        let id = self.add(name, PendingKind::Grounded { body })?;
        self.num_bodies += 1;
        Ok(id)
    }

    /// Add a frame fixed to `parent` at `offset` (`X_PF`).
    pub fn add_attached_frame(&mut self, name: &str, parent: FrameId, offset: Iso3) -> Result<FrameId> {
        self.check_known(parent, name)?;
        self.add(
            name,
            PendingKind::Attached {
                parent: Some(parent),
                offset,
            },
        )
    }

    /// Add an attached frame whose parent will be set later with `set_parent`.
    pub fn add_unparented_frame(&mut self, name: &str, offset: Iso3) -> Result<FrameId> {
        self.add(
            name,
            PendingKind::Attached {
                parent: None,
                offset,
            },
        )
    }

    /// (Re)attach an attached frame to a new parent.
    pub fn set_parent(&mut self, frame: FrameId, new_parent: FrameId) -> Result<()> {
        let name = self.name_of(frame)?;
        self.check_known(new_parent, &name)?;
        match self.frames[frame.0].kind {
            PendingKind::Attached { ref mut parent, .. } => {
                *parent = Some(new_parent);
                debug!(self.log, "Set frame parent"; "frame" => name, "parent" => new_parent.0);
                Ok(())
            }
            _ => Err(FrameError::structural(
                name,
                "only attached frames can be given a parent",
            )),
        }
    }

    /// Validate the topology and produce the immutable tree.
    pub fn freeze(self) -> Result<FrameTree> {
        match self.validate() {
            Ok(frames) => {
                let tree = FrameTree::from_validated(
                    &self.log,
                    self.config,
                    frames,
                    self.names,
                    self.num_bodies,
                );
                info!(tree.log(), "Frozen frame tree"; "frames" => tree.len(), "bodies" => tree.num_bodies());
                Ok(tree)
            }
            Err(error) => {
                warn!(self.log, "Rejected frame tree"; "error" => format!("{}", error));
                Err(error)
            }
        }
    }

    fn validate(&self) -> Result<Vec<Frame>> {
        if !self.config.is_valid() {
            return Err(FrameError::invalid_config(format!(
                "unit_tolerance must be positive and finite, got {}",
                self.config.unit_tolerance
            )));
        }

        let mut frames = Vec::with_capacity(self.frames.len());
        for pending in &self.frames {
            let kind = match pending.kind {
                PendingKind::Ground => FrameKind::Ground,
                PendingKind::Grounded { body } => FrameKind::Grounded { body },
                PendingKind::Attached { parent: None, .. } => {
                    return Err(FrameError::structural(
                        pending.name.as_str(),
                        "attached frame was never given a parent",
                    ));
                }
                PendingKind::Attached {
                    parent: Some(parent),
                    offset,
                } => {
                    self.check_offset(&pending.name, &offset)?;
                    FrameKind::Attached { parent, offset }
                }
            };
            frames.push(Frame {
                name: pending.name.clone(),
                kind,
            });
        }

        self.check_acyclic(&frames)?;
        Ok(frames)
    }

    fn check_offset(&self, name: &str, offset: &Iso3) -> Result<()> {
        if !iso_is_finite(offset) {
            return Err(FrameError::degenerate(name, "offset is not finite"));
        }
        let norm = offset.rotation.coords.norm();
        if (norm - 1.0).abs() > self.config.unit_tolerance {
            return Err(FrameError::degenerate(
                name,
                format!("offset rotation has norm {}, not 1", norm),
            ));
        }
        Ok(())
    }

    // Each frame is walked at most once: a walk stops at the first frame
    // already known to reach a root, and fails if it meets its own path.
    fn check_acyclic(&self, frames: &[Frame]) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnPath,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; frames.len()];
        let mut path = Vec::new();
        for start in 0..frames.len() {
            let mut next = Some(FrameId(start));
            while let Some(id) = next {
                match marks[id.0] {
                    Mark::Done => break,
                    Mark::OnPath => {
                        return Err(FrameError::structural(
                            frames[id.0].name.as_str(),
                            "parent chain forms a cycle",
                        ));
                    }
                    Mark::Unvisited => {
                        marks[id.0] = Mark::OnPath;
                        path.push(id);
                        next = frames[id.0].kind.parent();
                    }
                }
            }
            for id in path.drain(..) {
                marks[id.0] = Mark::Done;
            }
        }
        Ok(())
    }

    fn add(&mut self, name: &str, kind: PendingKind) -> Result<FrameId> {
        if self.names.contains_key(name) {
            return Err(FrameError::structural(name, "a frame with this name already exists"));
        }
        let id = FrameId(self.frames.len());
        self.frames.push(PendingFrame {
            name: name.to_string(),
            kind,
        });
        self.names.insert(name.to_string(), id);
        debug!(self.log, "Added frame"; "frame" => name, "id" => id.0);
        Ok(id)
    }

    fn name_of(&self, id: FrameId) -> Result<String> {
        self.frames
            .get(id.0)
            .map(|frame| frame.name.clone())
            .ok_or_else(|| FrameError::unknown_frame(format!("{:?}", id)))
    }

    fn check_known(&self, parent: FrameId, for_frame: &str) -> Result<()> {
        if parent.0 < self.frames.len() {
            Ok(())
        } else {
            Err(FrameError::structural(
                for_frame,
                format!("parent {:?} is not part of this model", parent),
            ))
        }
    }
}
