use std::fmt;
use std::ptr;

use crate::error::{FrameError, Result};
use crate::state::{BodyIndex, State};
use crate::tree::FrameTree;
use crate::types::*;

/// Index of a frame within its `FrameTree`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameId(pub(crate) usize);

impl FrameId {
    pub(crate) const GROUND: FrameId = FrameId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// The fixed set of frame variants.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameKind {
    /// The distinguished global frame. Always at the identity.
    Ground,
    /// Pose read straight out of the state, e.g. a simulated body.
    Grounded { body: BodyIndex },
    /// Rigidly attached to `parent` at a fixed `offset` (`X_PF`).
    Attached { parent: FrameId, offset: Iso3 },
}

impl FrameKind {
    pub fn parent(&self) -> Option<FrameId> {
        match *self {
            FrameKind::Attached { parent, .. } => Some(parent),
            _ => None,
        }
    }

    /// Whether a frame of this kind is its own base frame.
    ///
    /// Attached frames only ever add a fixed offset, so they share
    /// their parent's angular velocity and never count as a base.
    pub fn is_base(&self) -> bool {
        match *self {
            FrameKind::Attached { .. } => false,
            FrameKind::Ground | FrameKind::Grounded { .. } => true,
        }
    }
}

pub(crate) struct Frame {
    pub(crate) name: String,
    pub(crate) kind: FrameKind,
}

/// A frame within a frozen `FrameTree`.
///
/// Cheap to copy; all spatial queries on a frame go through this.
/// Transform names follow the `X_AF` convention: the transform that
/// re-expresses quantities given in frame F in frame A.
#[derive(Clone, Copy)]
pub struct FrameRef<'a> {
    tree: &'a FrameTree,
    id: FrameId,
}

impl<'a> FrameRef<'a> {
    pub(crate) fn new(tree: &'a FrameTree, id: FrameId) -> FrameRef<'a> {
        FrameRef { tree, id }
    }

    fn node(&self) -> &'a Frame {
        self.tree.node(self.id)
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.node().name
    }

    pub fn kind(&self) -> &'a FrameKind {
        &self.node().kind
    }

    pub fn tree(&self) -> &'a FrameTree {
        self.tree
    }

    /// The state body this frame reads its pose from, if any.
    pub fn body(&self) -> Option<BodyIndex> {
        match *self.kind() {
            FrameKind::Grounded { body } => Some(body),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<FrameRef<'a>> {
        self.kind()
            .parent()
            .map(|parent| self.tree.frame_unchecked(parent))
    }

    /// Number of attachment edges between this frame and its root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut frame = *self;
        while let Some(parent) = frame.parent() {
            depth += 1;
            frame = parent;
        }
        depth
    }

    //
    // Spatial operations.
    //

    /// `X_GF`: transform of this frame (F) relative to ground (G).
    pub fn ground_transform<S: State + ?Sized>(&self, state: &S) -> Result<Iso3> {
        self.tree.check_state(state)?;
        self.cached_ground_transform(state)
    }

    /// `X_AF` where A is `other`.
    ///
    /// Both frames are taken to ground and back: `X_AF = X_GA^-1 * X_GF`.
    pub fn find_transform_between<S: State + ?Sized>(
        &self,
        state: &S,
        other: FrameRef<'_>,
    ) -> Result<Iso3> {
        self.check_same_tree(other)?;
        let x_gf = self.ground_transform(state)?;
        let x_ga = other.ground_transform(state)?;
        Ok(x_ga.inverse() * x_gf)
    }

    /// Re-express a direction given in this frame in `other`: `R_AF * vec`.
    ///
    /// Only the rotation applies; use this for things like angular velocity
    /// or forces, not for positions.
    pub fn express_vector_in_another_frame<S: State + ?Sized>(
        &self,
        state: &S,
        vec: &Vec3,
        other: FrameRef<'_>,
    ) -> Result<Vec3> {
        let x_af = self.find_transform_between(state, other)?;
        Ok(x_af.rotation.transform_vector(vec))
    }

    /// Locate a point given in this frame in `other`: `X_AF * point`.
    pub fn find_location_in_another_frame<S: State + ?Sized>(
        &self,
        state: &S,
        point: &Vec3,
        other: FrameRef<'_>,
    ) -> Result<Vec3> {
        let x_af = self.find_transform_between(state, other)?;
        Ok(x_af.transform_point(&Pt3::from(*point)).coords)
    }

    //
    // Ancestry. None of these depend on the state.
    //

    pub fn is_base_frame(&self) -> bool {
        self.kind().is_base()
    }

    /// The furthest ancestor (possibly this frame) with the same angular
    /// velocity as this frame; the rigid thing this frame is a view of.
    pub fn find_base_frame(&self) -> FrameRef<'a> {
        if self.is_base_frame() {
            *self
        } else {
            self.extend_find_base_frame()
        }
    }

    /// `X_BF`, where B is `find_base_frame()`. Identity for a base frame.
    pub fn find_transform_in_base_frame(&self) -> Iso3 {
        if self.is_base_frame() {
            Iso3::identity()
        } else {
            self.extend_find_transform_in_base_frame()
        }
    }

    /// `X_AF` without a state, when F and A are rigidly fixed to the same
    /// base frame. `None` if they move relative to each other (or belong
    /// to different trees).
    pub fn find_fixed_transform_between(&self, other: FrameRef<'_>) -> Option<Iso3> {
        if !ptr::eq(self.tree, other.tree) {
            return None;
        }
        if self.find_base_frame().id != other.find_base_frame().id {
            return None;
        }
        let x_bf = self.find_transform_in_base_frame();
        let x_ba = other.find_transform_in_base_frame();
        Some(x_ba.inverse() * x_bf)
    }

    //
    // Per-variant behaviour.
    //

    // Walks up to the nearest ancestor whose ground transform is already
    // known (or to the root), then folds the offsets back down, filling
    // the cache on the way. Loops rather than recursing so chain depth
    // only costs heap.
    fn cached_ground_transform<S: State + ?Sized>(&self, state: &S) -> Result<Iso3> {
        let caching = self.tree.config().cache_ground_transforms;
        let cache = state.transform_cache();
        let stamp = state.stamp();

        let mut pending: Vec<(FrameId, Iso3)> = Vec::new();
        let mut frame = *self;
        let mut x_g = loop {
            if caching {
                if let Some(x_g) = cache.get(frame.id, stamp) {
                    break x_g;
                }
            }
            match *frame.kind() {
                FrameKind::Attached { parent, offset } => {
                    pending.push((frame.id, offset));
                    frame = self.tree.frame_unchecked(parent);
                }
                FrameKind::Ground | FrameKind::Grounded { .. } => {
                    let x_g = frame.calc_ground_transform(state)?;
                    if caching {
                        cache.insert(frame.id, stamp, x_g);
                    }
                    break x_g;
                }
            }
        };

        // X_GF = X_GP * X_PF, child offset applied first.
        while let Some((id, offset)) = pending.pop() {
            x_g *= offset;
            if caching {
                cache.insert(id, stamp, x_g);
            }
        }
        Ok(x_g)
    }

    // Ground transform of a root frame. Attached frames are folded
    // onto their parent's result by `cached_ground_transform`.
    fn calc_ground_transform<S: State + ?Sized>(&self, state: &S) -> Result<Iso3> {
        match *self.kind() {
            FrameKind::Ground => Ok(Iso3::identity()),
            FrameKind::Grounded { body } => {
                let x_gb = state.body_pose(body)?;
                if !iso_is_finite(&x_gb) {
                    return Err(FrameError::degenerate(
                        self.name(),
                        format!("state pose of body {} is not finite", body.0),
                    ));
                }
                Ok(x_gb)
            }
            FrameKind::Attached { .. } => self.cached_ground_transform(state),
        }
    }

    fn extend_find_base_frame(&self) -> FrameRef<'a> {
        // Only attached frames have parents, and they are never a base.
        let mut frame = *self;
        while let Some(parent) = frame.parent() {
            frame = parent;
        }
        frame
    }

    fn extend_find_transform_in_base_frame(&self) -> Iso3 {
        // Accumulates X_BF = X_BP * X_PF walking upwards.
        let mut x_bf = Iso3::identity();
        let mut frame = *self;
        while let FrameKind::Attached { parent, offset } = *frame.kind() {
            x_bf = offset * x_bf;
            frame = self.tree.frame_unchecked(parent);
        }
        x_bf
    }

    fn check_same_tree(&self, other: FrameRef<'_>) -> Result<()> {
        if ptr::eq(self.tree, other.tree) {
            Ok(())
        } else {
            Err(FrameError::ForeignFrame)
        }
    }
}

impl<'a> PartialEq for FrameRef<'a> {
    fn eq(&self, other: &FrameRef<'a>) -> bool {
        ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<'a> Eq for FrameRef<'a> {}

impl<'a> fmt::Debug for FrameRef<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FrameRef")
            .field("name", &self.name())
            .field("id", &self.id)
            .field("model", &self.tree.model_id())
            .finish()
    }
}
