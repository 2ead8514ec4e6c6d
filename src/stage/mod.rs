pub mod path;
pub mod prim;
pub mod xform;

pub use prim::{
    Collider, MeshData, ParticleSet, PointInstancerData, PrimData, PrimId, PrimKind, RigidBody,
};
pub use xform::XformOp;

use std::collections::HashMap;

use crate::error::StageError;
use crate::math::Matrix4;
use slotmap::SlotMap;

/// In-process scene graph that owns all prims.
///
/// Prims reference each other via typed IDs (generational indices) and are
/// additionally indexed by absolute path, so removing a subtree invalidates
/// its IDs without leaving dangling references.
#[derive(Debug, Default)]
pub struct Stage {
    prims: SlotMap<PrimId, PrimData>,
    paths: HashMap<String, PrimId>,
}

impl Stage {
    /// Creates a new, empty stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of prims on the stage.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prims.len()
    }

    /// Whether the stage holds no prims.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prims.is_empty()
    }

    /// Defines a prim of the given kind at `path` and returns its ID.
    ///
    /// Missing ancestors are created as untyped prims. If a prim already
    /// exists at `path` it is retyped in place, keeping its children,
    /// transform ops and tags.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a valid absolute prim path.
    pub fn define(&mut self, prim_path: &str, kind: PrimKind) -> Result<PrimId, StageError> {
        path::validate(prim_path)?;
        if let Some(&id) = self.paths.get(prim_path) {
            if let Some(prim) = self.prims.get_mut(id) {
                prim.kind = kind;
            }
            return Ok(id);
        }

        let parent = match path::parent(prim_path) {
            Some(parent_path) => Some(match self.paths.get(parent_path) {
                Some(&id) => id,
                None => self.define(parent_path, PrimKind::Untyped)?,
            }),
            None => None,
        };

        let id = self
            .prims
            .insert(PrimData::new(prim_path, kind, parent));
        if let Some(parent_id) = parent {
            if let Some(parent_prim) = self.prims.get_mut(parent_id) {
                parent_prim.children.push(id);
            }
        }
        self.paths.insert(prim_path.to_owned(), id);
        Ok(id)
    }

    /// Removes the prim at `path` together with its whole subtree.
    ///
    /// Returns `false` if no prim exists at `path`.
    pub fn remove(&mut self, prim_path: &str) -> bool {
        let Some(&id) = self.paths.get(prim_path) else {
            return false;
        };

        let parent = self.prims.get(id).and_then(|p| p.parent);
        if let Some(parent_prim) = parent.and_then(|pid| self.prims.get_mut(pid)) {
            parent_prim.children.retain(|&c| c != id);
        }

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(prim) = self.prims.remove(next) {
                self.paths.remove(&prim.path);
                pending.extend(prim.children);
            }
        }
        true
    }

    /// Looks up the prim at `path`.
    #[must_use]
    pub fn prim_at_path(&self, prim_path: &str) -> Option<PrimId> {
        self.paths.get(prim_path).copied()
    }

    /// Returns a reference to the prim data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the prim has been removed.
    pub fn prim(&self, id: PrimId) -> Result<&PrimData, StageError> {
        self.prims
            .get(id)
            .ok_or_else(|| StageError::PrimNotFound(format!("{id:?}")))
    }

    /// Returns a mutable reference to the prim data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the prim has been removed.
    pub fn prim_mut(&mut self, id: PrimId) -> Result<&mut PrimData, StageError> {
        self.prims
            .get_mut(id)
            .ok_or_else(|| StageError::PrimNotFound(format!("{id:?}")))
    }

    /// Returns the prim data at `path`, or an error if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if no prim exists at `path`.
    pub fn prim_by_path(&self, prim_path: &str) -> Result<&PrimData, StageError> {
        self.prim_at_path(prim_path)
            .and_then(|id| self.prims.get(id))
            .ok_or_else(|| StageError::PrimNotFound(prim_path.to_owned()))
    }

    /// Returns the mutable prim data at `path`, or an error if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if no prim exists at `path`.
    pub fn prim_by_path_mut(&mut self, prim_path: &str) -> Result<&mut PrimData, StageError> {
        self.prim_at_path(prim_path)
            .and_then(|id| self.prims.get_mut(id))
            .ok_or_else(|| StageError::PrimNotFound(prim_path.to_owned()))
    }

    /// Paths of the prim at `root` and all its descendants, sorted.
    #[must_use]
    pub fn subtree_paths(&self, root: &str) -> Vec<String> {
        let mut paths: Vec<String> = self
            .paths
            .keys()
            .filter(|p| path::is_within(p, root))
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    /// Replaces the transform op stack of a prim.
    ///
    /// # Errors
    ///
    /// Returns an error if the prim has been removed.
    pub fn set_xform_ops(&mut self, id: PrimId, ops: Vec<XformOp>) -> Result<(), StageError> {
        self.prim_mut(id)?.xform_ops = ops;
        Ok(())
    }

    /// Computes the prim's local transform from its op stack.
    ///
    /// # Errors
    ///
    /// Returns an error if the prim has been removed.
    pub fn local_transform(&self, id: PrimId) -> Result<Matrix4, StageError> {
        Ok(xform::compose(&self.prim(id)?.xform_ops))
    }

    /// Computes the accumulated local-to-world transform of a prim.
    ///
    /// # Errors
    ///
    /// Returns an error if the prim or one of its ancestors is missing.
    pub fn local_to_world(&self, id: PrimId) -> Result<Matrix4, StageError> {
        let mut matrix = Matrix4::identity();
        let mut current = Some(id);
        while let Some(cid) = current {
            let prim = self.prim(cid)?;
            matrix = xform::compose(&prim.xform_ops) * matrix;
            current = prim.parent;
        }
        Ok(matrix)
    }
}
