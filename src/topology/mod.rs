pub mod alesage;
pub mod face;
pub mod zone;

pub use alesage::{Alesage, AlesageKind, DrillTarget};
pub use face::{Face, FaceId, FaceLabel};
pub use zone::{Axis, Frame, FunctionalBlock, Zone, ZoneKind};

use crate::error::TopologyError;
use slotmap::SlotMap;

/// Per-run arena that owns every face ever created.
///
/// Zones reference faces via typed IDs (generational indices). Faces of
/// discarded zones stay in the arena, so the lineage relations (`parent`,
/// `opposite`) remain resolvable for the whole run without any
/// self-referential ownership.
#[derive(Debug, Default)]
pub struct FaceStore {
    faces: SlotMap<FaceId, Face>,
}

impl FaceStore {
    /// Creates a new, empty face store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a face and returns its ID.
    pub fn add_face(&mut self, data: Face) -> FaceId {
        self.faces.insert(data)
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face(&self, id: FaceId) -> Result<&Face, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Returns a mutable reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn face_mut(&mut self, id: FaceId) -> Result<&mut Face, TopologyError> {
        self.faces
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Chases the `parent` lineage chain to the original boundary face
    /// this one descends from. A face with no parent is its own root.
    #[must_use]
    pub fn root(&self, id: FaceId) -> FaceId {
        let mut current = id;
        while let Some(parent) = self.faces.get(current).and_then(|f| f.parent) {
            current = parent;
        }
        current
    }
}
