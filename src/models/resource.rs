use serde::Serialize;

use super::{Entity, EntityId, EntityKind, EntityPatch, Schedule};
use crate::normalize::NormalizeError;

/// Someone or something that can be assigned to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    pub id: EntityId,
    /// Display label.
    pub text: String,
}

/// A partial resource record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePatch {
    pub id: EntityId,
    pub text: Option<String>,
}

impl EntityPatch for ResourcePatch {
    type Entity = Resource;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn merge_into(self, resource: &mut Resource) {
        if let Some(text) = self.text {
            resource.text = text;
        }
    }

    fn into_entity(self) -> Result<Resource, NormalizeError> {
        let text = self.text.ok_or(NormalizeError::MissingField {
            kind: EntityKind::Resources,
            field: "text",
        })?;
        Ok(Resource { id: self.id, text })
    }
}

impl Entity for Resource {
    type Patch = ResourcePatch;
    const KIND: EntityKind = EntityKind::Resources;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn collection(schedule: &Schedule) -> &[Self] {
        &schedule.resources
    }

    fn collection_mut(schedule: &mut Schedule) -> &mut Vec<Self> {
        &mut schedule.resources
    }
}
