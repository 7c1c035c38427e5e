use serde::Serialize;

use super::{Entity, EntityId, EntityKind, EntityPatch, Schedule};
use crate::normalize::NormalizeError;

/// Binds a resource to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAssignment {
    pub id: EntityId,
    pub task_id: EntityId,
    pub resource_id: EntityId,
}

/// A partial assignment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceAssignmentPatch {
    pub id: EntityId,
    pub task_id: Option<EntityId>,
    pub resource_id: Option<EntityId>,
}

impl EntityPatch for ResourceAssignmentPatch {
    type Entity = ResourceAssignment;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn merge_into(self, assignment: &mut ResourceAssignment) {
        if let Some(task_id) = self.task_id {
            assignment.task_id = task_id;
        }
        if let Some(resource_id) = self.resource_id {
            assignment.resource_id = resource_id;
        }
    }

    fn into_entity(self) -> Result<ResourceAssignment, NormalizeError> {
        let missing = |field| NormalizeError::MissingField {
            kind: EntityKind::ResourceAssignments,
            field,
        };
        Ok(ResourceAssignment {
            task_id: self.task_id.ok_or_else(|| missing("taskId"))?,
            resource_id: self.resource_id.ok_or_else(|| missing("resourceId"))?,
            id: self.id,
        })
    }
}

impl Entity for ResourceAssignment {
    type Patch = ResourceAssignmentPatch;
    const KIND: EntityKind = EntityKind::ResourceAssignments;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn collection(schedule: &Schedule) -> &[Self] {
        &schedule.resource_assignments
    }

    fn collection_mut(schedule: &mut Schedule) -> &mut Vec<Self> {
        &mut schedule.resource_assignments
    }
}
