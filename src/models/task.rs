use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Entity, EntityId, EntityKind, EntityPatch, ParentRef, Schedule};
use crate::normalize::NormalizeError;

/// A bar on the chart: a unit of scheduled work.
///
/// Tasks form a tree via `parent_id`. The tree is not guaranteed to be
/// acyclic and `start <= end` is not enforced here; both are the
/// producer's responsibility and are reported by [`crate::integrity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    /// `None` when the record carried no parent at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ParentRef>,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Percent complete, `0..=100`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

/// A partial task record. Every field except `id` may be left out.
///
/// Clearable fields use a nested `Option`: the outer level says whether the
/// field was provided, the inner level whether it was set or cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPatch {
    pub id: EntityId,
    pub parent_id: Option<Option<ParentRef>>,
    pub title: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub progress: Option<Option<u8>>,
}

impl EntityPatch for TaskPatch {
    type Entity = Task;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn merge_into(self, task: &mut Task) {
        if let Some(parent_id) = self.parent_id {
            task.parent_id = parent_id;
        }
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(start) = self.start {
            task.start = start;
        }
        if let Some(end) = self.end {
            task.end = end;
        }
        if let Some(progress) = self.progress {
            task.progress = progress;
        }
    }

    fn into_entity(self) -> Result<Task, NormalizeError> {
        let missing = |field| NormalizeError::MissingField {
            kind: EntityKind::Tasks,
            field,
        };
        Ok(Task {
            title: self.title.ok_or_else(|| missing("title"))?,
            start: self.start.ok_or_else(|| missing("start"))?,
            end: self.end.ok_or_else(|| missing("end"))?,
            parent_id: self.parent_id.flatten(),
            progress: self.progress.flatten(),
            id: self.id,
        })
    }
}

impl Entity for Task {
    type Patch = TaskPatch;
    const KIND: EntityKind = EntityKind::Tasks;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn collection(schedule: &Schedule) -> &[Self] {
        &schedule.tasks
    }

    fn collection_mut(schedule: &mut Schedule) -> &mut Vec<Self> {
        &mut schedule.tasks
    }
}
