use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::EntityKind;

/// Everything that can change a store's live snapshot.
///
/// Serialized with an `op` tag so scripted edits can be fed in as JSON lines:
///
/// ```json
/// {"op": "upsert", "kind": "tasks", "record": {"id": 1, "progress": 45}}
/// {"op": "remove", "kind": "links", "id": 2}
/// {"op": "resetToBaseline"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Command {
    /// Replace the live snapshot with a new dataset. The baseline stays.
    ReplaceAll { data: Value },
    /// Replace the baseline itself, and reset live to it.
    ReplaceBaseline { data: Value },
    /// Throw away every edit.
    ResetToBaseline,
    /// Insert the record, or merge its provided fields into the existing one.
    Upsert { kind: EntityKind, record: Value },
    /// Drop the entity with this id. Unknown ids are ignored.
    Remove { kind: EntityKind, id: Value },
}

impl Command {
    pub fn upsert(kind: EntityKind, record: Value) -> Self {
        Self::Upsert { kind, record }
    }

    pub fn remove(kind: EntityKind, id: impl Into<Value>) -> Self {
        Self::Remove {
            kind,
            id: id.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ReplaceAll { .. } => "replaceAll",
            Self::ReplaceBaseline { .. } => "replaceBaseline",
            Self::ResetToBaseline => "resetToBaseline",
            Self::Upsert { .. } => "upsert",
            Self::Remove { .. } => "remove",
        }
    }

    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Self::Upsert { kind, .. } | Self::Remove { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
