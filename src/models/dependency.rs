use serde::{Serialize, Serializer};

use super::{Entity, EntityId, EntityKind, EntityPatch, Schedule};
use crate::normalize::NormalizeError;

/// A link between two tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub id: EntityId,
    pub predecessor_id: EntityId,
    pub successor_id: EntityId,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub dependency_type: Option<DependencyType>,
}

/// How the successor's dates are tied to the predecessor's.
///
/// The widget encodes these as `0..=3` in the order below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyType {
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
}

impl DependencyType {
    pub fn code(&self) -> u8 {
        match self {
            Self::FinishToStart => 0,
            Self::StartToStart => 1,
            Self::FinishToFinish => 2,
            Self::StartToFinish => 3,
        }
    }

    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::FinishToStart),
            1 => Some(Self::StartToStart),
            2 => Some(Self::FinishToFinish),
            3 => Some(Self::StartToFinish),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinishToStart => "finish-to-start",
            Self::StartToStart => "start-to-start",
            Self::FinishToFinish => "finish-to-finish",
            Self::StartToFinish => "start-to-finish",
        }
    }

    /// Accepts kebab names, the two-letter codes and textual digits.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "finish-to-start" | "FS" | "fs" | "0" => Some(Self::FinishToStart),
            "start-to-start" | "SS" | "ss" | "1" => Some(Self::StartToStart),
            "finish-to-finish" | "FF" | "ff" | "2" => Some(Self::FinishToFinish),
            "start-to-finish" | "SF" | "sf" | "3" => Some(Self::StartToFinish),
            _ => None,
        }
    }
}

impl Serialize for DependencyType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// A partial dependency record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyPatch {
    pub id: EntityId,
    pub predecessor_id: Option<EntityId>,
    pub successor_id: Option<EntityId>,
    pub dependency_type: Option<Option<DependencyType>>,
}

impl EntityPatch for DependencyPatch {
    type Entity = Dependency;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn merge_into(self, dependency: &mut Dependency) {
        if let Some(predecessor_id) = self.predecessor_id {
            dependency.predecessor_id = predecessor_id;
        }
        if let Some(successor_id) = self.successor_id {
            dependency.successor_id = successor_id;
        }
        if let Some(dependency_type) = self.dependency_type {
            dependency.dependency_type = dependency_type;
        }
    }

    fn into_entity(self) -> Result<Dependency, NormalizeError> {
        let missing = |field| NormalizeError::MissingField {
            kind: EntityKind::Dependencies,
            field,
        };
        Ok(Dependency {
            predecessor_id: self
                .predecessor_id
                .ok_or_else(|| missing("predecessorId"))?,
            successor_id: self.successor_id.ok_or_else(|| missing("successorId"))?,
            dependency_type: self.dependency_type.flatten(),
            id: self.id,
        })
    }
}

impl Entity for Dependency {
    type Patch = DependencyPatch;
    const KIND: EntityKind = EntityKind::Dependencies;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn collection(schedule: &Schedule) -> &[Self] {
        &schedule.dependencies
    }

    fn collection_mut(schedule: &mut Schedule) -> &mut Vec<Self> {
        &mut schedule.dependencies
    }
}
