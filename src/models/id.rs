use std::fmt;

use serde::{Serialize, Serializer};

/// The JSON value the widget uses in `parentId` for a top-level task.
pub const ROOT_PARENT_ID: i64 = 0;

/// Canonical identifier shared by every entity kind.
///
/// The widget hands out identifiers as numbers or text depending on where a
/// record came from. Everything inside the store is compared through this
/// single text form, so `1` and `"1"` name the same entity and `0` is an
/// ordinary identifier rather than an "absent" marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// Where a task hangs in the hierarchy.
///
/// `Root` is the widget's sentinel for "top of the tree" and survives
/// normalization untouched; it is not a reference to a task with id `"0"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParentRef {
    Root,
    Task(EntityId),
}

impl ParentRef {
    pub fn task_id(&self) -> Option<&EntityId> {
        match self {
            Self::Root => None,
            Self::Task(id) => Some(id),
        }
    }
}

impl Serialize for ParentRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Root => serializer.serialize_i64(ROOT_PARENT_ID),
            Self::Task(id) => id.serialize(serializer),
        }
    }
}
