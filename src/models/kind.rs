use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// The four entity collections a schedule is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Tasks,
    Dependencies,
    Resources,
    ResourceAssignments,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        Self::Tasks,
        Self::Dependencies,
        Self::Resources,
        Self::ResourceAssignments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Dependencies => "dependencies",
            Self::Resources => "resources",
            Self::ResourceAssignments => "resourceAssignments",
        }
    }

    /// Resolve a collection name. Singular and plural forms are accepted in
    /// camelCase or snake_case, and `links` names the dependency collection.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "task" | "tasks" => Some(Self::Tasks),
            "dependency" | "dependencies" | "link" | "links" => Some(Self::Dependencies),
            "resource" | "resources" => Some(Self::Resources),
            "resourceAssignment"
            | "resourceAssignments"
            | "resource_assignment"
            | "resource_assignments"
            | "assignment"
            | "assignments" => Some(Self::ResourceAssignments),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_str(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown entity kind `{}`", name)))
    }
}

/// Which collections a store tracks.
///
/// - `Full`: tasks, dependencies, resources and resource assignments
/// - `TasksOnly`: tasks and dependencies, for editors without resource planning
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntitySet {
    #[default]
    Full,
    TasksOnly,
}

impl EntitySet {
    pub fn tracks(&self, kind: EntityKind) -> bool {
        match self {
            Self::Full => true,
            Self::TasksOnly => matches!(kind, EntityKind::Tasks | EntityKind::Dependencies),
        }
    }
}
