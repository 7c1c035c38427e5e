use serde::Serialize;

use super::{Dependency, EntityKind, EntitySet, Resource, ResourceAssignment, Task};

/// One complete snapshot of a schedule: the four entity collections in
/// insertion order.
///
/// Cloning yields a fully independent copy; nothing inside is shared, so a
/// baseline and a live snapshot cloned from it never observe each other's
/// mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub tasks: Vec<Task>,
    pub dependencies: Vec<Dependency>,
    pub resources: Vec<Resource>,
    pub resource_assignments: Vec<ResourceAssignment>,
}

impl Schedule {
    pub fn len_of(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Tasks => self.tasks.len(),
            EntityKind::Dependencies => self.dependencies.len(),
            EntityKind::Resources => self.resources.len(),
            EntityKind::ResourceAssignments => self.resource_assignments.len(),
        }
    }

    /// Empty every collection the given set does not track. Returns the kinds
    /// that actually had records dropped.
    pub fn retain_tracked(&mut self, set: EntitySet) -> Vec<EntityKind> {
        let mut dropped = Vec::new();
        for kind in EntityKind::ALL {
            if set.tracks(kind) || self.len_of(kind) == 0 {
                continue;
            }
            match kind {
                EntityKind::Tasks => self.tasks.clear(),
                EntityKind::Dependencies => self.dependencies.clear(),
                EntityKind::Resources => self.resources.clear(),
                EntityKind::ResourceAssignments => self.resource_assignments.clear(),
            }
            dropped.push(kind);
        }
        dropped
    }
}
