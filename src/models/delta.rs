use serde::Serialize;

use super::{Dependency, EntityKind, Resource, ResourceAssignment, Task};

/// Both versions of an entity whose fields differ between snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Changed<T> {
    pub before: T,
    pub after: T,
}

/// Added, removed and changed entities of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionDelta<T> {
    pub added: Vec<T>,
    pub removed: Vec<T>,
    pub changed: Vec<Changed<T>>,
}

impl<T> Default for CollectionDelta<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            changed: Vec::new(),
        }
    }
}

impl<T> CollectionDelta<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Total number of entries across all buckets.
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }

    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            added: self.added.len(),
            removed: self.removed.len(),
            changed: self.changed.len(),
        }
    }
}

/// The difference between baseline and live, per entity kind.
///
/// Always derived from the two snapshots in full; never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDelta {
    pub tasks: CollectionDelta<Task>,
    pub dependencies: CollectionDelta<Dependency>,
    pub resources: CollectionDelta<Resource>,
    pub resource_assignments: CollectionDelta<ResourceAssignment>,
}

impl ScheduleDelta {
    pub fn is_empty(&self) -> bool {
        self.change_count() == 0
    }

    /// Number of entries across every bucket of every kind. This is the
    /// figure an editor shows as its pending-changes counter.
    pub fn change_count(&self) -> usize {
        self.tasks.len()
            + self.dependencies.len()
            + self.resources.len()
            + self.resource_assignments.len()
    }

    pub fn counts_of(&self, kind: EntityKind) -> BucketCounts {
        match kind {
            EntityKind::Tasks => self.tasks.counts(),
            EntityKind::Dependencies => self.dependencies.counts(),
            EntityKind::Resources => self.resources.counts(),
            EntityKind::ResourceAssignments => self.resource_assignments.counts(),
        }
    }

    pub fn summary(&self) -> DeltaSummary {
        DeltaSummary {
            tasks: self.counts_of(EntityKind::Tasks),
            dependencies: self.counts_of(EntityKind::Dependencies),
            resources: self.counts_of(EntityKind::Resources),
            resource_assignments: self.counts_of(EntityKind::ResourceAssignments),
            total: self.change_count(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

/// Bucket sizes per kind, for compact reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaSummary {
    pub tasks: BucketCounts,
    pub dependencies: BucketCounts,
    pub resources: BucketCounts,
    pub resource_assignments: BucketCounts,
    pub total: usize,
}
