//! Identifier-keyed difference between two snapshots of a collection.

use std::collections::HashMap;

use crate::models::{Changed, CollectionDelta, Entity, EntityId, Schedule, ScheduleDelta};

/// Entities of one collection keyed by id, in first-seen order.
///
/// A repeated id keeps its first position and its last value, the way a
/// map built from the list would.
struct IdIndex<'a, T> {
    order: Vec<&'a EntityId>,
    by_id: HashMap<&'a EntityId, &'a T>,
}

impl<'a, T: Entity> IdIndex<'a, T> {
    fn build(items: &'a [T]) -> Self {
        let mut order = Vec::with_capacity(items.len());
        let mut by_id = HashMap::with_capacity(items.len());
        for item in items {
            if by_id.insert(item.id(), item).is_none() {
                order.push(item.id());
            }
        }
        Self { order, by_id }
    }

    fn get(&self, id: &EntityId) -> Option<&'a T> {
        self.by_id.get(id).copied()
    }

    fn contains(&self, id: &EntityId) -> bool {
        self.by_id.contains_key(id)
    }

    fn iter(&self) -> impl Iterator<Item = (&'a EntityId, &'a T)> + '_ {
        self.order.iter().map(|id| (*id, self.by_id[*id]))
    }
}

/// Compare two snapshots of one collection.
///
/// - `added`: ids only in `after`, in `after` order
/// - `removed`: ids only in `before`, in `before` order
/// - `changed`: ids in both whose canonical fields differ, in `after` order
///
/// Entities are compared field by field on their canonical values, so the
/// result depends only on what the records mean, not on how the widget
/// happened to spell them.
pub fn diff_by_id<T: Entity>(before: &[T], after: &[T]) -> CollectionDelta<T> {
    let before_index = IdIndex::build(before);
    let after_index = IdIndex::build(after);
    let mut delta = CollectionDelta::default();

    for (id, old) in before_index.iter() {
        if !after_index.contains(id) {
            delta.removed.push(old.clone());
        }
    }

    for (id, new) in after_index.iter() {
        match before_index.get(id) {
            None => delta.added.push(new.clone()),
            Some(old) if old != new => delta.changed.push(Changed {
                before: old.clone(),
                after: new.clone(),
            }),
            Some(_) => {}
        }
    }

    delta
}

/// Diff every collection of two schedules.
pub fn diff_schedule(baseline: &Schedule, live: &Schedule) -> ScheduleDelta {
    ScheduleDelta {
        tasks: diff_by_id(&baseline.tasks, &live.tasks),
        dependencies: diff_by_id(&baseline.dependencies, &live.dependencies),
        resources: diff_by_id(&baseline.resources, &live.resources),
        resource_assignments: diff_by_id(
            &baseline.resource_assignments,
            &live.resource_assignments,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resource;

    fn resource(id: &str, text: &str) -> Resource {
        Resource {
            id: EntityId::from(id),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_repeated_id_keeps_last_value() {
        let before = vec![resource("1", "Ann")];
        let after = vec![resource("1", "Bob"), resource("1", "Ann")];
        assert!(diff_by_id(&before, &after).is_empty());
    }

    #[test]
    fn test_buckets_follow_snapshot_order() {
        let before = vec![resource("a", "A"), resource("b", "B"), resource("c", "C")];
        let after = vec![resource("e", "E"), resource("b", "B2"), resource("d", "D")];
        let delta = diff_by_id(&before, &after);

        let ids = |items: &[Resource]| items.iter().map(|r| r.id.to_string()).collect::<Vec<_>>();
        assert_eq!(ids(&delta.removed), ["a", "c"]);
        assert_eq!(ids(&delta.added), ["e", "d"]);
        assert_eq!(delta.changed.len(), 1);
        assert_eq!(delta.changed[0].before.text, "B");
        assert_eq!(delta.changed[0].after.text, "B2");
    }
}
