//! The schedule store: a baseline snapshot, a live snapshot, and the delta
//! between them.
//!
//! The store is an ordinary value owned by whoever hosts the editing
//! session. Every command takes `&mut self`, applies its change, recomputes
//! the delta from scratch and hands back a [`StoreView`]. Because the delta
//! is rebuilt inside the same call, no reader can see a live snapshot
//! without its matching delta. Hosts that share a store across threads must
//! wrap it in a lock that admits one writer at a time.

mod command;

pub use command::Command;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::diff::diff_schedule;
use crate::models::*;
use crate::normalize::{canonical_id, normalize_schedule, Normalize, NormalizeError};

/// Why a command was rejected. A rejected command leaves the store untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("unknown entity kind `{0}`")]
    UnknownEntityKind(String),

    #[error("{0} are not tracked by this store")]
    UntrackedKind(EntityKind),
}

/// The state a reader observes after a command.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StoreView<'a> {
    pub revision: u64,
    pub live: &'a Schedule,
    pub delta: &'a ScheduleDelta,
}

#[derive(Debug, Clone)]
pub struct ScheduleStore {
    session_id: Uuid,
    entity_set: EntitySet,
    baseline: Schedule,
    live: Schedule,
    delta: ScheduleDelta,
    revision: u64,
}

impl ScheduleStore {
    /// Normalize `seed` into the baseline and start live as a copy of it.
    pub fn new(seed: &Value) -> Result<Self, StoreError> {
        Self::with_entity_set(seed, EntitySet::default())
    }

    pub fn with_entity_set(seed: &Value, entity_set: EntitySet) -> Result<Self, StoreError> {
        let baseline = normalize_tracked(seed, entity_set)?;
        Ok(Self::from_schedule(baseline, entity_set))
    }

    /// Start a session from an already-canonical baseline.
    pub fn from_schedule(mut baseline: Schedule, entity_set: EntitySet) -> Self {
        warn_dropped(&baseline.retain_tracked(entity_set));
        let live = baseline.clone();
        let delta = diff_schedule(&baseline, &live);
        let store = Self {
            session_id: Uuid::new_v4(),
            entity_set,
            baseline,
            live,
            delta,
            revision: 0,
        };
        tracing::debug!(
            session = %store.session_id,
            tasks = store.baseline.tasks.len(),
            dependencies = store.baseline.dependencies.len(),
            resources = store.baseline.resources.len(),
            assignments = store.baseline.resource_assignments.len(),
            "Schedule store created"
        );
        store
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn entity_set(&self) -> EntitySet {
        self.entity_set
    }

    pub fn baseline(&self) -> &Schedule {
        &self.baseline
    }

    pub fn live(&self) -> &Schedule {
        &self.live
    }

    pub fn delta(&self) -> &ScheduleDelta {
        &self.delta
    }

    /// Number of commands applied since the store was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn view(&self) -> StoreView<'_> {
        StoreView {
            revision: self.revision,
            live: &self.live,
            delta: &self.delta,
        }
    }

    /// Look up a live entity by its canonical id.
    pub fn find_live<E: Entity>(&self, id: &EntityId) -> Option<&E> {
        E::collection(&self.live).iter().find(|entity| entity.id() == id)
    }

    /// Resolve a collection name against what this store tracks.
    pub fn resolve_kind(&self, name: &str) -> Result<EntityKind, StoreError> {
        let kind = EntityKind::from_str(name)
            .ok_or_else(|| StoreError::UnknownEntityKind(name.to_string()))?;
        self.ensure_tracked(kind)?;
        Ok(kind)
    }

    pub fn apply(&mut self, command: Command) -> Result<StoreView<'_>, StoreError> {
        match command {
            Command::ReplaceAll { data } => self.replace_all(&data),
            Command::ReplaceBaseline { data } => self.replace_baseline(&data),
            Command::ResetToBaseline => Ok(self.reset_to_baseline()),
            Command::Upsert { kind, record } => self.upsert(kind, &record),
            Command::Remove { kind, id } => self.remove(kind, &id),
        }
    }

    /// Replace the live snapshot wholesale. The baseline is kept.
    pub fn replace_all(&mut self, data: &Value) -> Result<StoreView<'_>, StoreError> {
        self.live = normalize_tracked(data, self.entity_set)?;
        Ok(self.commit("replaceAll"))
    }

    /// Replace the baseline and start live over from it.
    pub fn replace_baseline(&mut self, data: &Value) -> Result<StoreView<'_>, StoreError> {
        let baseline = normalize_tracked(data, self.entity_set)?;
        self.live = baseline.clone();
        self.baseline = baseline;
        Ok(self.commit("replaceBaseline"))
    }

    pub fn reset_to_baseline(&mut self) -> StoreView<'_> {
        self.live = self.baseline.clone();
        self.commit("resetToBaseline")
    }

    /// Insert the record if its id is new, otherwise overwrite the fields it
    /// provides and keep the rest.
    pub fn upsert(&mut self, kind: EntityKind, record: &Value) -> Result<StoreView<'_>, StoreError> {
        self.ensure_tracked(kind)?;
        match kind {
            EntityKind::Tasks => upsert_entity::<Task>(&mut self.live, record)?,
            EntityKind::Dependencies => upsert_entity::<Dependency>(&mut self.live, record)?,
            EntityKind::Resources => upsert_entity::<Resource>(&mut self.live, record)?,
            EntityKind::ResourceAssignments => {
                upsert_entity::<ResourceAssignment>(&mut self.live, record)?
            }
        }
        Ok(self.commit("upsert"))
    }

    /// Remove the entity with this id. Removing an id that is not there is
    /// not an error.
    pub fn remove(&mut self, kind: EntityKind, id: &Value) -> Result<StoreView<'_>, StoreError> {
        self.ensure_tracked(kind)?;
        let id = match id {
            Value::Null => {
                return Err(NormalizeError::MissingField { kind, field: "id" }.into());
            }
            value => canonical_id(value).ok_or_else(|| NormalizeError::InvalidField {
                kind,
                field: "id",
                reason: format!("expected a string or number identifier, found {}", value),
            })?,
        };

        let removed = match kind {
            EntityKind::Tasks => remove_entity::<Task>(&mut self.live, &id),
            EntityKind::Dependencies => remove_entity::<Dependency>(&mut self.live, &id),
            EntityKind::Resources => remove_entity::<Resource>(&mut self.live, &id),
            EntityKind::ResourceAssignments => {
                remove_entity::<ResourceAssignment>(&mut self.live, &id)
            }
        };
        if !removed {
            tracing::debug!(session = %self.session_id, %kind, %id, "Remove of unknown id ignored");
        }
        Ok(self.commit("remove"))
    }

    fn ensure_tracked(&self, kind: EntityKind) -> Result<(), StoreError> {
        if self.entity_set.tracks(kind) {
            Ok(())
        } else {
            Err(StoreError::UntrackedKind(kind))
        }
    }

    fn commit(&mut self, op: &'static str) -> StoreView<'_> {
        self.delta = diff_schedule(&self.baseline, &self.live);
        self.revision += 1;
        tracing::debug!(
            session = %self.session_id,
            op,
            revision = self.revision,
            changes = self.delta.change_count(),
            "Command applied"
        );
        self.view()
    }
}

fn normalize_tracked(data: &Value, entity_set: EntitySet) -> Result<Schedule, StoreError> {
    let mut schedule = normalize_schedule(data)?;
    warn_dropped(&schedule.retain_tracked(entity_set));
    Ok(schedule)
}

fn warn_dropped(kinds: &[EntityKind]) {
    for kind in kinds {
        tracing::warn!(%kind, "Dropping records of an untracked collection");
    }
}

fn upsert_entity<E: Entity>(schedule: &mut Schedule, record: &Value) -> Result<(), StoreError> {
    let patch = E::Patch::from_raw(record)?;
    let items = E::collection_mut(schedule);
    match items.iter().position(|item| item.id() == patch.id()) {
        Some(index) => patch.merge_into(&mut items[index]),
        None => items.push(patch.into_entity()?),
    }
    Ok(())
}

fn remove_entity<E: Entity>(schedule: &mut Schedule, id: &EntityId) -> bool {
    let items = E::collection_mut(schedule);
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
