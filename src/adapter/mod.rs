//! Translation of Gantt widget callbacks into store commands.
//!
//! Each callback becomes at most one [`Command`]: inserts, updates and
//! assignments become `upsert`, deletions and unassignments become `remove`.
//! An event without a usable record or id produces no command. That is
//! logged and counted but is not an error, since such an event never
//! described an edit.

mod event;
pub mod extract;

use std::cell::Cell;

pub use event::*;

use crate::models::EntityKind;
use crate::store::{Command, ScheduleStore, StoreError, StoreView};
use extract::*;

#[derive(Debug, Default)]
pub struct EventAdapter {
    misses: Cell<u64>,
}

impl EventAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events that yielded no command so far.
    pub fn misses(&self) -> u64 {
        self.misses.get()
    }

    pub fn translate(&self, event: &WidgetEvent) -> Option<Command> {
        let command = match event {
            WidgetEvent::TaskInserted(e) => upsert(EntityKind::Tasks, e, TASK_INSERT_SHAPES),
            WidgetEvent::TaskUpdated(e) => upsert(EntityKind::Tasks, e, TASK_UPDATE_SHAPES),
            WidgetEvent::TaskDeleted(e) => remove(EntityKind::Tasks, e, TASK_DELETE_SHAPES),
            WidgetEvent::DependencyInserted(e) => upsert(EntityKind::Dependencies, e, LINK_SHAPES),
            WidgetEvent::DependencyDeleted(e) => remove(EntityKind::Dependencies, e, LINK_SHAPES),
            WidgetEvent::ResourceInserted(e) => upsert(EntityKind::Resources, e, RESOURCE_SHAPES),
            WidgetEvent::ResourceDeleted(e) => remove(EntityKind::Resources, e, RESOURCE_SHAPES),
            WidgetEvent::ResourceAssigned(e) => {
                upsert(EntityKind::ResourceAssignments, e, LINK_SHAPES)
            }
            WidgetEvent::ResourceUnassigned(e) => {
                remove(EntityKind::ResourceAssignments, e, LINK_SHAPES)
            }
        };

        if command.is_none() {
            self.misses.set(self.misses.get() + 1);
            tracing::debug!(callback = event.name(), ?event, "No usable record in widget event");
        }
        command
    }

    /// Translate and apply in one step. `Ok(None)` means the event carried
    /// nothing to apply.
    pub fn dispatch<'s>(
        &self,
        store: &'s mut ScheduleStore,
        event: &WidgetEvent,
    ) -> Result<Option<StoreView<'s>>, StoreError> {
        match self.translate(event) {
            Some(command) => store.apply(command).map(Some),
            None => Ok(None),
        }
    }
}

fn upsert(kind: EntityKind, source: &impl PayloadSource, shapes: &[PayloadShape]) -> Option<Command> {
    extract_record(source, shapes).map(|record| Command::upsert(kind, record.into()))
}

fn remove(kind: EntityKind, source: &impl PayloadSource, shapes: &[PayloadShape]) -> Option<Command> {
    extract_id(source, shapes).map(|id| Command::remove(kind, id))
}
