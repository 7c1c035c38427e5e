//! Canonical schedule types.
//!
//! # Entities
//!
//! - [`Task`]: a scheduled unit of work, optionally nested under a parent task.
//! - [`Dependency`]: a typed link from a predecessor task to a successor task.
//! - [`Resource`]: something that can be assigned to tasks.
//! - [`ResourceAssignment`]: binds one resource to one task.
//!
//! Every entity has a partial counterpart (`TaskPatch`, ...) produced by the
//! normalizer from loosely-typed widget records. A patch either merges into an
//! existing entity or, when it carries every required field, becomes one.
//!
//! # Snapshots
//!
//! - [`Schedule`]: all four collections at one point in time.
//! - [`ScheduleDelta`]: what differs between two schedules, per kind.

mod assignment;
mod delta;
mod dependency;
mod id;
mod kind;
mod resource;
mod schedule;
mod task;

use std::fmt;

pub use assignment::*;
pub use delta::*;
pub use dependency::*;
pub use id::*;
pub use kind::*;
pub use resource::*;
pub use schedule::*;
pub use task::*;

use crate::normalize::{Normalize, NormalizeError};

/// An identifiable member of one of the schedule's collections.
pub trait Entity: Clone + PartialEq + fmt::Debug {
    type Patch: EntityPatch<Entity = Self> + Normalize;
    const KIND: EntityKind;

    fn id(&self) -> &EntityId;
    fn collection(schedule: &Schedule) -> &[Self];
    fn collection_mut(schedule: &mut Schedule) -> &mut Vec<Self>;
}

/// A normalized but possibly incomplete entity record.
pub trait EntityPatch: Sized {
    type Entity;

    fn id(&self) -> &EntityId;

    /// Shallow merge: every provided field overwrites, the rest stay as they are.
    fn merge_into(self, entity: &mut Self::Entity);

    /// Build a full entity, failing on the first missing required field.
    fn into_entity(self) -> Result<Self::Entity, NormalizeError>;
}
