//! Baseline-tracking schedule store for Gantt editors.
//!
//! A Gantt widget edits tasks, dependencies, resources and resource
//! assignments and reports each edit through loosely-typed callbacks. This
//! crate keeps the canonical in-memory schedule for one editing session:
//!
//! - [`normalize`] turns raw widget records into canonical entities.
//! - [`diff`] computes added/removed/changed buckets between two snapshots.
//! - [`store`] holds baseline and live snapshots and keeps their delta current.
//! - [`adapter`] turns widget callbacks into store commands.
//!
//! ```
//! use schedule_delta::models::EntityKind;
//! use schedule_delta::seed::demo_seed;
//! use schedule_delta::store::ScheduleStore;
//! use serde_json::json;
//!
//! let mut store = ScheduleStore::new(&demo_seed()).unwrap();
//! let view = store
//!     .upsert(EntityKind::Tasks, &json!({"id": 1, "progress": 45}))
//!     .unwrap();
//! assert_eq!(view.delta.tasks.changed.len(), 1);
//! assert_eq!(view.delta.change_count(), 1);
//! ```

pub mod adapter;
pub mod config;
pub mod diff;
pub mod integrity;
pub mod models;
pub mod normalize;
pub mod seed;
pub mod store;
pub mod tree_render;
