//! Referential and temporal checks over a schedule.
//!
//! The store accepts whatever the widget sends: a task may end before it
//! starts, a dependency may point at a deleted task, a parent chain may loop.
//! These are producer mistakes, not store errors, so this module only
//! reports them. Nothing here rejects or repairs data.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::models::{EntityId, ParentRef, Schedule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum IntegrityIssue {
    InvertedDates {
        task: EntityId,
    },
    DanglingParent {
        task: EntityId,
        parent: EntityId,
    },
    /// Task ids along the loop, ending where it started.
    ParentCycle {
        path: Vec<EntityId>,
    },
    DanglingDependency {
        dependency: EntityId,
        task: EntityId,
    },
    SelfDependency {
        dependency: EntityId,
    },
    DanglingAssignmentTask {
        assignment: EntityId,
        task: EntityId,
    },
    DanglingAssignmentResource {
        assignment: EntityId,
        resource: EntityId,
    },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedDates { task } => write!(f, "task {} ends before it starts", task),
            Self::DanglingParent { task, parent } => {
                write!(f, "task {} has unknown parent {}", task, parent)
            }
            Self::ParentCycle { path } => {
                let ids: Vec<&str> = path.iter().map(EntityId::as_str).collect();
                write!(f, "parent cycle {}", ids.join(" -> "))
            }
            Self::DanglingDependency { dependency, task } => {
                write!(f, "dependency {} references unknown task {}", dependency, task)
            }
            Self::SelfDependency { dependency } => {
                write!(f, "dependency {} links a task to itself", dependency)
            }
            Self::DanglingAssignmentTask { assignment, task } => {
                write!(f, "assignment {} references unknown task {}", assignment, task)
            }
            Self::DanglingAssignmentResource {
                assignment,
                resource,
            } => write!(
                f,
                "assignment {} references unknown resource {}",
                assignment, resource
            ),
        }
    }
}

/// Every issue found, grouped by check and in collection order within each.
pub fn check(schedule: &Schedule) -> Vec<IntegrityIssue> {
    let task_ids: HashSet<&EntityId> = schedule.tasks.iter().map(|t| &t.id).collect();
    let resource_ids: HashSet<&EntityId> = schedule.resources.iter().map(|r| &r.id).collect();
    let mut issues = Vec::new();

    for task in &schedule.tasks {
        if task.start > task.end {
            issues.push(IntegrityIssue::InvertedDates {
                task: task.id.clone(),
            });
        }
        if let Some(ParentRef::Task(parent)) = &task.parent_id {
            if !task_ids.contains(parent) {
                issues.push(IntegrityIssue::DanglingParent {
                    task: task.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    issues.extend(
        parent_cycles(schedule)
            .into_iter()
            .map(|path| IntegrityIssue::ParentCycle { path }),
    );

    for dependency in &schedule.dependencies {
        if dependency.predecessor_id == dependency.successor_id {
            issues.push(IntegrityIssue::SelfDependency {
                dependency: dependency.id.clone(),
            });
        }
        for endpoint in [&dependency.predecessor_id, &dependency.successor_id] {
            if !task_ids.contains(endpoint) {
                issues.push(IntegrityIssue::DanglingDependency {
                    dependency: dependency.id.clone(),
                    task: endpoint.clone(),
                });
            }
        }
    }

    for assignment in &schedule.resource_assignments {
        if !task_ids.contains(&assignment.task_id) {
            issues.push(IntegrityIssue::DanglingAssignmentTask {
                assignment: assignment.id.clone(),
                task: assignment.task_id.clone(),
            });
        }
        if !resource_ids.contains(&assignment.resource_id) {
            issues.push(IntegrityIssue::DanglingAssignmentResource {
                assignment: assignment.id.clone(),
                resource: assignment.resource_id.clone(),
            });
        }
    }

    issues
}

/// Loops in the parent chain. Each task has at most one parent, so following
/// parents from every task once, and skipping tasks already resolved, finds
/// each loop exactly once in O(n).
fn parent_cycles(schedule: &Schedule) -> Vec<Vec<EntityId>> {
    let parents: HashMap<&EntityId, &EntityId> = schedule
        .tasks
        .iter()
        .filter_map(|task| {
            task.parent_id
                .as_ref()
                .and_then(ParentRef::task_id)
                .map(|parent| (&task.id, parent))
        })
        .collect();

    let mut resolved: HashSet<&EntityId> = HashSet::new();
    let mut cycles = Vec::new();

    for task in &schedule.tasks {
        let mut path: Vec<&EntityId> = Vec::new();
        let mut position: HashMap<&EntityId, usize> = HashMap::new();
        let mut current = Some(&task.id);

        while let Some(id) = current {
            if resolved.contains(id) {
                break;
            }
            if let Some(&start) = position.get(id) {
                let mut cycle: Vec<EntityId> = path[start..].iter().map(|id| (*id).clone()).collect();
                cycle.push(id.clone());
                cycles.push(cycle);
                break;
            }
            position.insert(id, path.len());
            path.push(id);
            current = parents.get(id).copied();
        }

        resolved.extend(path);
    }

    cycles
}
