//! ASCII tree rendering for the live task hierarchy.

use std::collections::{HashMap, HashSet};

use crate::models::{EntityId, ParentRef, Schedule, ScheduleDelta, Task};

const ADDED: char = '+';
const CHANGED: char = '~';
const UNCHANGED: char = '•';

/// How a live task relates to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Added,
    Changed,
    Unchanged,
}

fn status_symbol(status: TaskStatus) -> char {
    match status {
        TaskStatus::Added => ADDED,
        TaskStatus::Changed => CHANGED,
        TaskStatus::Unchanged => UNCHANGED,
    }
}

/// A live task with its nested children.
#[derive(Debug, Clone)]
pub struct TaskTreeNode<'a> {
    pub task: &'a Task,
    pub status: TaskStatus,
    pub children: Vec<TaskTreeNode<'a>>,
}

/// Arrange live tasks into a forest.
///
/// Tasks under the root sentinel, without a parent, or whose parent is not a
/// live task become roots. A task already placed is never placed again, so
/// a parent loop cannot recurse forever; tasks reachable only through a loop
/// are promoted to roots.
pub fn build_task_tree<'a>(live: &'a Schedule, delta: &ScheduleDelta) -> Vec<TaskTreeNode<'a>> {
    let added: HashSet<&EntityId> = delta.tasks.added.iter().map(|t| &t.id).collect();
    let changed: HashSet<&EntityId> = delta.tasks.changed.iter().map(|c| &c.after.id).collect();
    let status = |task: &Task| {
        if added.contains(&task.id) {
            TaskStatus::Added
        } else if changed.contains(&task.id) {
            TaskStatus::Changed
        } else {
            TaskStatus::Unchanged
        }
    };

    let live_ids: HashSet<&EntityId> = live.tasks.iter().map(|t| &t.id).collect();
    let mut children: HashMap<&EntityId, Vec<&Task>> = HashMap::new();
    let mut roots: Vec<&Task> = Vec::new();
    for task in &live.tasks {
        match &task.parent_id {
            Some(ParentRef::Task(parent)) if live_ids.contains(parent) => {
                children.entry(parent).or_default().push(task);
            }
            _ => roots.push(task),
        }
    }

    let mut placed: HashSet<&EntityId> = HashSet::new();
    let mut forest: Vec<TaskTreeNode<'a>> = roots
        .into_iter()
        .map(|task| build_node(task, &children, &status, &mut placed))
        .collect();

    for task in &live.tasks {
        if !placed.contains(&task.id) {
            forest.push(build_node(task, &children, &status, &mut placed));
        }
    }
    forest
}

fn build_node<'a>(
    task: &'a Task,
    children: &HashMap<&'a EntityId, Vec<&'a Task>>,
    status: &impl Fn(&Task) -> TaskStatus,
    placed: &mut HashSet<&'a EntityId>,
) -> TaskTreeNode<'a> {
    placed.insert(&task.id);
    let mut node = TaskTreeNode {
        task,
        status: status(task),
        children: Vec::new(),
    };
    for child in children.get(&task.id).into_iter().flatten() {
        if !placed.contains(&child.id) {
            node.children.push(build_node(child, children, status, placed));
        }
    }
    node
}

/// Render a task forest as ASCII art with change markers.
///
/// Example output:
/// ```text
/// • Project
/// ├── • Analysis
/// └── ~ Implementation
///     ├── • Component A
///     └── + Component B
/// ```
pub fn render_tree(nodes: &[TaskTreeNode<'_>]) -> String {
    let mut output = String::new();
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i == nodes.len() - 1;
        render_node(&mut output, node, "", is_last, true);
    }
    output
}

/// Build and render the live tree in one step.
pub fn render_task_tree(live: &Schedule, delta: &ScheduleDelta) -> String {
    render_tree(&build_task_tree(live, delta))
}

fn render_node(
    output: &mut String,
    node: &TaskTreeNode<'_>,
    prefix: &str,
    is_last: bool,
    is_root: bool,
) {
    if !is_root {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
    }
    output.push(status_symbol(node.status));
    output.push(' ');
    output.push_str(&node.task.title);
    output.push('\n');

    // Roots start the indentation afresh
    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_schedule;
    use chrono::{TimeZone, Utc};

    fn make_task(id: &str, parent: Option<ParentRef>, title: &str) -> Task {
        Task {
            id: EntityId::from(id),
            parent_id: parent,
            title: title.to_string(),
            start: Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 10, 2, 0, 0, 0).unwrap(),
            progress: None,
        }
    }

    fn under(id: &str) -> Option<ParentRef> {
        Some(ParentRef::Task(EntityId::from(id)))
    }

    #[test]
    fn test_single_root() {
        let live = Schedule {
            tasks: vec![make_task("1", Some(ParentRef::Root), "Project")],
            ..Default::default()
        };
        let output = render_task_tree(&live, &ScheduleDelta::default());
        assert_eq!(output, "• Project\n");
    }

    #[test]
    fn test_nested_children_with_markers() {
        let baseline = Schedule {
            tasks: vec![
                make_task("1", Some(ParentRef::Root), "Project"),
                make_task("2", under("1"), "Analysis"),
                make_task("3", under("1"), "Implementation"),
                make_task("4", under("3"), "Component A"),
            ],
            ..Default::default()
        };
        let mut live = baseline.clone();
        live.tasks[2].title = "Implementation".to_string();
        live.tasks[2].progress = Some(50);
        live.tasks.push(make_task("5", under("3"), "Component B"));

        let delta = diff_schedule(&baseline, &live);
        let output = render_task_tree(&live, &delta);
        let expected = "• Project\n├── • Analysis\n└── ~ Implementation\n    ├── • Component A\n    └── + Component B\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_parent_loop_terminates() {
        let live = Schedule {
            tasks: vec![make_task("1", under("2"), "A"), make_task("2", under("1"), "B")],
            ..Default::default()
        };
        let output = render_task_tree(&live, &ScheduleDelta::default());
        assert_eq!(output, "• A\n└── • B\n");
    }
}
