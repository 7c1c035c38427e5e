use serde::Deserialize;
use serde_json::Value;

use super::extract::{PayloadShape, PayloadSource};

/// A mutation callback raised by the Gantt widget.
///
/// Deserialized from the callback's argument object with an added `event`
/// tag naming the callback, e.g. `{"event": "taskUpdated", "key": 3,
/// "newValues": {"progress": 45}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum WidgetEvent {
    TaskInserted(TaskEvent),
    TaskUpdated(TaskEvent),
    TaskDeleted(TaskEvent),
    DependencyInserted(LinkEvent),
    DependencyDeleted(LinkEvent),
    ResourceInserted(ResourceEvent),
    ResourceDeleted(ResourceEvent),
    ResourceAssigned(LinkEvent),
    ResourceUnassigned(LinkEvent),
}

impl WidgetEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TaskInserted(_) => "taskInserted",
            Self::TaskUpdated(_) => "taskUpdated",
            Self::TaskDeleted(_) => "taskDeleted",
            Self::DependencyInserted(_) => "dependencyInserted",
            Self::DependencyDeleted(_) => "dependencyDeleted",
            Self::ResourceInserted(_) => "resourceInserted",
            Self::ResourceDeleted(_) => "resourceDeleted",
            Self::ResourceAssigned(_) => "resourceAssigned",
            Self::ResourceUnassigned(_) => "resourceUnassigned",
        }
    }
}

/// Task callbacks. Depending on action and widget version the record sits
/// under `values`, `newValues`, `newData` or `taskData`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEvent {
    #[serde(default)]
    pub key: Option<Value>,
    #[serde(default)]
    pub values: Option<Value>,
    #[serde(default)]
    pub new_values: Option<Value>,
    #[serde(default)]
    pub new_data: Option<Value>,
    #[serde(default)]
    pub task_data: Option<Value>,
}

/// Dependency and resource-assignment callbacks: `values`, `newData` or `data`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkEvent {
    #[serde(default)]
    pub key: Option<Value>,
    #[serde(default)]
    pub values: Option<Value>,
    #[serde(default)]
    pub new_data: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Resource callbacks: `values` or `data`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEvent {
    #[serde(default)]
    pub key: Option<Value>,
    #[serde(default)]
    pub values: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl PayloadSource for TaskEvent {
    fn key(&self) -> Option<&Value> {
        self.key.as_ref()
    }

    fn shape(&self, shape: PayloadShape) -> Option<&Value> {
        match shape {
            PayloadShape::Values => self.values.as_ref(),
            PayloadShape::NewValues => self.new_values.as_ref(),
            PayloadShape::NewData => self.new_data.as_ref(),
            PayloadShape::TaskData => self.task_data.as_ref(),
            PayloadShape::Data => None,
        }
    }
}

impl PayloadSource for LinkEvent {
    fn key(&self) -> Option<&Value> {
        self.key.as_ref()
    }

    fn shape(&self, shape: PayloadShape) -> Option<&Value> {
        match shape {
            PayloadShape::Values => self.values.as_ref(),
            PayloadShape::NewData => self.new_data.as_ref(),
            PayloadShape::Data => self.data.as_ref(),
            PayloadShape::NewValues | PayloadShape::TaskData => None,
        }
    }
}

impl PayloadSource for ResourceEvent {
    fn key(&self) -> Option<&Value> {
        self.key.as_ref()
    }

    fn shape(&self, shape: PayloadShape) -> Option<&Value> {
        match shape {
            PayloadShape::Values => self.values.as_ref(),
            PayloadShape::Data => self.data.as_ref(),
            _ => None,
        }
    }
}
