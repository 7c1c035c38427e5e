//! Best-effort record extraction from widget callback payloads.
//!
//! The widget places the affected record under different property names
//! depending on the action that raised the callback. Each event kind gets an
//! ordered list of shapes to try; the first shape holding a JSON object wins.

use serde_json::Value;

use crate::normalize::{canonical_id, RawRecord};

/// A property of a callback payload that may hold the affected record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Values,
    NewValues,
    NewData,
    TaskData,
    Data,
}

/// Payload access shared by every callback family.
pub trait PayloadSource {
    /// The widget's own key for the affected record, if it sent one.
    fn key(&self) -> Option<&Value>;

    fn shape(&self, shape: PayloadShape) -> Option<&Value>;
}

pub const TASK_INSERT_SHAPES: &[PayloadShape] = &[
    PayloadShape::Values,
    PayloadShape::NewData,
    PayloadShape::TaskData,
];

/// Updates carry the changed fields in `newValues`; `values` may hold the
/// record as it was before the edit.
pub const TASK_UPDATE_SHAPES: &[PayloadShape] = &[
    PayloadShape::NewValues,
    PayloadShape::Values,
    PayloadShape::NewData,
    PayloadShape::TaskData,
];

pub const TASK_DELETE_SHAPES: &[PayloadShape] = TASK_INSERT_SHAPES;

pub const LINK_SHAPES: &[PayloadShape] = &[
    PayloadShape::Values,
    PayloadShape::NewData,
    PayloadShape::Data,
];

pub const RESOURCE_SHAPES: &[PayloadShape] = &[PayloadShape::Values, PayloadShape::Data];

fn first_object<'a>(
    source: &'a impl PayloadSource,
    shapes: &[PayloadShape],
) -> Option<&'a RawRecord> {
    shapes
        .iter()
        .find_map(|shape| source.shape(*shape).and_then(Value::as_object))
}

/// `Some` for any value usable as an identifier, including `0` and `"0"`.
fn usable_id(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| canonical_id(value).is_some())
}

/// The record to upsert, with the event key filled in as `id` when the
/// record itself has none. `None` when no shape holds a record or no id can
/// be found.
pub fn extract_record(source: &impl PayloadSource, shapes: &[PayloadShape]) -> Option<RawRecord> {
    let mut record = first_object(source, shapes)?.clone();
    if usable_id(record.get("id")).is_none() {
        let key = usable_id(source.key())?;
        record.insert("id".to_string(), key.clone());
    }
    Some(record)
}

/// The identifier of the affected record: the record's own `id` if it has a
/// usable one, otherwise the event key.
pub fn extract_id(source: &impl PayloadSource, shapes: &[PayloadShape]) -> Option<Value> {
    first_object(source, shapes)
        .and_then(|record| usable_id(record.get("id")))
        .or_else(|| usable_id(source.key()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::TaskEvent;
    use serde_json::json;

    #[test]
    fn test_first_matching_shape_wins() {
        let event = TaskEvent {
            new_data: Some(json!({"id": 1, "title": "from newData"})),
            task_data: Some(json!({"id": 1, "title": "from taskData"})),
            ..Default::default()
        };
        let record = extract_record(&event, TASK_INSERT_SHAPES).unwrap();
        assert_eq!(record["title"], "from newData");
    }

    #[test]
    fn test_non_object_shapes_are_skipped() {
        let event = TaskEvent {
            values: Some(json!("not a record")),
            task_data: Some(json!({"id": 2})),
            ..Default::default()
        };
        let record = extract_record(&event, TASK_INSERT_SHAPES).unwrap();
        assert_eq!(record["id"], 2);
    }

    #[test]
    fn test_zero_key_is_an_id() {
        let event = TaskEvent {
            key: Some(json!(0)),
            new_values: Some(json!({"progress": 10})),
            ..Default::default()
        };
        let record = extract_record(&event, TASK_UPDATE_SHAPES).unwrap();
        assert_eq!(record["id"], 0);
        assert_eq!(extract_id(&event, TASK_UPDATE_SHAPES), Some(json!(0)));
    }

    #[test]
    fn test_missing_id_and_key_is_a_miss() {
        let event = TaskEvent {
            values: Some(json!({"title": "orphan"})),
            ..Default::default()
        };
        assert!(extract_record(&event, TASK_INSERT_SHAPES).is_none());
        assert!(extract_id(&event, TASK_INSERT_SHAPES).is_none());
    }
}
