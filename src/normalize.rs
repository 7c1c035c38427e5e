//! Raw widget records in, canonical records out.
//!
//! Records arrive as loosely-typed JSON: identifiers may be numbers or text,
//! dates may be ISO text or epoch milliseconds, and partial updates omit
//! whatever did not change. Everything here is pure; no function touches a
//! store.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::models::*;

pub type RawRecord = Map<String, Value>;

/// Why a raw record could not be turned into a canonical one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("{kind} record must be a JSON object")]
    NotAnObject { kind: EntityKind },

    #[error("{kind} record is missing required field `{field}`")]
    MissingField {
        kind: EntityKind,
        field: &'static str,
    },

    #[error("{kind} field `{field}` is invalid: {reason}")]
    InvalidField {
        kind: EntityKind,
        field: &'static str,
        reason: String,
    },

    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: EntityKind, id: EntityId },

    #[error("invalid schedule data: {0}")]
    InvalidDataset(String),
}

/// Parse a raw JSON record into a normalized (possibly partial) value.
pub trait Normalize: Sized {
    fn from_raw(raw: &Value) -> Result<Self, NormalizeError>;
}

/// Parse and complete a raw record in one step.
pub fn normalize_entity<E: Entity>(raw: &Value) -> Result<E, NormalizeError> {
    E::Patch::from_raw(raw)?.into_entity()
}

/// Normalize a whole dataset: `tasks`, `dependencies` (or `links`),
/// `resources` and `resourceAssignments`. Missing collections are empty.
pub fn normalize_schedule(raw: &Value) -> Result<Schedule, NormalizeError> {
    let data = raw.as_object().ok_or_else(|| {
        NormalizeError::InvalidDataset("expected an object of entity collections".to_string())
    })?;

    Ok(Schedule {
        tasks: collection(data, &["tasks"])?,
        dependencies: collection(data, &["dependencies", "links"])?,
        resources: collection(data, &["resources"])?,
        resource_assignments: collection(
            data,
            &["resourceAssignments", "resource_assignments"],
        )?,
    })
}

fn collection<E: Entity>(data: &RawRecord, names: &[&str]) -> Result<Vec<E>, NormalizeError> {
    let Some((name, value)) = names
        .iter()
        .find_map(|name| data.get(*name).filter(|v| !v.is_null()).map(|v| (*name, v)))
    else {
        return Ok(Vec::new());
    };

    let items = value.as_array().ok_or_else(|| {
        NormalizeError::InvalidDataset(format!("`{}` must be an array", name))
    })?;

    let mut seen = HashSet::with_capacity(items.len());
    let mut entities = Vec::with_capacity(items.len());
    for item in items {
        let entity: E = normalize_entity(item)?;
        if !seen.insert(entity.id().clone()) {
            return Err(NormalizeError::DuplicateId {
                kind: E::KIND,
                id: entity.id().clone(),
            });
        }
        entities.push(entity);
    }
    Ok(entities)
}

/// The canonical form of an identifier value, or `None` if the value cannot
/// be one (`null`, booleans, arrays, objects).
///
/// Integral numbers become their decimal text, so `0`, `0.0` and `"0"` all
/// map to the same id.
pub fn canonical_id(value: &Value) -> Option<EntityId> {
    match value {
        Value::String(text) => Some(EntityId::new(text.as_str())),
        Value::Number(number) => number_text(number).map(EntityId::new),
        _ => None,
    }
}

fn number_text(number: &Number) -> Option<String> {
    if let Some(n) = number.as_i64() {
        return Some(n.to_string());
    }
    if let Some(n) = number.as_u64() {
        return Some(n.to_string());
    }
    let n = number.as_f64().filter(|n| n.is_finite())?;
    // 2^53: beyond this an f64 no longer holds every integer exactly.
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Some((n as i64).to_string())
    } else {
        Some(n.to_string())
    }
}

/// Parse a date-bearing value into an instant.
///
/// Accepts RFC 3339 text, naive date-times and plain dates (both read as
/// UTC), and numbers as milliseconds since the Unix epoch.
pub fn parse_instant(value: &Value) -> Result<DateTime<Utc>, String> {
    match value {
        Value::String(text) => parse_instant_text(text),
        Value::Number(number) => {
            let millis = number
                .as_i64()
                .or_else(|| number.as_f64().filter(|n| n.is_finite()).map(|n| n.round() as i64))
                .ok_or_else(|| format!("timestamp {} is out of range", number))?;
            DateTime::<Utc>::from_timestamp_millis(millis)
                .ok_or_else(|| format!("timestamp {} is out of range", number))
        }
        other => Err(format!("expected a date, found {}", type_name(other))),
    }
}

fn parse_instant_text(text: &str) -> Result<DateTime<Utc>, String> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("unrecognized date `{}`", text))
}

fn parse_id(value: &Value) -> Result<EntityId, String> {
    canonical_id(value)
        .ok_or_else(|| format!("expected a string or number identifier, found {}", type_name(value)))
}

fn parse_parent(value: &Value) -> Result<ParentRef, String> {
    if value.is_number() && value.as_f64() == Some(ROOT_PARENT_ID as f64) {
        return Ok(ParentRef::Root);
    }
    parse_id(value).map(ParentRef::Task)
}

fn parse_text(value: &Value) -> Result<String, String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("expected text, found {}", type_name(value)))
}

fn parse_progress(value: &Value) -> Result<u8, String> {
    let percent = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| format!("expected a percentage, found {}", type_name(value)))?
    .round();

    if !(0.0..=100.0).contains(&percent) {
        return Err(format!("{} is outside 0..=100", percent));
    }
    Ok(percent as u8)
}

fn parse_dependency_type(value: &Value) -> Result<DependencyType, String> {
    let parsed = match value {
        Value::Number(number) => number.as_u64().and_then(DependencyType::from_code),
        Value::String(text) => DependencyType::from_str(text),
        _ => None,
    };
    parsed.ok_or_else(|| format!("unknown dependency type {}", value))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Field access over one raw record, with the presence rules shared by every
/// entity kind. Presence is "key exists and is not `null`"; falsy values such
/// as `0` or `""` are present.
struct Fields<'a> {
    kind: EntityKind,
    raw: &'a RawRecord,
}

impl<'a> Fields<'a> {
    fn open(kind: EntityKind, raw: &'a Value) -> Result<Self, NormalizeError> {
        raw.as_object()
            .map(|raw| Self { kind, raw })
            .ok_or(NormalizeError::NotAnObject { kind })
    }

    fn missing(&self, field: &'static str) -> NormalizeError {
        NormalizeError::MissingField {
            kind: self.kind,
            field,
        }
    }

    fn id(&self) -> Result<EntityId, NormalizeError> {
        self.provided("id", parse_id)?
            .ok_or_else(|| self.missing("id"))
    }

    /// A field that must hold a value once it appears. `null` counts as
    /// missing; absence means "not provided" and is left to the caller.
    fn provided<T>(
        &self,
        field: &'static str,
        parse: impl FnOnce(&Value) -> Result<T, String>,
    ) -> Result<Option<T>, NormalizeError> {
        match self.raw.get(field) {
            None => Ok(None),
            Some(Value::Null) => Err(self.missing(field)),
            Some(value) => parse(value).map(Some).map_err(|reason| self.invalid(field, reason)),
        }
    }

    /// A field that may be cleared: `null` yields `Some(None)`.
    fn clearable<T>(
        &self,
        field: &'static str,
        parse: impl FnOnce(&Value) -> Result<T, String>,
    ) -> Result<Option<Option<T>>, NormalizeError> {
        match self.raw.get(field) {
            None => Ok(None),
            Some(Value::Null) => Ok(Some(None)),
            Some(value) => parse(value)
                .map(|v| Some(Some(v)))
                .map_err(|reason| self.invalid(field, reason)),
        }
    }

    fn invalid(&self, field: &'static str, reason: String) -> NormalizeError {
        NormalizeError::InvalidField {
            kind: self.kind,
            field,
            reason,
        }
    }
}

impl Normalize for TaskPatch {
    fn from_raw(raw: &Value) -> Result<Self, NormalizeError> {
        let fields = Fields::open(EntityKind::Tasks, raw)?;
        Ok(Self {
            id: fields.id()?,
            parent_id: fields.clearable("parentId", parse_parent)?,
            title: fields.provided("title", parse_text)?,
            start: fields.provided("start", parse_instant)?,
            end: fields.provided("end", parse_instant)?,
            progress: fields.clearable("progress", parse_progress)?,
        })
    }
}

impl Normalize for DependencyPatch {
    fn from_raw(raw: &Value) -> Result<Self, NormalizeError> {
        let fields = Fields::open(EntityKind::Dependencies, raw)?;
        Ok(Self {
            id: fields.id()?,
            predecessor_id: fields.provided("predecessorId", parse_id)?,
            successor_id: fields.provided("successorId", parse_id)?,
            dependency_type: fields.clearable("type", parse_dependency_type)?,
        })
    }
}

impl Normalize for ResourcePatch {
    fn from_raw(raw: &Value) -> Result<Self, NormalizeError> {
        let fields = Fields::open(EntityKind::Resources, raw)?;
        Ok(Self {
            id: fields.id()?,
            text: fields.provided("text", parse_text)?,
        })
    }
}

impl Normalize for ResourceAssignmentPatch {
    fn from_raw(raw: &Value) -> Result<Self, NormalizeError> {
        let fields = Fields::open(EntityKind::ResourceAssignments, raw)?;
        Ok(Self {
            id: fields.id()?,
            task_id: fields.provided("taskId", parse_id)?,
            resource_id: fields.provided("resourceId", parse_id)?,
        })
    }
}
