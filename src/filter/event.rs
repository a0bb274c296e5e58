//! Event records.
//!
//! # Responsibilities
//! - Read a field as a `FieldValue` (absent, string, list)
//! - Write fields, creating intermediate objects for nested references
//! - Maintain the de-duplicated `tags` list
//!
//! The `EventRecord` trait is the seam to the host's data model; `Event` is
//! the JSON implementation used by the stream pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::filter::field_ref::FieldRef;
use crate::resolver::FieldValue;

/// Name of the field holding event tags.
pub const TAGS_FIELD: &str = "tags";

/// Accessors and mutators a host record must provide.
pub trait EventRecord {
    /// Read a field.
    fn get_field(&self, field: &FieldRef) -> FieldValue;

    /// Write a field, replacing any previous value.
    fn set_field(&mut self, field: &FieldRef, value: Value);

    /// Add a tag unless already present.
    fn add_tag(&mut self, tag: &str);

    /// Remove a tag if present.
    fn remove_tag(&mut self, tag: &str);
}

/// A JSON object event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event {
    fields: Map<String, Value>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object. Anything else (arrays, scalars) is rejected.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Event for a line that could not be decoded, carrying the raw text.
    pub fn unparsed(line: &str, tag: &str) -> Self {
        let mut event = Self::new();
        event
            .fields
            .insert("message".to_string(), Value::String(line.to_string()));
        event.add_tag(tag);
        event
    }

    pub fn get(&self, field: &FieldRef) -> Option<&Value> {
        let (first, rest) = field.segments().split_first()?;
        rest.iter()
            .try_fold(self.fields.get(first)?, |value, segment| value.get(segment))
    }

    pub fn tags(&self) -> Vec<&str> {
        match self.fields.get(TAGS_FIELD) {
            Some(Value::Array(tags)) => tags.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(tag)) => vec![tag.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().contains(&tag)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// The tags array, normalizing a scalar tag into a list.
    fn tags_mut(&mut self) -> &mut Vec<Value> {
        let slot = self
            .fields
            .entry(TAGS_FIELD)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            let previous = slot.take();
            *slot = match previous {
                Value::Null => Value::Array(Vec::new()),
                other => Value::Array(vec![other]),
            };
        }
        match slot {
            Value::Array(tags) => tags,
            _ => unreachable!("tags slot normalized to an array above"),
        }
    }
}

impl From<Map<String, Value>> for Event {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl EventRecord for Event {
    fn get_field(&self, field: &FieldRef) -> FieldValue {
        FieldValue::from_json(self.get(field))
    }

    fn set_field(&mut self, field: &FieldRef, value: Value) {
        let Some((last, parents)) = field.segments().split_last() else {
            return;
        };

        let mut current = &mut self.fields;
        for segment in parents {
            let slot = current
                .entry(segment.as_str())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            current = match slot {
                Value::Object(map) => map,
                _ => unreachable!("slot replaced by an object above"),
            };
        }
        current.insert(last.clone(), value);
    }

    fn add_tag(&mut self, tag: &str) {
        let tags = self.tags_mut();
        if !tags.iter().any(|t| t.as_str() == Some(tag)) {
            tags.push(Value::String(tag.to_string()));
        }
    }

    fn remove_tag(&mut self, tag: &str) {
        if self.fields.contains_key(TAGS_FIELD) {
            self.tags_mut().retain(|t| t.as_str() != Some(tag));
        }
    }
}
