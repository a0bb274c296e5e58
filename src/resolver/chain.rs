//! Field values and forwarded-for chain normalization.

use serde_json::Value;

use crate::resolver::outcome::FailureKind;

/// A field value as read from a record, converted once at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldValue {
    /// The field is not present (or null).
    #[default]
    Absent,
    /// A single string.
    Single(String),
    /// An ordered list of strings.
    Sequence(Vec<String>),
    /// Present but neither a string nor a list (number, bool, object),
    /// kept as its JSON rendering.
    Other(String),
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Convert an optional JSON value.
    ///
    /// List elements that are not strings keep their JSON rendering so they
    /// surface as invalid addresses rather than disappearing.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldValue::Absent,
            Some(Value::String(s)) => FieldValue::Single(s.clone()),
            Some(Value::Array(items)) => FieldValue::Sequence(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            Some(other) => FieldValue::Other(other.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::Sequence(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::Sequence(value.into_iter().map(String::from).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Split a delimited forwarded-for header into raw tokens.
///
/// Splits on `,` and strips surrounding spaces and `+` from each token.
/// Empty tokens are kept; they are invalid addresses, not separators.
pub fn split_delimited(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(|token| token.trim_matches(|c| c == ' ' || c == '+'))
        .collect()
}

/// Normalize a present chain value into ordered raw tokens.
///
/// In delimited mode only a single string is accepted. Otherwise a sequence
/// is used as-is and any single value becomes a one-element sequence.
pub fn normalize(input: &FieldValue, delimited: bool) -> Result<Vec<&str>, FailureKind> {
    match (input, delimited) {
        (FieldValue::Absent, _) => Ok(Vec::new()),
        (FieldValue::Single(raw), true) => Ok(split_delimited(raw)),
        (_, true) => Err(FailureKind::ChainNotString),
        (FieldValue::Single(raw), false) | (FieldValue::Other(raw), false) => {
            Ok(vec![raw.as_str()])
        }
        (FieldValue::Sequence(items), false) => Ok(items.iter().map(String::as_str).collect()),
    }
}

/// True when the chain carries no information: no tokens, or one blank token.
pub fn is_blank(tokens: &[&str]) -> bool {
    match tokens {
        [] => true,
        [only] => only.trim().is_empty(),
        _ => false,
    }
}
