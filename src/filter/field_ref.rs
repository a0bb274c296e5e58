//! Field references.
//!
//! A reference is either a plain top-level name (`remote_addr`) or a bracketed
//! path into nested objects (`[request][headers][x_forwarded_for]`).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldRefError {
    #[error("field reference is empty")]
    Empty,

    #[error("malformed field reference '{0}'")]
    Malformed(String),
}

/// A parsed path to a field inside an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    path: Vec<String>,
}

impl FieldRef {
    pub fn parse(raw: &str) -> Result<Self, FieldRefError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(FieldRefError::Empty);
        }

        if !raw.starts_with('[') {
            if raw.contains('[') || raw.contains(']') {
                return Err(FieldRefError::Malformed(raw.to_string()));
            }
            return Ok(Self {
                path: vec![raw.to_string()],
            });
        }

        let mut path = Vec::new();
        let mut rest = raw;
        while !rest.is_empty() {
            let inner = rest
                .strip_prefix('[')
                .ok_or_else(|| FieldRefError::Malformed(raw.to_string()))?;
            let end = inner
                .find(']')
                .ok_or_else(|| FieldRefError::Malformed(raw.to_string()))?;
            let segment = &inner[..end];
            if segment.is_empty() || segment.contains('[') {
                return Err(FieldRefError::Malformed(raw.to_string()));
            }
            path.push(segment.to_string());
            rest = &inner[end + 1..];
        }

        Ok(Self { path })
    }

    /// Path segments from the event root.
    pub fn segments(&self) -> &[String] {
        &self.path
    }
}

impl FromStr for FieldRef {
    type Err = FieldRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [only] = self.path.as_slice() {
            return write!(f, "{}", only);
        }
        for segment in &self.path {
            write!(f, "[{}]", segment)?;
        }
        Ok(())
    }
}
