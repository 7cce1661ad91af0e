//! Parsing of newline-delimited JSON files into records, and the
//! status filter applied to them.

use crate::error::HandlerError;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// The status value selected for export.
pub const DELIVERED: &str = "delivered";

/// A single line of the input file. Keys keep the order in which
/// they appear in the line.
#[derive(Debug, Clone, PartialEq)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// The record's `status`, if it's present and a string.
    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    pub fn is_delivered(&self) -> bool {
        self.status() == Some(DELIVERED)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}

/// Parse every non-blank line as a JSON object. A single bad line
/// fails the whole file.
#[instrument(skip(text), fields(bytes = text.len()))]
pub fn parse_lines(text: &str) -> Result<Vec<Record>, HandlerError> {
    let mut records = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|e| HandlerError::Parse {
            line: index + 1,
            reason: e.to_string(),
        })?;
        match value {
            Value::Object(map) => records.push(Record(map)),
            other => {
                return Err(HandlerError::Parse {
                    line: index + 1,
                    reason: format!("expected a JSON object, found {}", other),
                })
            }
        }
    }
    debug!("Parsed {} records", records.len());
    Ok(records)
}

/// Keep only delivered records, in their original order.
pub fn delivered(records: Vec<Record>) -> Vec<Record> {
    records.into_iter().filter(Record::is_delivered).collect()
}
