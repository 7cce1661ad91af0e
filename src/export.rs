//! Renders delivered records as a CSV table, and names the resulting
//! export.

use crate::conf::DESTINATION_PREFIX;
use crate::error::HandlerError;
use crate::records::Record;
use chrono::{DateTime, TimeZone};
use csv::{Terminator, WriterBuilder};
use itertools::Itertools;
use serde_json::Value;
use std::fmt::Display;
use tracing::instrument;

/// The union of keys across records, in the order each key is first
/// seen.
pub fn columns(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .flat_map(Record::keys)
        .map(String::as_str)
        .unique()
        .collect()
}

/// Text of a single cell. Absent and null values are empty.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Serialize records as CSV with a header row.
#[instrument(skip(records), fields(records = records.len()))]
pub fn to_csv(records: &[Record]) -> Result<Vec<u8>, HandlerError> {
    let columns = columns(records);
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer
        .write_record(&columns)
        .map_err(|e| HandlerError::Encode(e.to_string()))?;
    for record in records {
        writer
            .write_record(columns.iter().map(|column| cell(record.get(column))))
            .map_err(|e| HandlerError::Encode(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| HandlerError::Encode(e.to_string()))
}

/// Name of an export created at the given instant.
pub fn file_name<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("delivered_items_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

/// Key of an export within the target bucket.
pub fn destination_key(file_name: &str) -> String {
    format!("{}{}", DESTINATION_PREFIX, file_name)
}
