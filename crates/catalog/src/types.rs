use std::collections::BTreeMap;

use keyword_tree::RecordIndex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MalformedDataError;

/// Display data for one sponsored destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Term substituted into the title template.
    pub term: String,
    /// Destination visited when the suggestion is selected.
    pub url: String,
}

/// Record index to [`Record`] lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordTable(BTreeMap<RecordIndex, Record>);

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: RecordIndex, record: Record) -> Option<Record> {
        self.0.insert(index, record)
    }

    pub fn get(&self, index: RecordIndex) -> Option<&Record> {
        self.0.get(&index)
    }

    pub fn contains(&self, index: RecordIndex) -> bool {
        self.0.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordIndex, &Record)> {
        self.0.iter().map(|(index, record)| (*index, record))
    }

    /// Reads the `records` field of a suggestion payload.
    ///
    /// Accepts an object keyed by decimal indices (`{"0": {...}}`) or an array
    /// whose positions are the indices; `null` array entries are skipped so
    /// sparse tables can be written either way.
    pub fn from_json(value: Value) -> Result<Self, MalformedDataError> {
        let mut table = Self::new();
        match value {
            Value::Object(map) => {
                for (key, entry) in map {
                    let index = parse_index_key(&key)?;
                    let record: Record = serde_json::from_value(entry).map_err(|e| {
                        MalformedDataError::Json(format!("record {index}: {e}"))
                    })?;
                    if table.insert(index, record).is_some() {
                        return Err(MalformedDataError::Json(format!(
                            "duplicate record index {index}"
                        )));
                    }
                }
            }
            Value::Array(items) => {
                for (position, entry) in items.into_iter().enumerate() {
                    if entry.is_null() {
                        continue;
                    }
                    let index = RecordIndex::try_from(position).map_err(|_| {
                        MalformedDataError::Json("record list exceeds index range".into())
                    })?;
                    let record: Record = serde_json::from_value(entry).map_err(|e| {
                        MalformedDataError::Json(format!("record {index}: {e}"))
                    })?;
                    table.insert(index, record);
                }
            }
            other => {
                return Err(MalformedDataError::Json(format!(
                    "records must be an object or array, found {}",
                    json_kind(&other)
                )))
            }
        }
        Ok(table)
    }
}

impl FromIterator<(RecordIndex, Record)> for RecordTable {
    fn from_iter<I: IntoIterator<Item = (RecordIndex, Record)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A displayable suggestion, produced per query and not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResult {
    pub title: String,
    pub url: String,
    /// Resolved location of the provider icon.
    pub icon: String,
}

/// Wire shape of `data/suggestions.json`.
#[derive(Debug, Deserialize)]
pub(crate) struct SuggestionPayload {
    pub title: String,
    pub records: Value,
    pub tree: Value,
}

// Only the canonical decimal spelling is an index, so "01" and "+1" cannot
// alias "1".
fn parse_index_key(key: &str) -> Result<RecordIndex, MalformedDataError> {
    key.parse::<RecordIndex>()
        .ok()
        .filter(|index| index.to_string() == key)
        .ok_or_else(|| MalformedDataError::Json(format!("record key {key:?} is not an index")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
