use serde_json::{Map, Value};

use crate::error::CsvError;

/// A single row of the in-memory working set.
///
/// Decoding a stream without a header row produces `Fields` rows: plain
/// positional field lists. Decoding with a header, or loading arbitrary
/// data, produces `Object` rows: insertion-ordered maps whose values may be
/// nested objects or arrays that the encoder flattens into dotted columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Positional fields with no column names.
    Fields(Vec<String>),
    /// Named fields; values may nest arbitrarily.
    Object(Map<String, Value>),
}

impl Record {
    /// Builds a record from a JSON value. Objects become named records and
    /// arrays become positional rows; anything else cannot describe a row.
    pub fn from_value(value: Value) -> Result<Record, CsvError> {
        match value {
            Value::Object(fields) => Ok(Record::Object(fields)),
            Value::Array(items) => Ok(Record::Fields(items.iter().map(scalar_text).collect())),
            other => Err(CsvError::InvalidSource(format!(
                "record must be an object or an array, got {other}"
            ))),
        }
    }

    /// Flat single-level view used by the encoder. Named fields go through
    /// [`flatten`]; positional fields are keyed by their index.
    pub(crate) fn flattened(&self) -> Map<String, Value> {
        match self {
            Record::Object(fields) => flatten(fields, ""),
            Record::Fields(fields) => fields
                .iter()
                .enumerate()
                .map(|(index, field)| (index.to_string(), Value::String(field.clone())))
                .collect(),
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Record {
        Record::Object(fields)
    }
}

impl From<Vec<String>> for Record {
    fn from(fields: Vec<String>) -> Record {
        Record::Fields(fields)
    }
}

/// Flattens a nested map into a single-level map keyed by dot-joined paths.
///
/// Nested objects recurse with `prefix + key + "."`; arrays contribute their
/// indices as path segments. On a key collision the later value wins while
/// the first occurrence keeps its position. Keys that already contain a
/// literal `.` are not escaped, so they cannot be told apart from a nesting
/// boundary.
///
/// # Examples
///
/// ```
/// use record_csv::record::flatten;
/// use serde_json::json;
///
/// let nested = json!({"a": {"b": 1, "c": 2}, "d": 3});
/// let flat = flatten(nested.as_object().unwrap(), "");
///
/// assert_eq!(flat.get("a.b"), Some(&json!(1)));
/// assert_eq!(flat.get("a.c"), Some(&json!(2)));
/// assert_eq!(flat.get("d"), Some(&json!(3)));
/// ```
pub fn flatten(record: &Map<String, Value>, prefix: &str) -> Map<String, Value> {
    let mut flat = Map::new();
    for (key, value) in record {
        flatten_into(&mut flat, format!("{prefix}{key}"), value);
    }
    flat
}

fn flatten_into(flat: &mut Map<String, Value>, path: String, value: &Value) {
    match value {
        Value::Object(nested) => {
            for (key, value) in nested {
                flatten_into(flat, format!("{path}.{key}"), value);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                flatten_into(flat, format!("{path}.{index}"), value);
            }
        }
        scalar => {
            flat.insert(path, scalar.clone());
        }
    }
}

/// Renders a flattened value as a CSV cell.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
