use crate::error::{json_type_name, Error, Result};
use crate::flatten::types::{FlatRecord, FlattenConfig};
use serde_json::{Map, Value};
use tracing::trace;

/// Collapses nested JSON documents into single-level records
///
/// Keys of nested objects are joined to their ancestors with the configured
/// separator. Arrays of scalars stay arrays; arrays of objects are flattened
/// element by element and merged under the same prefix, without positional
/// indices, so that `{"a": [{"x": 1}, {"x": 2}]}` becomes `{"a_x": [1, 2]}`.
///
/// A key fed from an array is always an array in the output, even when it
/// ends up holding a single element or none at all.
#[derive(Debug, Clone, Default)]
pub struct Flattener {
    config: FlattenConfig,
}

impl Flattener {
    pub fn new(config: FlattenConfig) -> Self {
        Flattener { config }
    }

    /// Flatten a JSON document, which must be an object
    pub fn flatten(&self, document: Value) -> Result<FlatRecord> {
        match document {
            Value::Object(obj) => Ok(self.flatten_object(obj)),
            other => Err(Error::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    /// Flatten an already unwrapped JSON object
    pub fn flatten_object(&self, obj: Map<String, Value>) -> FlatRecord {
        let mut record = FlatRecord::new();
        self.flatten_into(None, obj, false, &mut record);
        record
    }

    /// Recursively push the fields of `obj` into `record`
    ///
    /// `in_sequence` is set when `obj` is an element of an array, in which
    /// case every scalar is collected into an array under its key.
    fn flatten_into(
        &self,
        prefix: Option<&str>,
        obj: Map<String, Value>,
        in_sequence: bool,
        record: &mut FlatRecord,
    ) {
        for (key, value) in obj.into_iter() {
            let flat_key = self.config.join(prefix, &key);

            match value {
                Value::Object(inner) => {
                    self.flatten_into(Some(&flat_key), inner, in_sequence, record);
                }
                Value::Array(items) => {
                    if items.is_empty() {
                        trace!(key = %flat_key, "empty array kept as empty sequence");
                        ensure_sequence(record, flat_key);
                    } else {
                        for item in items {
                            self.flatten_element(&flat_key, item, record);
                        }
                    }
                }
                scalar if in_sequence => append(record, flat_key, scalar),
                scalar => insert_or_coalesce(record, flat_key, scalar),
            }
        }
    }

    /// Flatten one element of an array found under `key`
    fn flatten_element(&self, key: &str, item: Value, record: &mut FlatRecord) {
        match item {
            Value::Object(inner) => self.flatten_into(Some(key), inner, true, record),
            Value::Array(nested) => {
                for element in nested {
                    self.flatten_element(key, element, record);
                }
            }
            scalar => append(record, key.to_string(), scalar),
        }
    }
}

/// Convenience wrapper around [`Flattener`] with the default `_` separator
pub fn flatten(document: Value) -> Result<FlatRecord> {
    Flattener::default().flatten(document)
}

/// Insert a scalar, coalescing with an earlier value under the same key
fn insert_or_coalesce(record: &mut FlatRecord, key: String, value: Value) {
    if record.contains_key(&key) {
        append(record, key, value);
    } else {
        record.insert(key, value);
    }
}

/// Append a scalar to the sequence under `key`, promoting a scalar first
fn append(record: &mut FlatRecord, key: String, value: Value) {
    match record.get_mut(&key) {
        Some(Value::Array(values)) => values.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            record.insert(key, Value::Array(vec![value]));
        }
    }
}

/// Make sure `key` holds a sequence without adding any element to it
fn ensure_sequence(record: &mut FlatRecord, key: String) {
    match record.get_mut(&key) {
        Some(Value::Array(_)) => {}
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first]);
        }
        None => {
            record.insert(key, Value::Array(Vec::new()));
        }
    }
}
