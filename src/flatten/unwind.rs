//! Expansion of array-valued fields into scalar rows
//!
//! Unwinding takes a [`FlatRecord`] and yields one [`Row`] per combination of
//! array elements. Arrays are expanded one field at a time, always picking the
//! first array-valued field in iteration order, so the first such field varies
//! slowest and the last one varies fastest.
//!
//! An empty array does not remove the record: the field becomes `null` and
//! the record passes through once.

use crate::flatten::types::{FlatRecord, Row};
use serde_json::Value;

/// Lazy iterator over the rows of an unwound record
///
/// Records waiting to be expanded sit on a stack; each step pops one, expands
/// its first array-valued field into one record per element and pushes them
/// back in reverse so the head element comes out first.
#[derive(Debug, Clone)]
pub struct Unwind {
    pending: Vec<FlatRecord>,
}

impl Unwind {
    pub fn new(record: FlatRecord) -> Self {
        Unwind {
            pending: vec![record],
        }
    }
}

impl Iterator for Unwind {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        loop {
            let mut record = self.pending.pop()?;

            let Some((key, elements)) = take_first_sequence(&mut record) else {
                return Some(record);
            };

            if elements.is_empty() {
                record.insert(key, Value::Null);
                self.pending.push(record);
                continue;
            }

            let mut expanded: Vec<FlatRecord> = elements
                .into_iter()
                .map(|element| {
                    let mut next = record.clone();
                    next.insert(key.clone(), element);
                    next
                })
                .collect();
            expanded.reverse();
            self.pending.append(&mut expanded);
        }
    }
}

/// Unwind a flat record into scalar rows
///
/// The returned iterator borrows nothing from the caller; call `unwind` again
/// on the same record to restart the sequence.
pub fn unwind(record: FlatRecord) -> Unwind {
    Unwind::new(record)
}

/// Number of rows [`unwind`] yields for `record`, without producing them
///
/// Nested arrays inside array fields are counted as their own expansion.
/// Returns `None` when the count does not fit in a `usize`.
pub fn row_count(record: &FlatRecord) -> Option<usize> {
    record
        .values()
        .try_fold(1usize, |acc, value| acc.checked_mul(choices(value)?))
}

fn choices(value: &Value) -> Option<usize> {
    match value {
        Value::Array(elements) if elements.is_empty() => Some(1),
        Value::Array(elements) => elements
            .iter()
            .try_fold(0usize, |acc, element| acc.checked_add(choices(element)?)),
        _ => Some(1),
    }
}

/// Detach the elements of the first array-valued field, leaving it empty
fn take_first_sequence(record: &mut FlatRecord) -> Option<(String, Vec<Value>)> {
    record.iter_mut().find_map(|(key, value)| match value {
        Value::Array(elements) => Some((key.clone(), std::mem::take(elements))),
        _ => None,
    })
}
