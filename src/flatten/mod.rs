//! Flattening and unwinding of nested JSON documents
//!
//! This module turns a nested document into flat, fully scalar rows in two
//! steps:
//!
//! 1. [`Flattener`] collapses nested objects into a single-level
//!    [`FlatRecord`], keeping array values as arrays.
//! 2. [`unwind`] expands the array values into one [`Row`] per combination
//!    of elements.

pub mod types;
pub mod flattener;
pub mod unwind;

pub use types::{FlatRecord, FlattenConfig, Row};
pub use flattener::{flatten, Flattener};
pub use unwind::{row_count, unwind, Unwind};
