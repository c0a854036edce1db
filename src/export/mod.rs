//! CSV export of job documents
//!
//! Each document is flattened, unwound into scalar rows and projected onto a
//! fixed list of columns. Columns missing from a row render as empty cells;
//! row fields outside the column list are dropped.

pub mod fields;
pub mod writer;

pub use fields::{render_cell, ExportConfig, JOB_CSV_FIELDS};
pub use writer::{export_documents, export_jobs, CsvExporter, JsonLinesWriter};
