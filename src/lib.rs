//! # jobflat - Job posting export toolkit
//!
//! Turns nested job posting documents into flat, tabular rows for CSV export.
//!
//! ## Modules
//!
//! - **flatten**: collapse nested documents into single-level records and
//!   unwind array fields into fully scalar rows
//! - **export**: project rows onto a fixed column list and write CSV
//! - **job**: typed job posting documents
//!
//! ## Quick Start
//!
//! ```rust
//! use jobflat::flatten::{flatten, unwind};
//! use serde_json::json;
//!
//! # fn main() -> jobflat::Result<()> {
//! let flat = flatten(json!({"a": 1, "b": {"c": 2, "d": [3, 4]}}))?;
//! // flat = {"a": 1, "b_c": 2, "b_d": [3, 4]}
//!
//! let rows: Vec<_> = unwind(flat).collect();
//! assert_eq!(rows.len(), 2);
//! // rows[0] = {"a": 1, "b_c": 2, "b_d": 3}
//! // rows[1] = {"a": 1, "b_c": 2, "b_d": 4}
//! # Ok(())
//! # }
//! ```
//!
//! ### CSV Export
//!
//! ```rust
//! use jobflat::export::{export_documents, ExportConfig};
//! use serde_json::json;
//!
//! # fn main() -> jobflat::Result<()> {
//! let config = ExportConfig::default().with_fields(["id", "skills"]);
//! let mut out = Vec::new();
//! let documents = vec![json!({"id": 1, "skills": ["sql", "rust"]})];
//! let rows = export_documents(&mut out, documents, config)?;
//!
//! assert_eq!(rows, 2);
//! assert_eq!(String::from_utf8(out).unwrap(), "id,skills\n1,sql\n1,rust\n");
//! # Ok(())
//! # }
//! ```

use serde_json::Value;
use std::io::{BufRead, Write};
use tracing::info;

pub mod error;
pub mod export;
pub mod flatten;
pub mod job;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use export::{CsvExporter, ExportConfig, JOB_CSV_FIELDS};
pub use flatten::{flatten, unwind, FlatRecord, FlattenConfig, Flattener, Row};
pub use job::Job;

/// Main entry point: export a stream of NDJSON documents as CSV
///
/// Blank lines are skipped. Returns the number of data rows written.
pub fn export_json_lines<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    config: ExportConfig,
) -> Result<usize> {
    let mut exporter = CsvExporter::new(writer, config);
    exporter.write_header()?;

    let mut documents = 0;
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)?;
        exporter.write_document(value)?;
        documents += 1;
    }

    exporter.flush()?;
    info!(documents, rows = exporter.rows_written(), "export finished");
    Ok(exporter.rows_written())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_json_lines() {
        let input = concat!(
            "{\"id\": 1, \"skills\": [\"sql\", \"rust\"], \"salary\": {\"minimum\": 10}}\n",
            "\n",
            "{\"id\": 2, \"skills\": []}\n",
        );
        let config = ExportConfig::default().with_fields(["id", "skills", "salary_minimum"]);

        let mut out = Vec::new();
        let rows = export_json_lines(input.as_bytes(), &mut out, config).unwrap();

        assert_eq!(rows, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,skills,salary_minimum\n1,sql,10\n1,rust,10\n2,,\n"
        );
    }

    #[test]
    fn test_export_json_lines_bad_json() {
        let mut out = Vec::new();
        let input = "{not json}\n".as_bytes();
        let result = export_json_lines(input, &mut out, ExportConfig::default());

        assert!(matches!(result, Err(Error::Json(_))));
    }
}
