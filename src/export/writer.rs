use crate::error::{Error, Result};
use crate::export::fields::{render_cell, ExportConfig};
use crate::flatten::{row_count, unwind, Flattener, Row};
use crate::job::Job;
use serde_json::{Map, Value};
use std::io::Write;
use tracing::debug;

/// Writes job documents as CSV, one line per unwound row
///
/// The header is written before the first row, or explicitly through
/// [`CsvExporter::write_header`] so that an empty export still has one.
pub struct CsvExporter<W: Write> {
    writer: csv::Writer<W>,
    config: ExportConfig,
    flattener: Flattener,
    header_written: bool,
    rows_written: usize,
}

impl<W: Write> CsvExporter<W> {
    pub fn new(inner: W, config: ExportConfig) -> Self {
        let flattener = Flattener::new(config.flatten.clone());
        CsvExporter {
            writer: csv::Writer::from_writer(inner),
            config,
            flattener,
            header_written: false,
            rows_written: 0,
        }
    }

    pub fn write_header(&mut self) -> Result<()> {
        if !self.header_written {
            self.writer.write_record(&self.config.fields)?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Project a row onto the configured fields and write it
    pub fn write_row(&mut self, row: &Row) -> Result<()> {
        self.write_header()?;
        let record = self
            .config
            .fields
            .iter()
            .map(|field| render_cell(row.get(field)));
        self.writer.write_record(record)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flatten and unwind a document, writing every resulting row
    ///
    /// Returns the number of rows written for this document.
    pub fn write_document(&mut self, document: Value) -> Result<usize> {
        let flat = self.flattener.flatten(document)?;
        debug!(
            keys = flat.len(),
            rows = ?row_count(&flat),
            "flattened document"
        );

        let mut written = 0;
        for row in unwind(flat) {
            self.write_row(&row)?;
            written += 1;
        }
        Ok(written)
    }

    pub fn write_job(&mut self, job: &Job) -> Result<usize> {
        debug!(job_id = job.id, "exporting job");
        self.write_document(job.to_document()?)
    }

    /// Number of data rows written so far, header excluded
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}

/// Write records as newline-delimited JSON, one object per line
pub struct JsonLinesWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesWriter { writer }
    }

    pub fn write_record(&mut self, record: &Map<String, Value>) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Export a collection of documents as CSV, header included
///
/// Returns the number of data rows written.
pub fn export_documents<W, I>(writer: W, documents: I, config: ExportConfig) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = Value>,
{
    let mut exporter = CsvExporter::new(writer, config);
    exporter.write_header()?;
    for document in documents {
        exporter.write_document(document)?;
    }
    exporter.flush()?;
    Ok(exporter.rows_written())
}

/// Export typed jobs as CSV, header included
pub fn export_jobs<W: Write>(writer: W, jobs: &[Job], config: ExportConfig) -> Result<usize> {
    let mut exporter = CsvExporter::new(writer, config);
    exporter.write_header()?;
    for job in jobs {
        exporter.write_job(job)?;
    }
    exporter.flush()?;
    Ok(exporter.rows_written())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn small_config() -> ExportConfig {
        ExportConfig::default().with_fields(["id", "technologies", "remote", "location_latitude"])
    }

    fn export_to_string(documents: Vec<Value>, config: ExportConfig) -> (usize, String) {
        let mut buffer = Vec::new();
        let rows = export_documents(&mut buffer, documents, config).unwrap();
        (rows, String::from_utf8(buffer).unwrap())
    }

    #[test]
    fn test_header_only_for_empty_export() {
        let (rows, output) = export_to_string(vec![], small_config());

        assert_eq!(rows, 0);
        assert_eq!(output, "id,technologies,remote,location_latitude\n");
    }

    #[test]
    fn test_unwinds_and_projects() {
        let doc = json!({
            "id": 1,
            "title": "not exported",
            "technologies": ["rust", "go"],
            "remote": ["Yes"],
            "location": null
        });

        let (rows, output) = export_to_string(vec![doc], small_config());

        assert_eq!(rows, 2);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "id,technologies,remote,location_latitude",
                "1,rust,Yes,",
                "1,go,Yes,",
            ]
        );
    }

    #[test]
    fn test_empty_collection_renders_empty_cell() {
        let doc = json!({"id": 3, "technologies": [], "remote": ["No"]});

        let (rows, output) = export_to_string(vec![doc], small_config());

        assert_eq!(rows, 1);
        assert_eq!(output.lines().nth(1), Some("3,,No,"));
    }

    #[test]
    fn test_quotes_cells_with_commas() {
        let doc = json!({"id": 4, "technologies": ["c, c++"], "remote": []});

        let (_, output) = export_to_string(vec![doc], small_config());

        assert_eq!(output.lines().nth(1), Some("4,\"c, c++\",,"));
    }

    #[test]
    fn test_rejects_non_object_document() {
        let mut buffer = Vec::new();
        let result = export_documents(&mut buffer, vec![json!("nope")], small_config());

        assert!(matches!(result, Err(Error::NotAnObject { found: "string" })));
    }

    #[test]
    fn test_export_typed_job() {
        let job: Job = serde_json::from_value(json!({
            "id": 9,
            "url": "https://jobs.example.com/9",
            "title": "SRE",
            "employer": {"name": "Initech", "industries": ["Finance"]},
            "remote": ["Yes", "Partial"],
            "equity": true,
            "visa": false,
            "relocation": false,
            "skills": ["oncall"],
            "created": "2021-01-05T08:00:00",
            "updated": "2021-01-06T08:00:00"
        }))
        .unwrap();

        let mut buffer = Vec::new();
        let rows = export_jobs(&mut buffer, &[job], ExportConfig::default()).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(rows, 2);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,title,technologies,employer_name"));
        assert!(lines[1].starts_with("9,SRE,,Initech,,Finance,"));
        assert!(lines[1].ends_with(",False,True,False,,Yes"));
        assert!(lines[2].ends_with(",Partial"));
        assert!(lines[1].contains(",oncall,2021-01-05 08:00:00,"));
    }

    #[test]
    fn test_json_lines_writer() {
        let mut buffer = Vec::new();
        let mut writer = JsonLinesWriter::new(&mut buffer);

        let record: Map<String, Value> = serde_json::from_value(json!({"a_x": [1, 2]})).unwrap();
        writer.write_record(&record).unwrap();
        writer.flush().unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), "{\"a_x\":[1,2]}\n");
    }
}
