use crate::flatten::FlattenConfig;
use serde_json::Value;

/// Columns of the job CSV export, in output order
pub const JOB_CSV_FIELDS: &[&str] = &[
    "id",
    "title",
    "technologies",
    "employer_name",
    "employer_size",
    "employer_industries",
    "employer_company_type",
    "experience",
    "roles",
    "job_types",
    "joel_test",
    "skills",
    "created",
    "location_longitude",
    "location_latitude",
    "location_country_code",
    "salary_minimum",
    "salary_maximum",
    "visa",
    "equity",
    "relocation",
    "benefits",
    "remote",
];

/// Configuration for the CSV export
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Columns to project each row onto; anything else is dropped
    pub fields: Vec<String>,

    /// How documents are flattened before unwinding
    pub flatten: FlattenConfig,
}

impl ExportConfig {
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            fields: JOB_CSV_FIELDS.iter().map(|f| f.to_string()).collect(),
            flatten: FlattenConfig::default(),
        }
    }
}

/// Render a scalar row value as a CSV cell
///
/// Missing values and `null` become empty cells. Strings are written as-is,
/// booleans as `True`/`False` and numbers in their JSON text form.
pub fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => String::from("True"),
        Some(Value::Bool(false)) => String::from("False"),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_fields() {
        let config = ExportConfig::default();
        assert_eq!(config.fields.len(), JOB_CSV_FIELDS.len());
        assert_eq!(config.fields[0], "id");
        assert_eq!(config.fields.last().map(String::as_str), Some("remote"));
    }

    #[test]
    fn test_render_cell() {
        assert_eq!(render_cell(None), "");
        assert_eq!(render_cell(Some(&Value::Null)), "");
        assert_eq!(render_cell(Some(&json!("Acme, Inc."))), "Acme, Inc.");
        assert_eq!(render_cell(Some(&json!(52.5))), "52.5");
        assert_eq!(render_cell(Some(&json!(60000))), "60000");
        assert_eq!(render_cell(Some(&json!(true))), "True");
        assert_eq!(render_cell(Some(&json!(false))), "False");
    }
}
