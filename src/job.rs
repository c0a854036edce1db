//! Job posting documents as exchanged with the storage API
//!
//! A [`Job`] embeds its related records (employer, location, salary) and the
//! name collections (skills, technologies, ...) already resolved, which is the
//! nested document shape the export pipeline flattens.

use crate::error::Result;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One job posting with its related entities embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub employer: Option<Company>,
    #[serde(default)]
    pub location: Option<Location>,
    pub remote: Vec<String>,
    pub equity: bool,
    #[serde(default)]
    pub salary: Option<Salary>,
    pub visa: bool,
    pub relocation: bool,
    #[serde(default)]
    pub experience: Option<Vec<String>>,
    #[serde(default)]
    pub job_types: Option<Vec<String>>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default)]
    pub technologies: Option<Vec<String>>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub joel_test: Option<Vec<String>>,
    #[serde(default)]
    pub benefits: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    pub created: NaiveDateTime,
    pub updated: NaiveDateTime,
}

/// The employer of a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub url: Option<String>,
    pub name: String,
    #[serde(default)]
    pub industries: Option<Vec<String>>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub company_type: Option<String>,
    #[serde(default)]
    pub benefits: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    pub minimum: i64,
    pub maximum: i64,
}

impl Job {
    /// Serialize the job into the nested JSON document fed to the flattener
    ///
    /// Absent optional records and collections come out as `null`. The
    /// `created` and `updated` timestamps are written in export form,
    /// `YYYY-MM-DD HH:MM:SS` with microseconds only when non-zero.
    pub fn to_document(&self) -> Result<Value> {
        let mut document = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut document {
            fields.insert("created".to_string(), Value::String(export_timestamp(&self.created)));
            fields.insert("updated".to_string(), Value::String(export_timestamp(&self.updated)));
        }
        Ok(document)
    }
}

/// Format a timestamp the way the CSV export renders it
fn export_timestamp(timestamp: &NaiveDateTime) -> String {
    if timestamp.nanosecond() == 0 {
        timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        timestamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}
