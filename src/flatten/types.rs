use serde_json::{Map, Value};

/// A single-level record: every value is a scalar or an array of scalars
pub type FlatRecord = Map<String, Value>;

/// A fully scalar record, one line of tabular output
pub type Row = Map<String, Value>;

/// Configuration for the flattening process
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    /// Separator placed between an ancestor key and its child key
    pub separator: String,
}

impl FlattenConfig {
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Join a parent key prefix and a child key
    pub(crate) fn join(&self, prefix: Option<&str>, key: &str) -> String {
        match prefix {
            Some(prefix) => format!("{}{}{}", prefix, self.separator, key),
            None => key.to_string(),
        }
    }
}

impl Default for FlattenConfig {
    fn default() -> Self {
        FlattenConfig {
            separator: String::from("_"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_keys() {
        let config = FlattenConfig::default();
        assert_eq!(config.join(None, "id"), "id");
        assert_eq!(config.join(Some("employer"), "name"), "employer_name");

        let dotted = FlattenConfig::default().with_separator(".");
        assert_eq!(dotted.join(Some("salary"), "minimum"), "salary.minimum");
    }
}
