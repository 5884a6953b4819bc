use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::data::model::{Columns, Table};
use crate::error::ConfigError;
use crate::query::labels::LabelMap;
use crate::query::rules::{RuleExtractor, DEFAULT_CATEGORIES, DEFAULT_COURSES};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "ALLOTMENT_CONFIG";
/// Environment variable naming the table file; beats `table_path`.
pub const TABLE_ENV: &str = "ALLOTMENT_TABLE";
/// Config file picked up from the working directory when `ALLOTMENT_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "allotment.json";

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Settings shared by the desktop app and the `ask` binary. Every key is optional.
///
/// ```json
/// {
///   "table_path": "MCI_1st_LIST_ALLOTMENT_ALLINDIA.csv",
///   "columns": { "rank": "AIR" },
///   "labels": { "ORG": "institute", "COURSE": "course", "CATEGORY": "category", "CARDINAL": "rank" },
///   "categories": ["General", "SC", "ST", "OBC", "EWS"],
///   "courses": ["MBBS", "BDS"],
///   "preview_rows": 5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub table_path: Option<PathBuf>,
    pub columns: Columns,
    /// Entity label → request field. Replaces the default map entirely.
    pub labels: LabelMap,
    /// Category gazetteer seeds.
    pub categories: Vec<String>,
    /// Course gazetteer seeds.
    pub courses: Vec<String>,
    /// Rows shown in the data preview.
    pub preview_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            table_path: None,
            columns: Columns::default(),
            labels: LabelMap::default(),
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            courses: DEFAULT_COURSES.iter().map(|s| s.to_string()).collect(),
            preview_rows: 5,
        }
    }
}

impl AppConfig {
    /// Load from `$ALLOTMENT_CONFIG`, else `./allotment.json` if present, else defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(Path::new(&path)),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_path(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Where to read the table from: `arg`, then `$ALLOTMENT_TABLE`, then `table_path`.
    pub fn table_path(&self, arg: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        self.table_path_with_env(arg, std::env::var_os(TABLE_ENV).map(PathBuf::from))
    }

    fn table_path_with_env(
        &self,
        arg: Option<PathBuf>,
        env: Option<PathBuf>,
    ) -> Result<PathBuf, ConfigError> {
        arg.or(env)
            .or_else(|| self.table_path.clone())
            .ok_or(ConfigError::NoTable)
    }

    /// Rule extractor seeded from the config and, when given, the table's values.
    pub fn extractor(&self, table: Option<&Table>) -> RuleExtractor {
        let ex = RuleExtractor::new(&self.categories, &self.courses);
        match table {
            Some(table) => ex.with_table(table),
            None => ex,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::query::labels::Field;

    #[test]
    fn partial_config_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"columns": {{"rank": "AIR"}}, "labels": {{"ORG": "institute"}}, "preview_rows": 10}}"#
        )
        .unwrap();

        let config = AppConfig::from_path(file.path()).unwrap();
        assert_eq!(config.columns.rank, "AIR");
        assert_eq!(config.columns.institute, "Allotted Institute");
        assert_eq!(config.labels.field_for("ORG"), Some(Field::Institute));
        assert_eq!(config.labels.field_for("GPE"), None);
        assert_eq!(config.preview_rows, 10);
        assert_eq!(config.courses, AppConfig::default().courses);
    }

    #[test]
    fn malformed_config_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = AppConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == file.path()));
    }

    #[test]
    fn table_path_precedence() {
        let config = AppConfig {
            table_path: Some("from_config.csv".into()),
            ..Default::default()
        };
        let pick = |arg: Option<&str>, env: Option<&str>| {
            config
                .table_path_with_env(arg.map(PathBuf::from), env.map(PathBuf::from))
                .unwrap()
        };
        assert_eq!(pick(Some("arg.csv"), Some("env.csv")), PathBuf::from("arg.csv"));
        assert_eq!(pick(None, Some("env.csv")), PathBuf::from("env.csv"));
        assert_eq!(pick(None, None), PathBuf::from("from_config.csv"));

        let empty = AppConfig::default();
        assert!(matches!(
            empty.table_path_with_env(None, None),
            Err(ConfigError::NoTable)
        ));
    }
}
