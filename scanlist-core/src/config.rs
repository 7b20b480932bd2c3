//! Column configuration: the persisted visibility, priority and label
//! dictionaries, plus the stores that read and write them.
//!
//! The table never owns persistence. It talks to a [`ColumnConfigSource`];
//! [`MemoryConfigStore`] backs tests and headless runs, [`FileConfigStore`]
//! keeps the config in a TOML file under `[stock_list_columns]`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default visible columns for a fresh install.
pub const DEFAULT_VISIBLE_COLUMNS: [&str; 3] = ["total_breakouts", "active_peaks", "max_quality"];
/// Default left-to-right priority.
pub const DEFAULT_COLUMN_PRIORITY: [&str; 4] =
    ["total_breakouts", "active_peaks", "avg_quality", "max_quality"];

/// Display metadata for one column.
///
/// Older config files store a bare display string; both shapes load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnLabel {
    Plain(String),
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tooltip: Option<String>,
    },
}

/// Everything the table needs from the configuration collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Master switch: `false` hides every data column.
    pub columns_enabled: bool,
    pub visible_columns: Vec<String>,
    pub column_priority: Vec<String>,
    pub column_labels: BTreeMap<String, ColumnLabel>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            columns_enabled: true,
            visible_columns: DEFAULT_VISIBLE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            column_priority: DEFAULT_COLUMN_PRIORITY.iter().map(|s| s.to_string()).collect(),
            column_labels: BTreeMap::new(),
        }
    }
}

impl ColumnConfig {
    /// Display label: configured text, else the key title-cased.
    pub fn display_label(&self, key: &str) -> String {
        match self.column_labels.get(key) {
            Some(ColumnLabel::Plain(text)) => text.clone(),
            Some(ColumnLabel::Detailed {
                display: Some(text),
                ..
            }) => text.clone(),
            _ => title_case(key),
        }
    }

    /// Tooltip text, if the column has a non-empty one.
    pub fn tooltip(&self, key: &str) -> Option<&str> {
        match self.column_labels.get(key) {
            Some(ColumnLabel::Detailed {
                tooltip: Some(text),
                ..
            }) if !text.is_empty() => Some(text.as_str()),
            _ => None,
        }
    }
}

/// `total_breakouts` -> `Total Breakouts`.
pub fn title_case(key: &str) -> String {
    key.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The configuration collaborator.
///
/// Setters are fire-and-forget: a store that fails to persist logs the
/// failure and keeps serving the in-memory value.
pub trait ColumnConfigSource {
    fn column_config(&self) -> ColumnConfig;
    fn set_visible_columns(&mut self, columns: &[String]);
    fn set_columns_enabled(&mut self, enabled: bool);
}

/// In-memory config, counting writes so callers can assert on persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    config: ColumnConfig,
    writes: usize,
}

impl MemoryConfigStore {
    pub fn new(config: ColumnConfig) -> Self {
        Self { config, writes: 0 }
    }

    /// Number of setter calls received so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ColumnConfigSource for MemoryConfigStore {
    fn column_config(&self) -> ColumnConfig {
        self.config.clone()
    }

    fn set_visible_columns(&mut self, columns: &[String]) {
        self.config.visible_columns = columns.to_vec();
        self.writes += 1;
    }

    fn set_columns_enabled(&mut self, enabled: bool) {
        self.config.columns_enabled = enabled;
        self.writes += 1;
    }
}

/// On-disk layout: the column table lives under `[stock_list_columns]`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    stock_list_columns: ColumnConfig,
}

/// TOML-file-backed config. Every setter rewrites the file.
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    config: ColumnConfig,
}

impl FileConfigStore {
    /// Open a config file. Missing or unreadable files fall back to defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = match Self::read(&path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no column config file, using defaults");
                ColumnConfig::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "column config unreadable, using defaults");
                ColumnConfig::default()
            }
        };
        Self { path, config }
    }

    /// Strict read, for callers that want to surface errors.
    pub fn read(path: &Path) -> Result<ColumnConfig, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&text)?;
        Ok(file.stock_list_columns)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = ConfigFile {
            stock_list_columns: self.config.clone(),
        };
        let text = toml::to_string_pretty(&file)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) {
        match self.save() {
            Ok(()) => tracing::debug!(path = %self.path.display(), "column config saved"),
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "failed to save column config"),
        }
    }
}

impl ColumnConfigSource for FileConfigStore {
    fn column_config(&self) -> ColumnConfig {
        self.config.clone()
    }

    fn set_visible_columns(&mut self, columns: &[String]) {
        self.config.visible_columns = columns.to_vec();
        self.persist();
    }

    fn set_columns_enabled(&mut self, enabled: bool) {
        self.config.columns_enabled = enabled;
        self.persist();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_keys() {
        assert_eq!(title_case("total_breakouts"), "Total Breakouts");
        assert_eq!(title_case("label"), "Label");
        assert_eq!(title_case("max_QUALITY"), "Max Quality");
    }

    #[test]
    fn label_lookup_accepts_both_shapes() {
        let mut config = ColumnConfig::default();
        config
            .column_labels
            .insert("total_breakouts".into(), ColumnLabel::Plain("BOs".into()));
        config.column_labels.insert(
            "max_quality".into(),
            ColumnLabel::Detailed {
                display: Some("MaxQ".into()),
                tooltip: Some("Highest breakout quality".into()),
            },
        );
        config.column_labels.insert(
            "active_peaks".into(),
            ColumnLabel::Detailed {
                display: None,
                tooltip: Some(String::new()),
            },
        );

        assert_eq!(config.display_label("total_breakouts"), "BOs");
        assert_eq!(config.display_label("max_quality"), "MaxQ");
        assert_eq!(config.display_label("active_peaks"), "Active Peaks");
        assert_eq!(config.tooltip("max_quality"), Some("Highest breakout quality"));
        assert_eq!(config.tooltip("active_peaks"), None);
        assert_eq!(config.tooltip("total_breakouts"), None);
    }

    #[test]
    fn parses_toml_with_legacy_labels() {
        let text = r#"
            [stock_list_columns]
            columns_enabled = false
            visible_columns = ["avg_quality"]

            [stock_list_columns.column_labels]
            avg_quality = "AvgQ"
            max_quality = { display = "MaxQ", tooltip = "Best score" }
        "#;
        let file: ConfigFile = toml::from_str(text).unwrap();
        let config = file.stock_list_columns;
        assert!(!config.columns_enabled);
        assert_eq!(config.visible_columns, vec!["avg_quality"]);
        // Unspecified fields keep defaults.
        assert_eq!(config.column_priority.len(), DEFAULT_COLUMN_PRIORITY.len());
        assert_eq!(config.display_label("avg_quality"), "AvgQ");
        assert_eq!(config.tooltip("max_quality"), Some("Best score"));
    }

    #[test]
    fn memory_store_counts_writes() {
        let mut store = MemoryConfigStore::default();
        store.set_visible_columns(&["a".to_string()]);
        store.set_columns_enabled(false);
        assert_eq!(store.writes(), 2);
        let config = store.column_config();
        assert_eq!(config.visible_columns, vec!["a"]);
        assert!(!config.columns_enabled);
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ui.toml");

        let mut store = FileConfigStore::open(&path);
        assert_eq!(store.column_config(), ColumnConfig::default());

        store.set_visible_columns(&["max_quality".to_string(), "label".to_string()]);
        store.set_columns_enabled(false);

        let reopened = FileConfigStore::open(&path);
        let config = reopened.column_config();
        assert_eq!(config.visible_columns, vec!["max_quality", "label"]);
        assert!(!config.columns_enabled);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui.toml");
        std::fs::write(&path, "not = [valid toml").unwrap();

        assert!(FileConfigStore::read(&path).is_err());
        let store = FileConfigStore::open(&path);
        assert_eq!(store.column_config(), ColumnConfig::default());
    }
}
