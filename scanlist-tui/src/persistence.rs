//! UI state persistence: JSON save/load across restarts.
//!
//! Column visibility lives in the column config file owned by the table's
//! config store; this file only keeps what the terminal host itself owns.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use scanlist_core::{LabelMode, SortState};

use crate::app::{AppState, Overlay};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub label_mode: LabelMode,
    pub last_scan_file: Option<PathBuf>,
    pub sort: Option<SortState>,
    pub min_quality: f64,
    pub help_dismissed: bool,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            label_mode: LabelMode::Avg,
            last_scan_file: None,
            sort: None,
            min_quality: 0.0,
            help_dismissed: false,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ui state unreadable, using defaults");
            PersistedState::default()
        }),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        label_mode: app.table.label_mode(),
        last_scan_file: app.scan_path.clone(),
        sort: app.table.sort_state().cloned(),
        min_quality: app.min_quality,
        help_dismissed: app.overlay != Overlay::Help || app.help_seen,
    }
}

/// Apply persisted state to AppState. The sort is applied after the next load.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.table.set_label_mode(state.label_mode);
    app.min_quality = state.min_quality;
    app.pending_sort = state.sort;
    if app.scan_path.is_none() {
        app.scan_path = state.last_scan_file;
    }
    if !state.help_dismissed {
        app.overlay = Overlay::Help;
    }
    app.help_seen = state.help_dismissed;
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanlist_core::SortDirection;

    #[test]
    fn roundtrip() {
        let dir = std::env::temp_dir().join(format!("scanlist_persist_test_{}", std::process::id()));
        let path = dir.join("ui_state.json");

        let state = PersistedState {
            label_mode: LabelMode::BestQuality,
            last_scan_file: Some(PathBuf::from("/data/scan_2024.json")),
            sort: Some(SortState {
                column: "max_quality".into(),
                direction: SortDirection::Ascending,
            }),
            min_quality: 40.0,
            help_dismissed: true,
        };

        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.label_mode, LabelMode::BestQuality);
        assert_eq!(loaded.sort, state.sort);
        assert_eq!(loaded.min_quality, 40.0);
        assert!(loaded.help_dismissed);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/ui_state.json"));
        assert_eq!(loaded.label_mode, LabelMode::Avg);
        assert!(loaded.sort.is_none());
        assert!(!loaded.help_dismissed);
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = std::env::temp_dir().join(format!("scanlist_persist_corrupt_{}", std::process::id()));
        let path = dir.join("ui_state.json");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "not valid json {{{").unwrap();

        let loaded = load(&path);
        assert!(loaded.last_scan_file.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = std::env::temp_dir().join(format!("scanlist_persist_partial_{}", std::process::id()));
        let path = dir.join("ui_state.json");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, r#"{"label_mode": "latest"}"#).unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.label_mode, LabelMode::Latest);
        assert_eq!(loaded.min_quality, 0.0);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
