//! Batch settings management
//!
//! Settings are persisted as pretty-printed JSON. A file that fails to
//! parse is reported and replaced by defaults, never treated as fatal.

use crate::Result;
use fill_engine::CellMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file name inside a settings directory
pub const SETTINGS_FILE_NAME: &str = "docfill.json";

/// Settings of a fill batch. Missing fields take their default value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatchSettings {
    /// Concurrent document jobs, at least 1
    pub workers: usize,
    /// Run jobs concurrently
    pub parallel: bool,
    /// Also fill paragraphs inside DOCX tables
    pub include_tables: bool,
    /// Value of the place tokens
    pub place: String,
    /// chrono format of the date tokens
    pub date_format: String,
    /// Tokens receiving today's date
    pub date_tokens: Vec<String>,
    /// Tokens receiving the place
    pub place_tokens: Vec<String>,
    /// Column whose value names the output folder
    pub record_id_column: String,
    /// Data row holding the placeholder of each column
    pub placeholder_row: usize,
    /// Folder the output folders are created in
    pub output_root: PathBuf,
    /// Output file name with `{stem}`, `{record}` and `{ext}` placeholders
    pub file_name_pattern: String,
    /// Also write a zip archive of the output folder
    pub archive: bool,
    /// How spreadsheet cells apply the mapping
    pub cell_mode: CellMode,
    pub logo_width_inches: f64,
    pub logo_height_inches: f64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            workers: 4,
            parallel: true,
            include_tables: true,
            place: "Arles".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            date_tokens: vec!["[date]".to_string(), "[date_du_jour]".to_string()],
            place_tokens: vec!["[Fait_a]".to_string()],
            record_id_column: "Nom de l'organisme".to_string(),
            placeholder_row: 0,
            output_root: PathBuf::from("docs"),
            file_name_pattern: "{stem}_{record}.{ext}".to_string(),
            archive: true,
            cell_mode: CellMode::default(),
            logo_width_inches: 1.0,
            logo_height_inches: 1.0,
        }
    }
}

impl BatchSettings {
    /// Worker count clamped to at least one
    pub fn effective_workers(&self) -> usize {
        self.workers.max(1)
    }
}

/// Settings manager for loading, saving, and updating batch settings
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Current settings (cached)
    current: BatchSettings,
}

impl SettingsManager {
    /// Create a settings manager for `docfill.json` in `settings_dir`
    pub fn new(settings_dir: PathBuf) -> Self {
        Self::with_file(settings_dir.join(SETTINGS_FILE_NAME))
    }

    /// Create a settings manager for an explicit settings file
    pub fn with_file(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            current: BatchSettings::default(),
        }
    }

    /// Get the path to the settings file
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_sync(&mut self) -> Result<&BatchSettings> {
        if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            self.current = parse_or_default(&content);
        } else {
            self.current = BatchSettings::default();
        }
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &BatchSettings {
        &self.current
    }

    /// Update settings synchronously
    pub fn update_sync(&mut self, settings: BatchSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }

    /// Reset settings to defaults synchronously
    pub fn reset_sync(&mut self) -> Result<&BatchSettings> {
        self.current = BatchSettings::default();
        self.save_sync()?;
        Ok(&self.current)
    }
}

fn parse_or_default(content: &str) -> BatchSettings {
    match serde_json::from_str::<BatchSettings>(content) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Failed to parse settings file, using defaults: {}", e);
            BatchSettings::default()
        }
    }
}
