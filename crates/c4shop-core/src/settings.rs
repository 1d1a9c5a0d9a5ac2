//! Export settings, read from `~/.c4shop/settings.json`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::StorageError;
use crate::storage::workspaces_dir;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Dsl,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Dsl => "dsl",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "dsl" => Ok(ExportFormat::Dsl),
            other => Err(format!("unknown export format: {other} (expected json or dsl)")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    /// Where exported documents go. Defaults to `~/.c4shop`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_formats")]
    pub formats: Vec<ExportFormat>,
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_formats() -> Vec<ExportFormat> {
    vec![ExportFormat::Json, ExportFormat::Dsl]
}

fn default_pretty() -> bool {
    true
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            formats: default_formats(),
            pretty: default_pretty(),
        }
    }
}

impl ExportSettings {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(workspaces_dir)
    }
}

pub fn settings_path() -> PathBuf {
    workspaces_dir().join("settings.json")
}

pub fn read_settings() -> ExportSettings {
    read_settings_from(&settings_path())
}

/// Missing file means defaults. So does a broken one, after a warning.
pub fn read_settings_from(path: &Path) -> ExportSettings {
    if !path.exists() {
        return ExportSettings::default();
    }
    let parsed = fs::read_to_string(path)
        .map_err(StorageError::from)
        .and_then(|s| serde_json::from_str(&s).map_err(StorageError::from));
    match parsed {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            ExportSettings::default()
        }
    }
}

pub fn write_settings_to(path: &Path, settings: &ExportSettings) -> Result<(), StorageError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}
