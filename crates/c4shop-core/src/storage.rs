//! Reading and writing workspace documents.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::settings::ExportFormat;
use crate::{dsl, rules, Workspace};

/// Default home for exported workspaces and settings (`~/.c4shop`).
pub fn workspaces_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".c4shop")
}

pub fn document_path(dir: &Path, name: &str, format: ExportFormat) -> PathBuf {
    dir.join(format!("{}.{}", name, format.extension()))
}

/// Write `workspace` as `<dir>/<name>.json`.
pub fn write_workspace(
    dir: &Path,
    name: &str,
    workspace: &Workspace,
    pretty: bool,
) -> Result<PathBuf, StorageError> {
    let json = if pretty {
        serde_json::to_string_pretty(workspace)?
    } else {
        serde_json::to_string(workspace)?
    };
    write_atomic(dir, name, ExportFormat::Json, &json)
}

/// Write `workspace` as Structurizr DSL to `<dir>/<name>.dsl`.
pub fn write_dsl(dir: &Path, name: &str, workspace: &Workspace) -> Result<PathBuf, StorageError> {
    write_atomic(dir, name, ExportFormat::Dsl, &dsl::to_dsl(workspace))
}

pub fn export(
    dir: &Path,
    name: &str,
    workspace: &Workspace,
    format: ExportFormat,
    pretty: bool,
) -> Result<PathBuf, StorageError> {
    match format {
        ExportFormat::Json => write_workspace(dir, name, workspace, pretty),
        ExportFormat::Dsl => write_dsl(dir, name, workspace),
    }
}

/// Temp file + rename, so readers never observe a half-written document.
fn write_atomic(
    dir: &Path,
    name: &str,
    format: ExportFormat,
    data: &str,
) -> Result<PathBuf, StorageError> {
    fs::create_dir_all(dir)?;
    let tmp = dir.join(format!(".{}.{}.tmp", name, format.extension()));
    let path = document_path(dir, name, format);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, &path)?;
    tracing::info!(path = %path.display(), %format, "workspace written");
    Ok(path)
}

/// Read a JSON workspace document and check it against [`rules::validate`].
pub fn read_workspace(path: &Path) -> Result<Workspace, StorageError> {
    let raw = fs::read_to_string(path)?;
    let workspace: Workspace = serde_json::from_str(&raw)?;
    rules::validate(&workspace)?;
    Ok(workspace)
}

/// Names of the JSON workspace documents in `dir`, sorted.
pub fn list_workspaces(dir: &Path) -> Result<Vec<String>, StorageError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name().to_string_lossy().to_string();
            name.strip_suffix(".json")
                .filter(|n| *n != "settings" && !n.starts_with('.'))
                .map(|n| n.to_string())
        })
        .collect();
    names.sort();
    Ok(names)
}
