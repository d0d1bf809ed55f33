//! On-disk document encoding and atomic file replacement

use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::error;

use amroute_core::{Error, Result};

/// Encoding used for configuration documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
}

impl DocumentFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Yaml => "yaml",
            DocumentFormat::Json => "json",
        }
    }

    pub(crate) fn decode<T: DeserializeOwned>(&self, contents: &str, path: &Path) -> Result<T> {
        match self {
            DocumentFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| {
                error!("Failed to parse YAML document {:?}: {}", path, e);
                Error::StoreUnavailable(format!("Invalid YAML in {}: {}", path.display(), e))
            }),
            DocumentFormat::Json => serde_json::from_str(contents).map_err(|e| {
                error!("Failed to parse JSON document {:?}: {}", path, e);
                Error::StoreUnavailable(format!("Invalid JSON in {}: {}", path.display(), e))
            }),
        }
    }

    pub(crate) fn encode<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            DocumentFormat::Yaml => serde_yaml::to_string(value).map_err(|e| {
                error!("Failed to serialize YAML: {}", e);
                Error::Internal(format!("YAML serialization error: {}", e))
            }),
            DocumentFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        }
    }
}

/// Read a file, treating a missing file as `None`.
pub(crate) async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => {
            error!("Failed to read {:?}: {}", path, e);
            Err(Error::Io(e))
        }
    }
}

/// Replace `path` with `contents` via a sibling temp file and rename.
pub(crate) async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp_path = temp_path(path);

    tokio::fs::write(&tmp_path, contents).await.map_err(|e| {
        error!("Failed to write {:?}: {}", tmp_path, e);
        Error::Io(e)
    })?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        error!("Failed to move {:?} into place: {}", tmp_path, e);
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(Error::Io(e));
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", file_name))
}

/// Expand a leading `~` to the user's home directory
pub(crate) fn expand_home(path: PathBuf) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?
            .join(rest)),
        Err(_) => Ok(path),
    }
}
