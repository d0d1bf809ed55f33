use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::Level;

use amroute_config_file::DocumentFormat;
use amroute_core::OrgId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Directory holding per-organization documents and provenance
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_org_id")]
    pub org_id: i64,

    /// `yaml` or `json`
    #[serde(default = "default_document_format")]
    pub document_format: String,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            org_id: default_org_id(),
            document_format: default_document_format(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl CliConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)
                .with_context(|| format!("Invalid TOML in {}", path.display()))?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Invalid YAML in {}", path.display()))?
        };

        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("AMROUTE_DATA_DIR") {
            self.data_dir = val;
        }

        if let Ok(val) = std::env::var("AMROUTE_ORG_ID") {
            match val.trim().parse::<i64>() {
                Ok(org_id) => self.org_id = org_id,
                Err(_) => eprintln!("Warning: Invalid AMROUTE_ORG_ID '{}', ignoring", val),
            }
        }

        if let Ok(val) = std::env::var("AMROUTE_DOCUMENT_FORMAT") {
            self.document_format = val;
        }

        if let Ok(val) = std::env::var("AMROUTE_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Data directory with `~` expanded
    pub fn data_dir_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data_dir).into_owned())
    }

    pub fn org(&self) -> anyhow::Result<OrgId> {
        OrgId::new(self.org_id).with_context(|| format!("Invalid org id {}", self.org_id))
    }

    pub fn format(&self) -> anyhow::Result<DocumentFormat> {
        match self.document_format.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            "json" => Ok(DocumentFormat::Json),
            other => bail!("Invalid document format '{}'. Use 'yaml' or 'json'", other),
        }
    }

    /// Unknown levels fall back to INFO
    pub fn log_level(&self) -> Level {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn default_data_dir() -> String {
    "~/.amroute/data".to_string()
}

fn default_org_id() -> i64 {
    1
}

fn default_document_format() -> String {
    "yaml".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.org_id, 1);
        assert_eq!(config.format().unwrap(), DocumentFormat::Yaml);
        assert_eq!(config.log_level(), Level::INFO);
    }

    #[test]
    fn test_from_yaml_file_with_partial_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("amroute.yaml");
        std::fs::write(&path, "org_id: 7\nlogging:\n  level: debug\n").unwrap();

        let config = CliConfig::from_file(&path).unwrap();
        assert_eq!(config.org_id, 7);
        assert_eq!(config.log_level(), Level::DEBUG);
        assert_eq!(config.data_dir, default_data_dir());
    }

    #[test]
    fn test_from_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("amroute.toml");
        std::fs::write(
            &path,
            "data_dir = \"/srv/amroute\"\ndocument_format = \"json\"\n",
        )
        .unwrap();

        let config = CliConfig::from_file(&path).unwrap();
        assert_eq!(config.data_dir_path(), PathBuf::from("/srv/amroute"));
        assert_eq!(config.format().unwrap(), DocumentFormat::Json);
    }

    #[test]
    fn test_invalid_values() {
        let config = CliConfig {
            org_id: 0,
            document_format: "xml".to_string(),
            ..Default::default()
        };
        assert!(config.org().is_err());
        assert!(config.format().is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_merge_env_overrides_file_values() {
        unsafe {
            std::env::set_var("AMROUTE_DATA_DIR", "/tmp/amroute-env");
            std::env::set_var("AMROUTE_ORG_ID", "42");
            std::env::set_var("AMROUTE_LOG_LEVEL", "warn");
        }

        let mut config = CliConfig::default();
        config.merge_env();

        assert_eq!(config.data_dir, "/tmp/amroute-env");
        assert_eq!(config.org().unwrap(), OrgId::new(42).unwrap());
        assert_eq!(config.log_level(), Level::WARN);

        unsafe {
            std::env::remove_var("AMROUTE_DATA_DIR");
            std::env::remove_var("AMROUTE_ORG_ID");
            std::env::remove_var("AMROUTE_LOG_LEVEL");
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_merge_env_ignores_bad_org_id() {
        unsafe {
            std::env::set_var("AMROUTE_ORG_ID", "not-a-number");
        }

        let mut config = CliConfig::default();
        config.merge_env();
        assert_eq!(config.org_id, 1);

        unsafe {
            std::env::remove_var("AMROUTE_ORG_ID");
        }
    }
}
