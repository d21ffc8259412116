//! Configuration, loaded from JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use dataverse_core::fact::MAX_DATA_TYPE_LEN;
use dataverse_store::SqliteIndex;

use crate::error::ConfigError;

/// Data type tag attached to notarizations by default.
pub const DEFAULT_NOTARIZE_DATA_TYPE: &str = "/dataverse.asset.MsgNotarizedAsset";

/// Configuration for Dataverse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataverseConfig {
    /// SQLite file for the secondary index. `None` keeps it in memory.
    pub index_path: Option<PathBuf>,
    /// Data type tag the synchronizer attaches to notarizations.
    pub notarize_data_type: String,
}

impl Default for DataverseConfig {
    fn default() -> Self {
        Self {
            index_path: None,
            notarize_data_type: DEFAULT_NOTARIZE_DATA_TYPE.to_string(),
        }
    }
}

impl DataverseConfig {
    /// Parse from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check values against the fact bounds they feed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notarize_data_type.len() > MAX_DATA_TYPE_LEN {
            return Err(ConfigError::Invalid(format!(
                "notarize_data_type is {} bytes, maximum is {}",
                self.notarize_data_type.len(),
                MAX_DATA_TYPE_LEN
            )));
        }
        Ok(())
    }

    /// Open the configured secondary index.
    pub fn open_index(&self) -> Result<SqliteIndex, ConfigError> {
        let index = match &self.index_path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "opening index");
                SqliteIndex::open(path)?
            }
            None => SqliteIndex::open_memory()?,
        };
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = DataverseConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DataverseConfig::default());
        assert_eq!(config.notarize_data_type, DEFAULT_NOTARIZE_DATA_TYPE);
    }

    #[test]
    fn test_parse_fields() {
        let config = DataverseConfig::from_json_str(
            r#"{"index_path": "/tmp/index.db", "notarize_data_type": "custom"}"#,
        )
        .unwrap();
        assert_eq!(config.index_path, Some(PathBuf::from("/tmp/index.db")));
        assert_eq!(config.notarize_data_type, "custom");
    }

    #[test]
    fn test_oversized_data_type_rejected() {
        let json = format!(r#"{{"notarize_data_type": "{}"}}"#, "x".repeat(129));
        assert!(matches!(
            DataverseConfig::from_json_str(&json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            DataverseConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file_and_open_index() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("index.db");
        let file = dir.path().join("dataverse.json");
        std::fs::write(
            &file,
            serde_json::json!({ "index_path": db }).to_string(),
        )
        .unwrap();

        let config = DataverseConfig::from_json_file(&file).unwrap();
        config.open_index().unwrap();
        assert!(db.exists());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            DataverseConfig::from_json_file(dir.path().join("absent.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
