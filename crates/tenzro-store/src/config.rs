use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// File-name suffix marking store-owned files.
pub const DEFAULT_SUFFIX: &str = ".tzds";

/// Flush/sync strategy for entry files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// `fsync` every entry file before it is renamed into place.
    EveryWrite,
    /// Rely on OS page-cache buffering.
    #[default]
    OsDefault,
}

/// Configuration for a [`Store`](crate::Store).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Reserved suffix appended to every key to form its file name.
    pub suffix: String,
    /// Sync strategy applied by `put` and `replicate_to`.
    pub sync_mode: SyncMode,
    /// Write pretty-printed JSON instead of the compact form.
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            sync_mode: SyncMode::default(),
            pretty: false,
        }
    }
}

impl StoreConfig {
    /// Parse a configuration from TOML. Missing fields take their defaults.
    pub fn from_toml_str(input: &str) -> StoreResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| StoreError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the suffix can safely be appended to a file name.
    ///
    /// The suffix must start with `.` so that in-flight temporary files,
    /// whose names end in random alphanumerics, never look store-owned.
    pub fn validate(&self) -> StoreResult<()> {
        if !self.suffix.starts_with('.') {
            return Err(StoreError::InvalidConfig(format!(
                "suffix {:?} must start with '.'",
                self.suffix
            )));
        }
        if self.suffix.contains(['/', '\\', '\0']) {
            return Err(StoreError::InvalidConfig(format!(
                "suffix {:?} contains a path separator",
                self.suffix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert_eq!(c.suffix, ".tzds");
        assert_eq!(c.sync_mode, SyncMode::OsDefault);
        assert!(!c.pretty);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn parse_partial_toml() {
        let c = StoreConfig::from_toml_str("sync_mode = \"every_write\"\n").unwrap();
        assert_eq!(c.sync_mode, SyncMode::EveryWrite);
        assert_eq!(c.suffix, DEFAULT_SUFFIX);
    }

    #[test]
    fn parse_full_toml() {
        let input = r#"
            suffix = ".ledger"
            sync_mode = "os_default"
            pretty = true
        "#;
        let c = StoreConfig::from_toml_str(input).unwrap();
        assert_eq!(c.suffix, ".ledger");
        assert!(c.pretty);
    }

    #[test]
    fn rejects_bad_suffix() {
        assert!(StoreConfig::from_toml_str("suffix = \"\"").is_err());
        assert!(StoreConfig::from_toml_str("suffix = \"tzds\"").is_err());
        assert!(StoreConfig::from_toml_str("suffix = \".a/b\"").is_err());
    }

    #[test]
    fn rejects_unknown_sync_mode() {
        let err = StoreConfig::from_toml_str("sync_mode = \"sometimes\"").unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfig(_)));
    }
}
