use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::fees::ReserveSchedule;

/// Size limits of owner directories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryLimits {
    /// Maximum number of entries on one page.
    pub max_entries_per_page: usize,
    /// Maximum number of pages in one directory, root included.
    pub max_pages: u64,
}

impl Default for DirectoryLimits {
    fn default() -> Self {
        Self {
            max_entries_per_page: 32,
            max_pages: 262_144,
        }
    }
}

/// Ledger-wide parameters.
///
/// Every field has a default, so a TOML file only needs the keys it
/// overrides:
///
/// ```toml
/// [fees]
/// base = 10000000
/// increment = 2000000
///
/// [directory]
/// max_entries_per_page = 32
/// max_pages = 262144
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub fees: ReserveSchedule,
    pub directory: DirectoryLimits,
}

impl LedgerConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.directory.max_entries_per_page == 0 {
            return Err(StoreError::Config(
                "directory.max_entries_per_page must be positive".into(),
            ));
        }
        if self.directory.max_pages == 0 {
            return Err(StoreError::Config(
                "directory.max_pages must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tl_types::Drops;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LedgerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.directory.max_entries_per_page, 32);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = LedgerConfig::from_toml_str(
            r#"
            [fees]
            base = 10
            increment = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.fees, ReserveSchedule::new(Drops(10), Drops(2)));
        assert_eq!(config.directory, DirectoryLimits::default());
    }

    #[test]
    fn single_key_sections_keep_the_other_defaults() {
        let config = LedgerConfig::from_toml_str("[directory]\nmax_pages = 8\n").unwrap();
        assert_eq!(config.directory.max_pages, 8);
        assert_eq!(
            config.directory.max_entries_per_page,
            DirectoryLimits::default().max_entries_per_page
        );

        let config = LedgerConfig::from_toml_str("[fees]\nincrement = 7\n").unwrap();
        assert_eq!(config.fees.increment, Drops(7));
        assert_eq!(config.fees.base, ReserveSchedule::default().base);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = LedgerConfig::from_toml_str(
            r#"
            [directory]
            max_entries_per_page = 0
            max_pages = 4
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = LedgerConfig::from_toml_str("fees = 3").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[directory]\nmax_entries_per_page = 4\nmax_pages = 8").unwrap();
        let config = LedgerConfig::load(file.path()).unwrap();
        assert_eq!(config.directory.max_entries_per_page, 4);
        assert_eq!(config.directory.max_pages, 8);
        assert_eq!(config.fees, ReserveSchedule::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LedgerConfig::load(Path::new("/nonexistent/tl.toml")).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
