use crate::core::provider::PROVIDER_WORKBOOK;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DocError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File-based configuration for embedding the engine in a service.
///
/// ```toml
/// [store]
/// base_dir = "/var/lib/docmill/templates"
///
/// [provider]
/// workbook = "provider_addresses.xlsx"
///
/// [logging]
/// verbose = false
/// json = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub store: StoreConfig,
    pub provider: Option<ProviderConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub workbook: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: TomlConfig = toml::from_str(&raw).map_err(|err| DocError::Config {
            message: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn provider_workbook(&self) -> &str {
        self.provider
            .as_ref()
            .and_then(|p| p.workbook.as_deref())
            .unwrap_or(PROVIDER_WORKBOOK)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_path("store.base_dir", &self.store.base_dir.to_string_lossy())?;
        if let Some(provider) = &self.provider {
            if let Some(workbook) = &provider.workbook {
                validate_non_empty_string("provider.workbook", workbook)?;
            }
        }
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn base_dir(&self) -> &Path {
        &self.store.base_dir
    }

    fn provider_file(&self) -> &str {
        self.provider_workbook()
    }

    fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }
}
