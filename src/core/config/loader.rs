#![allow(clippy::result_large_err)]

use super::TesseraConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "tessera.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from a directory (dir/tessera.toml).
    /// Environment variables override config file values; a missing file
    /// yields defaults plus env vars.
    pub fn load_from_dir(dir: &Path) -> Result<TesseraConfig, AppError> {
        Self::load(&dir.join(CONFIG_FILE_NAME))
    }

    /// Load config from a specific path, falling back to defaults when absent,
    /// then apply env overrides and validate.
    pub fn load(path: &Path) -> Result<TesseraConfig, AppError> {
        let mut config = Self::load_from_file(path)?.unwrap_or_default();
        Self::apply_env_overrides(&mut config);
        super::ConfigValidator::validate(&config)?;
        tracing::debug!("loaded configuration (file: {})", path.display());
        Ok(config)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<TesseraConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let config: TesseraConfig = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigurationError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
        })?;

        Ok(Some(config))
    }

    /// Apply environment variable overrides to the configuration
    /// Environment variables take precedence over config file values
    fn apply_env_overrides(config: &mut TesseraConfig) {
        if let Ok(url) = env::var("TESSERA_STORE_URL") {
            config.store.url = url;
        }

        if let Ok(api_key) = env::var("TESSERA_STORE_API_KEY") {
            config.store.api_key = Some(api_key);
        }

        if let Ok(username) = env::var("TESSERA_STORE_USERNAME") {
            config.store.username = Some(username);
        }

        if let Ok(password) = env::var("TESSERA_STORE_PASSWORD") {
            config.store.password = Some(password);
        }

        if let Ok(strict) = env::var("TESSERA_SERIALIZER_STRICT_TYPE_NAMES") {
            if let Ok(strict) = strict.parse::<bool>() {
                config.serializer.strict_type_names = strict;
            }
        }

        if let Ok(max_depth) = env::var("TESSERA_SERIALIZER_MAX_DEPTH") {
            if let Ok(max_depth) = max_depth.parse::<usize>() {
                config.serializer.max_depth = max_depth;
            }
        }
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "TESSERA_STORE_URL - Override the document store URL (default: http://localhost:9200)",
            "TESSERA_STORE_API_KEY - API key for the document store; takes precedence over basic auth",
            "TESSERA_STORE_USERNAME - Basic auth username for the document store",
            "TESSERA_STORE_PASSWORD - Basic auth password for the document store",
            "TESSERA_SERIALIZER_STRICT_TYPE_NAMES - Reject mismatched wrapper typeName aliases (true/false)",
            "TESSERA_SERIALIZER_MAX_DEPTH - Maximum activity nesting depth (default: 64)",
        ]
    }
}
