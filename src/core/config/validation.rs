#![allow(clippy::result_large_err)]

use super::TesseraConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration rules
    pub fn validate(config: &TesseraConfig) -> Result<(), AppError> {
        if config.serializer.max_depth == 0 {
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                "serializer.max_depth must be at least 1",
            ));
        }

        if config
            .serializer
            .expression_syntaxes
            .iter()
            .any(|name| name == crate::core::activity::expression::LITERAL_SYNTAX)
        {
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                "serializer.expression_syntaxes must not contain the reserved name Literal",
            ));
        }

        let url = url::Url::parse(&config.store.url).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigurationError,
                format!("store.url is not a valid URL: {}", e),
            )
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                format!("store.url must use http or https, got {}", url.scheme()),
            ));
        }

        if config.store.timeout_secs == 0 {
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                "store.timeout_secs must be at least 1",
            ));
        }

        // Basic auth needs both halves
        if config.store.username.is_some() != config.store.password.is_some() {
            return Err(AppError::new(
                ErrorCategory::ConfigurationError,
                "store.username and store.password must be set together",
            ));
        }

        for document_type in &config.store.document_types {
            match config.store.aliases.get(document_type) {
                Some(alias) if !alias.trim().is_empty() => {}
                _ => {
                    return Err(AppError::new(
                        ErrorCategory::ConfigurationError,
                        format!("store.aliases has no alias for {}", document_type),
                    )
                    .with_suggestion(format!(
                        "add `{} = \"<alias>\"` under [store.aliases]",
                        document_type
                    )))
                }
            }
        }

        Ok(())
    }
}
