use super::StoreError;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Longest index name the store accepts, in bytes.
pub const MAX_INDEX_NAME_BYTES: usize = 255;

fn index_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9._+\-]*$").unwrap())
}

/// Alias as the store will hold it: trimmed, lowercased and valid as a name.
pub fn normalize_alias(alias: &str) -> Result<String, StoreError> {
    let alias = alias.trim().to_lowercase();
    validate_index_name(&alias)?;
    Ok(alias)
}

/// Monthly index behind `alias`: `<alias>_<yyyy-MM>`, lowercased.
pub fn generate_index_name(alias: &str, now: DateTime<Utc>) -> Result<String, StoreError> {
    let name = format!("{}_{}", normalize_alias(alias)?, now.format("%Y-%m"));
    validate_index_name(&name)?;
    Ok(name)
}

pub fn validate_index_name(name: &str) -> Result<(), StoreError> {
    let invalid = |reason: &str| StoreError::InvalidIndexName {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    if name.len() > MAX_INDEX_NAME_BYTES {
        return Err(invalid("longer than 255 bytes"));
    }
    if name == "." || name == ".." {
        return Err(invalid("reserved name"));
    }
    if !index_name_pattern().is_match(name) {
        return Err(invalid(
            "must start with a letter or digit and contain only a-z, 0-9, '.', '_', '-', '+'",
        ));
    }
    Ok(())
}
