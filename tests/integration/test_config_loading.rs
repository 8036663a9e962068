use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;
use tessera::core::config::{ConfigLoader, TesseraConfig};
use tessera::core::types::ErrorCategory;

fn clear_tessera_env() {
    for v in &[
        "TESSERA_STORE_URL",
        "TESSERA_STORE_API_KEY",
        "TESSERA_STORE_USERNAME",
        "TESSERA_STORE_PASSWORD",
        "TESSERA_SERIALIZER_STRICT_TYPE_NAMES",
        "TESSERA_SERIALIZER_MAX_DEPTH",
    ] {
        env::remove_var(v);
    }
}

/// Test integration of config loading with environment variables
#[test]
#[serial]
fn test_config_loading_integration() {
    clear_tessera_env();
    let temp_dir = TempDir::new().unwrap();

    let config_content = r#"
[serializer]
skip_null_values = false
strict_type_names = true
max_depth = 16
expression_syntaxes = ["JavaScript", "Rhai"]

[store]
url = "https://search.internal:9243"
username = "elastic"
password = "changeme"
document_types = ["WorkflowDefinition", "WorkflowInstance"]

[store.aliases]
WorkflowDefinition = "definitions"
WorkflowInstance = "instances"

[logging]
default_level = "debug"
"#;

    fs::write(temp_dir.path().join("tessera.toml"), config_content).unwrap();

    let config = ConfigLoader::load_from_dir(temp_dir.path()).unwrap();

    assert!(!config.serializer.skip_null_values);
    assert!(config.serializer.strict_type_names);
    assert_eq!(config.serializer.max_depth, 16);
    assert_eq!(config.store.url, "https://search.internal:9243");
    assert_eq!(config.store.username.as_deref(), Some("elastic"));
    assert_eq!(config.store.document_types.len(), 2);
    assert_eq!(
        config.store.aliases.get("WorkflowInstance").map(String::as_str),
        Some("instances")
    );

    let options = config.serializer.to_options();
    assert!(options.expression_syntaxes.contains("JavaScript"));
    assert!(!options.expression_syntaxes.contains("Liquid"));
}

#[test]
#[serial]
fn test_env_overrides_file_values() {
    clear_tessera_env();
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("tessera.toml"),
        r#"
[store]
url = "http://file-host:9200"
"#,
    )
    .unwrap();

    env::set_var("TESSERA_STORE_URL", "http://env-host:9200");
    env::set_var("TESSERA_STORE_API_KEY", "env-key");
    env::set_var("TESSERA_SERIALIZER_MAX_DEPTH", "5");

    let config = ConfigLoader::load_from_dir(temp_dir.path()).unwrap();
    clear_tessera_env();

    assert_eq!(config.store.url, "http://env-host:9200");
    assert_eq!(config.store.api_key.as_deref(), Some("env-key"));
    assert_eq!(config.serializer.max_depth, 5);
}

#[test]
#[serial]
fn test_env_overrides_without_file() {
    clear_tessera_env();
    let temp_dir = TempDir::new().unwrap();

    env::set_var("TESSERA_SERIALIZER_STRICT_TYPE_NAMES", "true");
    let config = ConfigLoader::load_from_dir(temp_dir.path()).unwrap();
    clear_tessera_env();

    assert!(config.serializer.strict_type_names);
    assert_eq!(config.store, TesseraConfig::default().store);
}

#[test]
#[serial]
fn test_invalid_values_fail_validation() {
    clear_tessera_env();
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("tessera.toml"),
        r#"
[store]
document_types = ["WorkflowDefinition", "Bookmark"]
"#,
    )
    .unwrap();

    let err = ConfigLoader::load_from_dir(temp_dir.path()).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ConfigurationError);
    assert!(err.to_string().contains("Bookmark"));
}

#[test]
#[serial]
fn test_env_can_break_otherwise_valid_config() {
    clear_tessera_env();
    let temp_dir = TempDir::new().unwrap();

    env::set_var("TESSERA_STORE_USERNAME", "elastic");
    let result = ConfigLoader::load_from_dir(temp_dir.path());
    clear_tessera_env();

    assert!(result.is_err());
}
