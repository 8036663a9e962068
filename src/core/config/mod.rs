use crate::core::activity::{ExpressionSyntaxes, SerializerOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main Tessera configuration loaded from tessera.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TesseraConfig {
    /// Activity serializer configuration
    #[serde(default)]
    pub serializer: SerializerConfig,

    /// Document store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

/// `[serializer]` section, mapped onto [`SerializerOptions`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerializerConfig {
    #[serde(default = "default_true")]
    pub skip_null_values: bool,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default)]
    pub strict_type_names: bool,

    #[serde(default = "default_true")]
    pub validate_expressions: bool,

    /// Expression languages accepted on inputs
    #[serde(default = "default_expression_syntaxes")]
    pub expression_syntaxes: Vec<String>,
}

/// `[store]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    #[serde(default = "default_store_url")]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Document type name -> index alias
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,

    /// Document types to provision, in order
    #[serde(default = "default_document_types")]
    pub document_types: Vec<String>,
}

pub const DEFAULT_DOCUMENT_TYPES: [&str; 3] =
    ["WorkflowDefinition", "WorkflowInstance", "ExecutionLogRecord"];

fn default_true() -> bool {
    true
}

fn default_max_depth() -> usize {
    64
}

fn default_expression_syntaxes() -> Vec<String> {
    ExpressionSyntaxes::default()
        .names()
        .map(str::to_string)
        .collect()
}

fn default_store_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_aliases() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "WorkflowDefinition".to_string(),
            "workflow-definitions".to_string(),
        ),
        (
            "WorkflowInstance".to_string(),
            "workflow-instances".to_string(),
        ),
        (
            "ExecutionLogRecord".to_string(),
            "workflow-execution-log".to_string(),
        ),
    ])
}

fn default_document_types() -> Vec<String> {
    DEFAULT_DOCUMENT_TYPES
        .iter()
        .map(|name| name.to_string())
        .collect()
}

impl Default for SerializerConfig {
    fn default() -> Self {
        SerializerConfig {
            skip_null_values: true,
            max_depth: default_max_depth(),
            strict_type_names: false,
            validate_expressions: true,
            expression_syntaxes: default_expression_syntaxes(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            url: default_store_url(),
            api_key: None,
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
            aliases: default_aliases(),
            document_types: default_document_types(),
        }
    }
}

impl SerializerConfig {
    pub fn to_options(&self) -> SerializerOptions {
        SerializerOptions {
            skip_null_values: self.skip_null_values,
            max_depth: self.max_depth,
            strict_type_names: self.strict_type_names,
            validate_expressions: self.validate_expressions,
            expression_syntaxes: ExpressionSyntaxes::from_names(
                self.expression_syntaxes.iter().cloned(),
            ),
        }
    }
}


pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;
