//! Document-store collaborator: index/alias provisioning for persisted
//! workflow documents.
//!
//! The serializer never talks to the store. Hosts call
//! [`provision_indices_and_aliases`] once at startup, before any documents
//! are written.

pub mod auth;
pub mod elasticsearch;
pub mod memory;
pub mod naming;
pub mod provisioning;

pub use auth::StoreAuth;
pub use elasticsearch::ElasticsearchStore;
pub use memory::InMemoryIndexStore;
pub use naming::{generate_index_name, normalize_alias};
pub use provisioning::{provision_indices_and_aliases, ProvisioningReport};

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by an [`IndexStore`] or the provisioning routine.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No alias is configured for a document type.
    #[error("no index alias configured for document type {document_type}")]
    MissingAlias { document_type: String },

    /// The generated index name breaks the store's naming rules.
    #[error("invalid index name '{name}': {reason}")]
    InvalidIndexName { name: String, reason: String },

    /// Store URL could not be parsed or joined.
    #[error("invalid store url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport-level failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store rejected {operation} for index {index} with status {status}: {body}")]
    Rejected {
        operation: &'static str,
        index: String,
        status: u16,
        body: String,
    },

    /// The store is not reachable or refused the call outright.
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let code = match &err {
            StoreError::MissingAlias { .. } | StoreError::InvalidIndexName { .. } => "STORE-CFG-001",
            StoreError::InvalidUrl(_) => "STORE-CFG-002",
            StoreError::Http(_) | StoreError::Unavailable { .. } => "STORE-IO-001",
            StoreError::Rejected { .. } => "STORE-IO-002",
        };
        AppError::with_source(
            ErrorCategory::ProvisioningFailure,
            "index provisioning failed",
            Box::new(err),
        )
        .with_code(code)
    }
}

/// Minimal index administration surface needed for provisioning.
#[async_trait]
pub trait IndexStore: Send + Sync {
    async fn index_exists(&self, index: &str) -> Result<bool, StoreError>;

    /// Create `index` with `alias` attached.
    async fn create_index(&self, index: &str, alias: &str) -> Result<(), StoreError>;
}
