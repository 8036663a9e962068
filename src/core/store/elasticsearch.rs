use super::{IndexStore, StoreAuth, StoreError};
use crate::core::config::StoreConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;
use url::Url;

/// [`IndexStore`] backed by the Elasticsearch index REST API.
#[derive(Debug, Clone)]
pub struct ElasticsearchStore {
    http: reqwest::Client,
    base_url: Url,
    auth: StoreAuth,
}

impl ElasticsearchStore {
    pub fn new(base_url: &str, auth: StoreAuth, timeout: Duration) -> Result<Self, StoreError> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let auth = StoreAuth::from_settings(
            config.api_key.as_deref(),
            config.username.as_deref(),
            config.password.as_deref(),
        );
        Self::new(&config.url, auth, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn index_url(&self, index: &str) -> Result<Url, StoreError> {
        Ok(self.base_url.join(index)?)
    }
}

async fn rejected(
    operation: &'static str,
    index: &str,
    response: reqwest::Response,
) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    StoreError::Rejected {
        operation,
        index: index.to_string(),
        status,
        body,
    }
}

#[async_trait]
impl IndexStore for ElasticsearchStore {
    async fn index_exists(&self, index: &str) -> Result<bool, StoreError> {
        let url = self.index_url(index)?;
        let response = self.auth.apply(self.http.head(url)).send().await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(rejected("exists", index, response).await),
        }
    }

    async fn create_index(&self, index: &str, alias: &str) -> Result<(), StoreError> {
        let url = self.index_url(index)?;
        let body = json!({ "aliases": { alias: {} } });
        let response = self
            .auth
            .apply(self.http.put(url))
            .json(&body)
            .send()
            .await?;
        if response.status().is_success() {
            tracing::info!("created index {} with alias {}", index, alias);
            Ok(())
        } else {
            Err(rejected("create", index, response).await)
        }
    }
}
