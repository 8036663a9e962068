use super::{IndexStore, StoreError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Process-local [`IndexStore`] for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryIndexStore {
    indices: Mutex<BTreeMap<String, Vec<String>>>,
    create_calls: AtomicUsize,
    unavailable: Option<String>,
}

impl InMemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with [`StoreError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            unavailable: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of `create_index` calls received, successful or not.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn aliases(&self, index: &str) -> Option<Vec<String>> {
        self.lock().get(index).cloned()
    }

    pub fn indices(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<String>>> {
        // A poisoned map is still consistent: each write is a single insert.
        self.indices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_available(&self) -> Result<(), StoreError> {
        match &self.unavailable {
            Some(message) => Err(StoreError::Unavailable {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IndexStore for InMemoryIndexStore {
    async fn index_exists(&self, index: &str) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self.lock().contains_key(index))
    }

    async fn create_index(&self, index: &str, alias: &str) -> Result<(), StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let mut indices = self.lock();
        if indices.contains_key(index) {
            return Err(StoreError::Rejected {
                operation: "create",
                index: index.to_string(),
                status: 400,
                body: "resource_already_exists_exception".to_string(),
            });
        }
        indices.insert(index.to_string(), vec![alias.to_string()]);
        Ok(())
    }
}
