//! In-memory DocumentStore implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::repository::{DocumentKey, DocumentStore, RepositoryError, Result};

/// Documents held in a map behind a lock.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<BTreeMap<DocumentKey, Value>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        let documents = self
            .documents
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(documents.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get(&self, key: &DocumentKey) -> Result<Option<Value>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(documents.get(key).cloned())
    }

    fn set(&self, key: DocumentKey, value: Value) -> Result<()> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        documents.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &DocumentKey) -> Result<()> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        documents.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<DocumentKey>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(documents.keys().cloned().collect())
    }

    fn clear(&self) -> Result<usize> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let removed = documents.len();
        documents.clear();
        Ok(removed)
    }
}
