//! In-memory document store
//!
//! Reference backend for tests and embedders that have no remote store.
//! Documents are JSON values keyed by collection name and id.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};

use super::{DocumentStore, QueryFilter};

#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn create(&self, collection: &str, id: &str, document: Value) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();
        if documents.contains_key(id) {
            return Err(AppError::Storage(format!(
                "Document {}/{} already exists",
                collection, id
            )));
        }
        documents.insert(id.to_string(), document);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    async fn update(&self, collection: &str, id: &str, document: Value) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        let documents = collections
            .get_mut(collection)
            .ok_or_else(|| AppError::NotFound(format!("Collection {} not found", collection)))?;
        if !documents.contains_key(id) {
            return Err(AppError::NotFound(format!(
                "Document {}/{} not found",
                collection, id
            )));
        }
        documents.insert(id.to_string(), document);
        Ok(())
    }

    async fn query(&self, collection: &str, filter: &QueryFilter) -> AppResult<Vec<Value>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|documents| {
                documents
                    .values()
                    .filter(|document| filter.matches(document))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_rejects_existing_id() {
        let store = InMemoryStore::new();
        store
            .create("bookings", "b1", json!({"guest_name": "A"}))
            .await
            .unwrap();
        let err = store
            .create("bookings", "b1", json!({"guest_name": "B"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn query_filters_on_field_equality() {
        let store = InMemoryStore::new();
        store
            .create("bookings", "b1", json!({"hash": "x1", "price": 100}))
            .await
            .unwrap();
        store
            .create("bookings", "b2", json!({"hash": "x2", "price": 100}))
            .await
            .unwrap();

        let hits = store
            .query("bookings", &QueryFilter::new().field("hash", "x2"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["hash"], "x2");

        let all = store.query("bookings", &QueryFilter::new()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn update_requires_existing_document() {
        let store = InMemoryStore::new();
        let err = store
            .update("bookings", "missing", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
