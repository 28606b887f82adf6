//! Owner profile registry repository

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::owner::OwnerProfile,
};

use super::{DocumentStore, QueryFilter};

const COLLECTION: &str = "owner_profiles";

#[derive(Clone)]
pub struct OwnersRepository {
    store: Arc<dyn DocumentStore>,
}

impl OwnersRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Full registry scan in stable store order.
    ///
    /// The matching engine depends on this ordering for deterministic
    /// tie-breaks (first-seen wins); a paginated or indexed backend must
    /// preserve a stable iteration order.
    pub async fn list_profiles(&self) -> AppResult<Vec<OwnerProfile>> {
        let documents = self.store.query(COLLECTION, &QueryFilter::new()).await?;
        documents
            .into_iter()
            .map(|document| serde_json::from_value(document).map_err(AppError::from))
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<OwnerProfile> {
        let document = self
            .store
            .get(COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Owner profile {} not found", id)))?;
        Ok(serde_json::from_value(document)?)
    }

    pub async fn create(&self, profile: &OwnerProfile) -> AppResult<()> {
        let document = serde_json::to_value(profile)?;
        self.store.create(COLLECTION, &profile.id, document).await
    }
}
