//! Staff task repository

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::staff_task::StaffTask,
};

use super::{DocumentStore, QueryFilter};

const COLLECTION: &str = "staff_tasks";

#[derive(Clone)]
pub struct StaffTasksRepository {
    store: Arc<dyn DocumentStore>,
}

impl StaffTasksRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, task: &StaffTask) -> AppResult<()> {
        let document = serde_json::to_value(task)?;
        self.store.create(COLLECTION, &task.id, document).await
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<StaffTask> {
        let document = self
            .store
            .get(COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Staff task {} not found", id)))?;
        Ok(serde_json::from_value(document)?)
    }

    pub async fn list_for_booking(&self, booking_id: &str) -> AppResult<Vec<StaffTask>> {
        let documents = self
            .store
            .query(COLLECTION, &QueryFilter::new().field("booking_id", booking_id))
            .await?;
        documents
            .into_iter()
            .map(|document| serde_json::from_value(document).map_err(AppError::from))
            .collect()
    }

    pub async fn save(&self, task: &StaffTask) -> AppResult<()> {
        let document = serde_json::to_value(task)?;
        self.store.update(COLLECTION, &task.id, document).await
    }
}
