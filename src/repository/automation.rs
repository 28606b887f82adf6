//! Automation rules and audit log repository

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::automation::{AutomationLogEntry, AutomationRule},
};

use super::{DocumentStore, QueryFilter};

const RULES: &str = "automation_rules";
const LOGS: &str = "automation_logs";

#[derive(Clone)]
pub struct AutomationRepository {
    store: Arc<dyn DocumentStore>,
}

impl AutomationRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Enabled rules in stable store order. Empty when none are stored; the
    /// evaluator falls back to its built-in defaults in that case.
    pub async fn list_enabled_rules(&self) -> AppResult<Vec<AutomationRule>> {
        let documents = self
            .store
            .query(RULES, &QueryFilter::new().field("enabled", true))
            .await?;
        documents
            .into_iter()
            .map(|document| serde_json::from_value(document).map_err(AppError::from))
            .collect()
    }

    pub async fn create_rule(&self, rule: &AutomationRule) -> AppResult<()> {
        let document = serde_json::to_value(rule)?;
        self.store.create(RULES, &rule.id, document).await
    }

    /// Write back a rule's execution counters.
    pub async fn save_rule(&self, rule: &AutomationRule) -> AppResult<()> {
        let document = serde_json::to_value(rule)?;
        self.store.update(RULES, &rule.id, document).await
    }

    /// Append one audit entry. Entries are write-once, never mutated.
    pub async fn append_log(&self, entry: &AutomationLogEntry) -> AppResult<()> {
        let document = serde_json::to_value(entry)?;
        self.store.create(LOGS, &entry.id, document).await
    }

    pub async fn logs_for_booking(&self, booking_id: &str) -> AppResult<Vec<AutomationLogEntry>> {
        let documents = self
            .store
            .query(LOGS, &QueryFilter::new().field("booking_id", booking_id))
            .await?;
        documents
            .into_iter()
            .map(|document| serde_json::from_value(document).map_err(AppError::from))
            .collect()
    }
}
