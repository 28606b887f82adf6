//! Storage layer: document-store collaborator trait and typed repositories
//!
//! The pipeline consumes a remote document store addressed by collection name
//! and key. The store itself is out of scope; this module owns the trait seam
//! plus thin typed repositories that (de)serialize domain models through it.

pub mod automation;
pub mod bookings;
pub mod memory;
pub mod owners;
pub mod staff;
pub mod staff_tasks;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppResult;

pub use memory::InMemoryStore;

/// Document store collaborator.
///
/// `create` is expected to be a single-document write: it either lands the
/// whole document or fails. Backends with conditional-write support can use
/// it to close the duplicate-check race window documented on the ingestion
/// service; this core does not require that guarantee.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create(&self, collection: &str, id: &str, document: Value) -> AppResult<()>;

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>>;

    /// Replace the document stored under `id`.
    async fn update(&self, collection: &str, id: &str, document: Value) -> AppResult<()>;

    async fn query(&self, collection: &str, filter: &QueryFilter) -> AppResult<Vec<Value>>;
}

/// Conjunctive field-equality filter for store queries.
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    equals: Vec<(String, Value)>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.equals.push((name.into(), value.into()));
        self
    }

    /// Whether `document` satisfies every equality clause.
    pub fn matches(&self, document: &Value) -> bool {
        self.equals
            .iter()
            .all(|(name, value)| document.get(name) == Some(value))
    }
}

/// Aggregate of all typed repositories over one store.
#[derive(Clone)]
pub struct Repository {
    pub bookings: bookings::BookingsRepository,
    pub owners: owners::OwnersRepository,
    pub staff: staff::StaffRepository,
    pub staff_tasks: staff_tasks::StaffTasksRepository,
    pub automation: automation::AutomationRepository,
}

impl Repository {
    /// Create all typed repositories over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            bookings: bookings::BookingsRepository::new(store.clone()),
            owners: owners::OwnersRepository::new(store.clone()),
            staff: staff::StaffRepository::new(store.clone()),
            staff_tasks: staff_tasks::StaffTasksRepository::new(store.clone()),
            automation: automation::AutomationRepository::new(store),
        }
    }
}
