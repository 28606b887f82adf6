//! Staff registry and property assignment repository

use std::sync::Arc;

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::owner::StaffMember,
};

use super::DocumentStore;

const MEMBERS: &str = "staff_members";
const ASSIGNMENTS: &str = "staff_assignments";

/// Stored property -> staff pool mapping, keyed by exact property name.
#[derive(Debug, Deserialize)]
struct StaffAssignment {
    staff_ids: Vec<String>,
}

#[derive(Clone)]
pub struct StaffRepository {
    store: Arc<dyn DocumentStore>,
}

impl StaffRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn get_member(&self, id: &str) -> AppResult<Option<StaffMember>> {
        self.store
            .get(MEMBERS, id)
            .await?
            .map(|document| serde_json::from_value(document).map_err(AppError::from))
            .transpose()
    }

    pub async fn create_member(&self, member: &StaffMember) -> AppResult<()> {
        let document = serde_json::to_value(member)?;
        self.store.create(MEMBERS, &member.id, document).await
    }

    /// Explicit staff pool for a property, if one has been configured.
    pub async fn assignment_for_property(
        &self,
        property_name: &str,
    ) -> AppResult<Option<Vec<String>>> {
        Ok(self
            .store
            .get(ASSIGNMENTS, property_name)
            .await?
            .map(|document| serde_json::from_value::<StaffAssignment>(document))
            .transpose()?
            .map(|assignment| assignment.staff_ids))
    }

    pub async fn set_assignment(&self, property_name: &str, staff_ids: &[String]) -> AppResult<()> {
        let document = serde_json::json!({ "staff_ids": staff_ids });
        self.store.create(ASSIGNMENTS, property_name, document).await
    }
}
