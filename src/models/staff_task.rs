//! Staff task model and task templates

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::enums::{TaskPriority, TaskStatus, TaskType};

/// One unit of staff work derived from a booking and a template entry.
///
/// Bulk-created by the task generator right after approval; afterwards only
/// the status moves, the document is never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffTask {
    pub id: String,
    pub booking_id: String,
    pub staff_id: String,
    pub staff_name: String,
    pub staff_email: String,
    pub task_type: TaskType,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub estimated_duration_minutes: u32,
    pub status: TaskStatus,
    pub scheduled_date: NaiveDate,
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub required_supplies: Vec<String>,
    pub special_instructions: Option<String>,
    pub auto_created: bool,
    pub automation_rule_id: String,
    pub created_at: DateTime<Utc>,
}

impl StaffTask {
    /// Move the task to `next`, enforcing the lifecycle state machine.
    pub fn transition(&mut self, next: TaskStatus) -> AppResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::Validation(format!(
                "Illegal task transition {:?} -> {:?}",
                self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }
}

/// One entry of a task template set.
#[derive(Debug, Clone)]
pub struct TaskTemplate {
    pub task_type: TaskType,
    pub title: &'static str,
    pub description: &'static str,
    pub priority: TaskPriority,
    pub estimated_duration_minutes: u32,
    pub required_supplies: &'static [&'static str],
}

/// Outcome of a bulk task creation for one booking.
///
/// Creation is non-transactional and at-least-once: a failed write does not
/// roll back sibling tasks, so `task_ids` lists everything that was created
/// even when `success` is false.
#[derive(Debug, Clone, Serialize)]
pub struct TaskBatchOutcome {
    pub success: bool,
    pub task_ids: Vec<String>,
    pub error: Option<String>,
}
