//! Shared domain enums (wire names match the stored document format)

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AppError;

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

/// Booking lifecycle status
///
/// `pending_approval -> {approved, rejected} -> {completed, cancelled}`.
/// Transitions are validated in [`crate::models::booking::Booking::transition`];
/// unknown wire values are rejected at the ingestion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    PendingApproval,
    Approved,
    Rejected,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (PendingApproval, Approved)
                | (PendingApproval, Rejected)
                | (Approved, Completed)
                | (Approved, Cancelled)
                | (Rejected, Completed)
                | (Rejected, Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::PendingApproval => "pending_approval",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_approval" => Ok(BookingStatus::PendingApproval),
            "approved" => Ok(BookingStatus::Approved),
            "rejected" => Ok(BookingStatus::Rejected),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(AppError::Validation(format!(
                "Unknown booking status: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MatchMethod
// ---------------------------------------------------------------------------

/// Strategy that produced a property/owner match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    Fuzzy,
    AiSimilarity,
    EmailMatch,
}

impl MatchMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchMethod::Exact => "exact",
            MatchMethod::Fuzzy => "fuzzy",
            MatchMethod::AiSimilarity => "ai_similarity",
            MatchMethod::EmailMatch => "email_match",
        }
    }
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskType
// ---------------------------------------------------------------------------

/// Staff task classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Cleaning,
    Maintenance,
    CheckinPrep,
    CheckoutProcess,
    Inspection,
    Custom,
}

impl TaskType {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Cleaning => "cleaning",
            TaskType::Maintenance => "maintenance",
            TaskType::CheckinPrep => "checkin_prep",
            TaskType::CheckoutProcess => "checkout_process",
            TaskType::Inspection => "inspection",
            TaskType::Custom => "custom",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Staff task lifecycle status
///
/// `assigned -> confirmed -> in_progress -> {completed, cancelled}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Assigned,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, next),
            (Assigned, Confirmed)
                | (Assigned, Cancelled)
                | (Confirmed, InProgress)
                | (Confirmed, Cancelled)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
        )
    }
}

// ---------------------------------------------------------------------------
// TaskPriority
// ---------------------------------------------------------------------------

/// Staff task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

// ---------------------------------------------------------------------------
// StaffRole
// ---------------------------------------------------------------------------

/// Staff member role, controlling which task types may be assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Cleaner,
    Maintenance,
    Supervisor,
    Admin,
}

impl StaffRole {
    /// Task types members of this role may receive.
    pub fn allows(self, task_type: TaskType) -> bool {
        match self {
            StaffRole::Cleaner => matches!(
                task_type,
                TaskType::Cleaning
                    | TaskType::CheckinPrep
                    | TaskType::CheckoutProcess
                    | TaskType::Inspection
            ),
            StaffRole::Maintenance => {
                matches!(task_type, TaskType::Maintenance | TaskType::Inspection)
            }
            StaffRole::Supervisor | StaffRole::Admin => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_status_transitions() {
        assert!(BookingStatus::PendingApproval.can_transition_to(BookingStatus::Approved));
        assert!(BookingStatus::PendingApproval.can_transition_to(BookingStatus::Rejected));
        assert!(BookingStatus::Approved.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Approved.can_transition_to(BookingStatus::PendingApproval));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn booking_status_rejects_unknown_wire_values() {
        assert!("pending_approval".parse::<BookingStatus>().is_ok());
        assert!("on_hold".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn cleaner_role_excludes_maintenance() {
        assert!(StaffRole::Cleaner.allows(TaskType::Cleaning));
        assert!(StaffRole::Cleaner.allows(TaskType::Inspection));
        assert!(!StaffRole::Cleaner.allows(TaskType::Maintenance));
        assert!(StaffRole::Maintenance.allows(TaskType::Maintenance));
        assert!(!StaffRole::Maintenance.allows(TaskType::Cleaning));
        assert!(StaffRole::Supervisor.allows(TaskType::Custom));
    }

    #[test]
    fn enum_wire_names_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&MatchMethod::AiSimilarity).unwrap(),
            "\"ai_similarity\""
        );
        assert_eq!(
            serde_json::to_string(&TaskType::CheckinPrep).unwrap(),
            "\"checkin_prep\""
        );
        assert_eq!(
            serde_json::to_string(&BookingStatus::PendingApproval).unwrap(),
            "\"pending_approval\""
        );
    }
}
