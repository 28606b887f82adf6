//! Notification collaborator contract
//!
//! The pipeline never talks to push/email/SMS providers directly; it hands a
//! structured message to this collaborator and records the reported outcome.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppResult;

/// Delivery channels a message may be fanned out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    Push,
    Email,
    Sms,
    InApp,
}

/// Message category, used by the collaborator for routing and templating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    BookingApproved,
    BookingRejected,
    OwnerUpdate,
    ConflictDetected,
    AdminAlert,
}

/// Priority hint forwarded to the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Normal,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationMessage {
    pub recipient_id: String,
    pub category: NotificationCategory,
    pub title: String,
    pub message: String,
    pub data: Value,
    pub priority: NotificationPriority,
    pub channels: Vec<NotificationChannel>,
}

/// Per-send outcome as reported by the collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationOutcome {
    pub success: bool,
    /// Channels the collaborator failed to deliver on.
    pub failed_channels: Vec<NotificationChannel>,
    pub error: Option<String>,
}

impl NotificationOutcome {
    pub fn delivered() -> Self {
        Self {
            success: true,
            failed_channels: Vec::new(),
            error: None,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, message: NotificationMessage) -> AppResult<NotificationOutcome>;
}
