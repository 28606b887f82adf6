//! Booking model and ingestion request types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

use super::enums::{BookingStatus, MatchMethod};

/// A persisted booking document.
///
/// Created once by the ingestion path and mutated only through status
/// transitions and post-approval automation bookkeeping; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub guest_name: String,
    pub guest_email: String,
    /// Free text, exactly as supplied by the booking source.
    pub property_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub price: f64,
    pub currency: String,
    pub source: String,
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    /// Content-addressing key over guest/property/dates/price (not crypto).
    pub duplicate_check_hash: String,
    pub is_duplicate: bool,
    // Matching fields, written by the orchestrator
    pub client_id: Option<String>,
    pub property_id: Option<String>,
    pub match_confidence: Option<f64>,
    pub match_method: Option<MatchMethod>,
    // Automation bookkeeping, appended after approval
    pub staff_tasks_created: Option<bool>,
    #[serde(default)]
    pub staff_task_ids: Vec<String>,
    pub automation_completed: bool,
    pub admin_alert: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Build a fresh pending booking from a validated ingestion request.
    pub fn from_incoming(incoming: IncomingBooking, hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            guest_name: incoming.guest_name,
            guest_email: incoming.guest_email,
            property_name: incoming.property_name,
            check_in: incoming.check_in,
            check_out: incoming.check_out,
            price: incoming.price,
            currency: incoming.currency,
            source: incoming.source,
            special_requests: incoming.special_requests,
            status: BookingStatus::PendingApproval,
            duplicate_check_hash: hash,
            is_duplicate: false,
            client_id: None,
            property_id: None,
            match_confidence: None,
            match_method: None,
            staff_tasks_created: None,
            staff_task_ids: Vec::new(),
            automation_completed: false,
            admin_alert: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move the booking to `next`, enforcing the lifecycle state machine.
    pub fn transition(&mut self, next: BookingStatus) -> AppResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::Validation(format!(
                "Illegal booking transition {} -> {}",
                self.status, next
            )));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Raw booking payload from a third-party source, validated at the boundary.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_stay_dates"))]
pub struct IncomingBooking {
    #[validate(length(min = 1, message = "guest name must not be empty"))]
    pub guest_name: String,
    #[validate(email(message = "guest email must be a valid address"))]
    pub guest_email: String,
    #[validate(length(min = 1, message = "property name must not be empty"))]
    pub property_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(length(min = 1, message = "currency must not be empty"))]
    pub currency: String,
    #[validate(length(min = 1, message = "booking source must not be empty"))]
    pub source: String,
    pub special_requests: Option<String>,
}

fn validate_stay_dates(booking: &IncomingBooking) -> Result<(), ValidationError> {
    if booking.check_out <= booking.check_in {
        return Err(ValidationError::new("check_out_before_check_in"));
    }
    Ok(())
}

/// Outcome of an ingestion call.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReceipt {
    pub booking_id: String,
    /// True when an existing booking with the same content hash was found;
    /// in that case `booking_id` is the existing record's id and no write
    /// was performed.
    pub is_duplicate: bool,
    /// Number of failed write attempts before the successful one.
    pub retry_count: u32,
}
