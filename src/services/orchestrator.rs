//! Approval automation orchestrator
//!
//! Runs the post-approval pipeline as an ordered sequence of steps: property
//! match, financial delta, audit log, client notification. Failing to load
//! the booking is the only fatal outcome; every other step failure degrades
//! to a warning inside the structured result so partial completion stays
//! visible without aborting the run. That best-effort behaviour is business
//! policy, not an accident.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        automation::{AutomationLogEntry, AutomationResult, StepReport, StepStatus},
        booking::Booking,
        enums::BookingStatus,
        staff_task::TaskBatchOutcome,
    },
    repository::Repository,
    services::{
        financial::FinancialReporting,
        matching::MatchingService,
        notifications::{
            NotificationCategory, NotificationChannel, NotificationMessage, NotificationPriority,
            NotificationSender,
        },
        tasks::TaskGeneratorService,
    },
};

const ADMIN_RECIPIENT: &str = "admin";

#[derive(Clone)]
pub struct OrchestratorService {
    repository: Repository,
    matching: MatchingService,
    tasks: TaskGeneratorService,
    notifier: Arc<dyn NotificationSender>,
    financial: Arc<dyn FinancialReporting>,
}

impl OrchestratorService {
    pub fn new(
        repository: Repository,
        matching: MatchingService,
        tasks: TaskGeneratorService,
        notifier: Arc<dyn NotificationSender>,
        financial: Arc<dyn FinancialReporting>,
    ) -> Self {
        Self {
            repository,
            matching,
            tasks,
            notifier,
            financial,
        }
    }

    /// Run the approval automation for one booking.
    ///
    /// Returns `success=false` only when the booking cannot be loaded or is
    /// not in an approvable state; step failures are recorded as warnings and
    /// per-step reports while the pipeline keeps going.
    pub async fn process_approved_booking(&self, booking_id: &str) -> AppResult<AutomationResult> {
        let mut booking = match self.repository.bookings.get_by_id(booking_id).await {
            Ok(booking) => booking,
            Err(err) => {
                tracing::error!(booking_id = %booking_id, error = %err, "Booking load failed");
                return Ok(AutomationResult::failed("booking_not_found", err.to_string()));
            }
        };

        if booking.status == BookingStatus::PendingApproval {
            booking.transition(BookingStatus::Approved)?;
        } else if booking.status != BookingStatus::Approved {
            return Ok(AutomationResult::failed(
                booking.status.as_str(),
                format!("Booking {} is not approvable from {}", booking.id, booking.status),
            ));
        }

        let mut result = AutomationResult {
            success: true,
            status: BookingStatus::Approved.as_str().to_string(),
            automation_triggered: true,
            financial_report_generated: false,
            client_notified: false,
            details: serde_json::Map::new(),
            steps: Vec::new(),
            warnings: Vec::new(),
            error: None,
        };

        self.step_property_match(&mut booking, &mut result).await;
        self.step_financials(&booking, &mut result).await;
        self.step_audit_log(&booking, &mut result).await;
        self.step_notification(&booking, &mut result).await;

        booking.automation_completed = true;
        if let Err(err) = self.repository.bookings.save(&booking).await {
            result
                .warnings
                .push(format!("Failed to persist automation bookkeeping: {}", err));
        }

        tracing::info!(
            booking_id = %booking.id,
            warnings = result.warnings.len(),
            financial = result.financial_report_generated,
            notified = result.client_notified,
            "Approval automation complete"
        );
        Ok(result)
    }

    /// Rejection path: a status transition plus an audit entry, nothing else.
    pub async fn process_rejected_booking(
        &self,
        booking_id: &str,
        reason: &str,
    ) -> AppResult<AutomationResult> {
        let mut booking = match self.repository.bookings.get_by_id(booking_id).await {
            Ok(booking) => booking,
            Err(err) => {
                return Ok(AutomationResult::failed("booking_not_found", err.to_string()));
            }
        };
        booking.transition(BookingStatus::Rejected)?;
        self.repository.bookings.save(&booking).await?;

        let entry = AutomationLogEntry {
            id: Uuid::new_v4().to_string(),
            booking_id: booking.id.clone(),
            action: "booking_rejected".to_string(),
            result: json!({ "reason": reason }),
            timestamp: Utc::now(),
        };
        if let Err(err) = self.repository.automation.append_log(&entry).await {
            tracing::warn!(booking_id = %booking.id, error = %err, "Audit log write failed");
        }

        Ok(AutomationResult {
            success: true,
            status: BookingStatus::Rejected.as_str().to_string(),
            automation_triggered: false,
            financial_report_generated: false,
            client_notified: false,
            details: serde_json::Map::new(),
            steps: Vec::new(),
            warnings: Vec::new(),
            error: None,
        })
    }

    /// Separate call path for step 5: expand the booking into staff tasks
    /// and record the outcome on the booking document either way.
    pub async fn run_task_automation(&self, booking_id: &str) -> AppResult<TaskBatchOutcome> {
        let mut booking = self.repository.bookings.get_by_id(booking_id).await?;
        let outcome = match self.tasks.create_tasks_for_booking(&booking).await {
            Ok(outcome) => outcome,
            Err(err) => {
                // Registry reads failed before any task write; the booking
                // still records the failed run.
                booking.staff_tasks_created = Some(false);
                booking.admin_alert = Some(format!("Staff task creation failed: {}", err));
                if let Err(save_err) = self.repository.bookings.save(&booking).await {
                    tracing::warn!(
                        booking_id = %booking.id,
                        error = %save_err,
                        "Task bookkeeping write failed"
                    );
                }
                return Err(err);
            }
        };

        booking.staff_tasks_created = Some(outcome.success);
        if outcome.success {
            booking.staff_task_ids = outcome.task_ids.clone();
        } else {
            booking.admin_alert = Some(format!(
                "Staff task creation failed: {}",
                outcome.error.as_deref().unwrap_or("unknown error")
            ));
        }
        if let Err(err) = self.repository.bookings.save(&booking).await {
            tracing::warn!(booking_id = %booking.id, error = %err, "Task bookkeeping write failed");
        }
        Ok(outcome)
    }

    async fn step_property_match(&self, booking: &mut Booking, result: &mut AutomationResult) {
        let started = Instant::now();
        match self
            .matching
            .find_match(&booking.property_name, Some(&booking.guest_email))
            .await
        {
            Ok(Some(matched)) => {
                booking.client_id = Some(matched.owner_id.clone());
                booking.property_id = matched.property_id.clone();
                booking.match_confidence = Some(matched.confidence);
                booking.match_method = Some(matched.method);
                result.details.insert(
                    "property_match".to_string(),
                    json!({
                        "owner_id": matched.owner_id,
                        "property_id": matched.property_id,
                        "confidence": matched.confidence,
                        "method": matched.method.as_str(),
                    }),
                );
                finish_step(result, "property_match", started, StepStatus::Ok, None);
            }
            Ok(None) => {
                booking.admin_alert =
                    Some(format!("No owner match for property '{}'", booking.property_name));
                result.details.insert("property_match".to_string(), Value::Null);
                result
                    .warnings
                    .push("No owner match found; booking left unassigned".to_string());
                finish_step(
                    result,
                    "property_match",
                    started,
                    StepStatus::Warning,
                    Some("no match".to_string()),
                );
            }
            Err(err) => {
                booking.admin_alert = Some(format!("Property matching failed: {}", err));
                result.warnings.push(format!("Property matching failed: {}", err));
                finish_step(
                    result,
                    "property_match",
                    started,
                    StepStatus::Failed,
                    Some(err.to_string()),
                );
            }
        }
    }

    async fn step_financials(&self, booking: &Booking, result: &mut AutomationResult) {
        let started = Instant::now();
        match self
            .financial
            .process_booking_financials(booking, booking.client_id.as_deref())
            .await
        {
            Ok(outcome) if outcome.success => {
                result.financial_report_generated = true;
                if let Some(report_id) = &outcome.report_id {
                    result
                        .details
                        .insert("financial_report_id".to_string(), json!(report_id));
                }
                finish_step(result, "financials", started, StepStatus::Ok, None);
            }
            Ok(outcome) => {
                let detail = outcome.error.unwrap_or_else(|| "unspecified failure".to_string());
                result
                    .warnings
                    .push(format!("Financial report not generated: {}", detail));
                finish_step(result, "financials", started, StepStatus::Warning, Some(detail));
            }
            Err(err) => {
                result
                    .warnings
                    .push(format!("Financial reporting failed: {}", err));
                finish_step(
                    result,
                    "financials",
                    started,
                    StepStatus::Failed,
                    Some(err.to_string()),
                );
            }
        }
    }

    /// Best-effort audit write; a failure is logged and swallowed.
    async fn step_audit_log(&self, booking: &Booking, result: &mut AutomationResult) {
        let started = Instant::now();
        let entry = AutomationLogEntry {
            id: Uuid::new_v4().to_string(),
            booking_id: booking.id.clone(),
            action: "booking_approved".to_string(),
            result: json!({
                "details": result.details.clone(),
                "warnings": result.warnings.clone(),
            }),
            timestamp: Utc::now(),
        };
        match self.repository.automation.append_log(&entry).await {
            Ok(()) => finish_step(result, "audit_log", started, StepStatus::Ok, None),
            Err(err) => {
                tracing::warn!(booking_id = %booking.id, error = %err, "Audit log write failed");
                finish_step(
                    result,
                    "audit_log",
                    started,
                    StepStatus::Warning,
                    Some(err.to_string()),
                );
            }
        }
    }

    async fn step_notification(&self, booking: &Booking, result: &mut AutomationResult) {
        let started = Instant::now();
        let recipient = booking
            .client_id
            .clone()
            .unwrap_or_else(|| ADMIN_RECIPIENT.to_string());
        let message = NotificationMessage {
            recipient_id: recipient,
            category: NotificationCategory::BookingApproved,
            title: "Booking approved".to_string(),
            message: format!(
                "Booking for {} at {} ({} to {}) was approved",
                booking.guest_name, booking.property_name, booking.check_in, booking.check_out
            ),
            data: json!({
                "booking_id": booking.id,
                "property_name": booking.property_name,
                "price": booking.price,
                "currency": booking.currency,
            }),
            priority: NotificationPriority::Normal,
            channels: vec![NotificationChannel::Push, NotificationChannel::Email],
        };

        match self.notifier.send(message).await {
            Ok(outcome) if outcome.success => {
                result.client_notified = true;
                finish_step(result, "notification", started, StepStatus::Ok, None);
            }
            Ok(outcome) => {
                let detail = outcome
                    .error
                    .unwrap_or_else(|| format!("failed channels: {:?}", outcome.failed_channels));
                result
                    .warnings
                    .push(format!("Client notification incomplete: {}", detail));
                finish_step(
                    result,
                    "notification",
                    started,
                    StepStatus::Warning,
                    Some(detail),
                );
            }
            Err(err) => {
                result.warnings.push(format!("Notification dispatch failed: {}", err));
                finish_step(
                    result,
                    "notification",
                    started,
                    StepStatus::Failed,
                    Some(err.to_string()),
                );
            }
        }
    }
}

fn finish_step(
    result: &mut AutomationResult,
    step: &'static str,
    started: Instant,
    status: StepStatus,
    detail: Option<String>,
) {
    let elapsed_ms = started.elapsed().as_millis() as u64;
    tracing::info!(step = step, status = ?status, elapsed_ms = elapsed_ms, "Pipeline step finished");
    result.steps.push(StepReport {
        step,
        status,
        elapsed_ms,
        detail,
    });
}
