//! End-to-end pipeline tests
//!
//! Exercises the public surface the way an upstream webhook handler would:
//! ingest, approve, task automation and rule evaluation over the in-memory
//! store with recording collaborator fakes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use villaflow::{
    config::AppConfig,
    error::AppResult,
    models::{
        booking::IncomingBooking,
        enums::{BookingStatus, MatchMethod, StaffRole, TaskType},
        owner::{OwnerProfile, Property, StaffMember},
    },
    repository::{InMemoryStore, Repository},
    services::{
        financial::{FinancialOutcome, FinancialReporting},
        notifications::{NotificationMessage, NotificationOutcome, NotificationSender},
        Services,
    },
};

#[derive(Default)]
struct RecordingNotifier {
    fail: bool,
    sent: Mutex<Vec<NotificationMessage>>,
}

impl RecordingNotifier {
    fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn send(&self, message: NotificationMessage) -> AppResult<NotificationOutcome> {
        self.sent.lock().await.push(message);
        if self.fail {
            Ok(NotificationOutcome {
                success: false,
                failed_channels: Vec::new(),
                error: Some("provider unreachable".to_string()),
            })
        } else {
            Ok(NotificationOutcome::delivered())
        }
    }
}

#[derive(Default)]
struct RecordingFinancial {
    calls: Mutex<Vec<Option<String>>>,
}

#[async_trait]
impl FinancialReporting for RecordingFinancial {
    async fn process_booking_financials<'a>(
        &self,
        _booking: &villaflow::models::booking::Booking,
        owner_id: Option<&'a str>,
    ) -> AppResult<FinancialOutcome> {
        self.calls.lock().await.push(owner_id.map(|id| id.to_string()));
        Ok(FinancialOutcome {
            success: true,
            report_id: Some("report_e2e".to_string()),
            error: None,
        })
    }
}

fn sunset_villa_booking() -> IncomingBooking {
    IncomingBooking {
        guest_name: "A. Smith".to_string(),
        guest_email: "a.smith@guests.test".to_string(),
        property_name: "Sunset Villa".to_string(),
        check_in: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        check_out: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
        price: 2000.0,
        currency: "EUR".to_string(),
        source: "booking.com".to_string(),
        special_requests: None,
    }
}

async fn seed_registry(repository: &Repository) {
    repository
        .owners
        .create(&OwnerProfile {
            id: "owner_1".to_string(),
            name: "Pat Doe".to_string(),
            email: "pat@owners.test".to_string(),
            properties: vec![Property {
                id: "prop_1".to_string(),
                name: "Sunset Villa".to_string(),
                address: Some("1 Shore Road".to_string()),
                attributes: Default::default(),
            }],
        })
        .await
        .unwrap();
    repository
        .staff
        .create_member(&StaffMember {
            id: "staff_001".to_string(),
            name: "Casey Lee".to_string(),
            email: "casey@staff.test".to_string(),
            role: StaffRole::Supervisor,
        })
        .await
        .unwrap();
    repository
        .staff
        .create_member(&StaffMember {
            id: "staff_002".to_string(),
            name: "Robin Ray".to_string(),
            email: "robin@staff.test".to_string(),
            role: StaffRole::Cleaner,
        })
        .await
        .unwrap();
}

fn build_services(
    repository: &Repository,
    notifier: Arc<RecordingNotifier>,
    financial: Arc<RecordingFinancial>,
) -> Services {
    Services::new(
        repository.clone(),
        &AppConfig::default(),
        notifier,
        financial,
    )
}

#[tokio::test]
async fn full_booking_lifecycle() {
    let store = Arc::new(InMemoryStore::new());
    let repository = Repository::new(store.clone());
    seed_registry(&repository).await;

    let notifier = Arc::new(RecordingNotifier::default());
    let financial = Arc::new(RecordingFinancial::default());
    let services = build_services(&repository, notifier.clone(), financial.clone());

    // Ingest twice: the second delivery is recognised as a duplicate.
    let first = services
        .ingestion
        .create_booking(sunset_villa_booking())
        .await
        .unwrap();
    assert!(!first.is_duplicate);
    assert_eq!(first.retry_count, 0);

    let second = services
        .ingestion
        .create_booking(sunset_villa_booking())
        .await
        .unwrap();
    assert!(second.is_duplicate);
    assert_eq!(second.booking_id, first.booking_id);
    assert_eq!(store.count("bookings").await, 1);

    // Approve: exact match against the seeded registry.
    let result = services
        .orchestrator
        .process_approved_booking(&first.booking_id)
        .await
        .unwrap();
    assert!(result.success);
    assert!(result.financial_report_generated);
    assert!(result.client_notified);
    assert!(result.warnings.is_empty());

    let booking = repository.bookings.get_by_id(&first.booking_id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Approved);
    assert_eq!(booking.client_id.as_deref(), Some("owner_1"));
    assert_eq!(booking.property_id.as_deref(), Some("prop_1"));
    assert_eq!(booking.match_method, Some(MatchMethod::Exact));
    assert_eq!(booking.match_confidence, Some(1.0));

    // Financial delta was scoped to the matched owner.
    let financial_calls = financial.calls.lock().await;
    assert_eq!(financial_calls.len(), 1);
    assert_eq!(financial_calls[0].as_deref(), Some("owner_1"));
    drop(financial_calls);

    // Task automation: standard template set, scheduled off the check-in day.
    let outcome = services
        .orchestrator
        .run_task_automation(&first.booking_id)
        .await
        .unwrap();
    assert!(outcome.success);

    let tasks = repository
        .staff_tasks
        .list_for_booking(&first.booking_id)
        .await
        .unwrap();
    assert_eq!(tasks.len(), outcome.task_ids.len());
    // Supervisor gets all four standard entries, cleaner gets all four too;
    // no luxury or maintenance entries for a 2000 EUR booking.
    assert_eq!(tasks.len(), 8);
    assert!(tasks.iter().all(|t| t.task_type != TaskType::Maintenance));
    assert!(tasks.iter().all(|t| t.auto_created));

    let feb_28 = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
    let mar_1 = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    for task in &tasks {
        match task.task_type {
            TaskType::Cleaning => assert_eq!(task.scheduled_date, feb_28),
            _ => assert_eq!(task.scheduled_date, mar_1),
        }
        assert_eq!(task.deadline.to_rfc3339(), "2025-02-28T22:00:00+00:00");
    }

    let booking = repository.bookings.get_by_id(&first.booking_id).await.unwrap();
    assert_eq!(booking.staff_tasks_created, Some(true));
    assert_eq!(booking.staff_task_ids.len(), 8);

    // One approval audit entry was appended.
    let logs = repository
        .automation
        .logs_for_booking(&first.booking_id)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "booking_approved");
}

#[tokio::test]
async fn notification_failure_keeps_pipeline_successful() {
    let store = Arc::new(InMemoryStore::new());
    let repository = Repository::new(store);
    seed_registry(&repository).await;

    let notifier = Arc::new(RecordingNotifier::failing());
    let financial = Arc::new(RecordingFinancial::default());
    let services = build_services(&repository, notifier.clone(), financial);

    let receipt = services
        .ingestion
        .create_booking(sunset_villa_booking())
        .await
        .unwrap();
    let result = services
        .orchestrator
        .process_approved_booking(&receipt.booking_id)
        .await
        .unwrap();

    assert!(result.success);
    assert!(result.financial_report_generated);
    assert!(!result.client_notified);
    assert!(result
        .warnings
        .iter()
        .any(|warning| warning.contains("provider unreachable")));
    assert_eq!(notifier.sent.lock().await.len(), 1);
}

#[tokio::test]
async fn rule_evaluation_matches_client_independently() {
    let store = Arc::new(InMemoryStore::new());
    let repository = Repository::new(store);
    seed_registry(&repository).await;

    let notifier = Arc::new(RecordingNotifier::default());
    let services = build_services(&repository, notifier, Arc::new(RecordingFinancial::default()));

    let receipt = services
        .ingestion
        .create_booking(sunset_villa_booking())
        .await
        .unwrap();

    // No approval has run; the standalone rule evaluator still assigns the
    // owner through the default smart-matching rule.
    let fired = services.rules.evaluate(&receipt.booking_id).await.unwrap();
    assert!(fired);

    let booking = repository.bookings.get_by_id(&receipt.booking_id).await.unwrap();
    assert_eq!(booking.client_id.as_deref(), Some("owner_1"));
    assert_eq!(booking.status, BookingStatus::PendingApproval);
}
