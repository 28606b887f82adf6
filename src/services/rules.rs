//! Automation rule evaluator
//!
//! A small condition/action engine running independently over persisted
//! bookings to trigger secondary automations (client matching, conflict
//! flags, admin notifications) from declarative rule records.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::{
        automation::{AutomationRule, RuleAction, RuleActionType, RuleCondition, RuleOperator},
        booking::Booking,
    },
    repository::Repository,
    services::{
        matching::MatchingService,
        notifications::{
            NotificationCategory, NotificationChannel, NotificationMessage, NotificationPriority,
            NotificationSender,
        },
    },
};

const ADMIN_RECIPIENT: &str = "admin";

/// Virtual condition field resolved by probing for overlapping stays.
const DATE_CONFLICT_FIELD: &str = "date_conflict";

#[derive(Clone)]
pub struct RuleEvaluatorService {
    repository: Repository,
    matching: MatchingService,
    notifier: Arc<dyn NotificationSender>,
}

impl RuleEvaluatorService {
    pub fn new(
        repository: Repository,
        matching: MatchingService,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            repository,
            matching,
            notifier,
        }
    }

    /// Evaluate every enabled rule against one booking.
    ///
    /// Returns whether any rule fired. Falls back to the built-in default
    /// rules when none are stored. Action failures are logged and swallowed;
    /// counter persistence is best-effort.
    pub async fn evaluate(&self, booking_id: &str) -> AppResult<bool> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;
        let document = serde_json::to_value(&booking)?;

        let mut rules = self.repository.automation.list_enabled_rules().await?;
        let stored = !rules.is_empty();
        if !stored {
            rules = default_rules();
        }

        let mut any_fired = false;
        for rule in &mut rules {
            if !self.conditions_hold(&rule.conditions, &booking, &document).await? {
                continue;
            }
            tracing::info!(rule = %rule.name, booking_id = %booking.id, "Automation rule fired");

            for action in &rule.actions {
                self.execute_action(action, &booking).await;
            }

            any_fired = true;
            rule.execution_count += 1;
            if stored {
                if let Err(err) = self.repository.automation.save_rule(rule).await {
                    tracing::warn!(rule = %rule.id, error = %err, "Failed to persist rule counter");
                }
            }
        }
        Ok(any_fired)
    }

    /// Logical AND over the rule's conditions. A condition naming a field the
    /// booking document does not carry makes the whole rule false.
    async fn conditions_hold(
        &self,
        conditions: &[RuleCondition],
        booking: &Booking,
        document: &Value,
    ) -> AppResult<bool> {
        for condition in conditions {
            if !self.condition_holds(condition, booking, document).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn condition_holds(
        &self,
        condition: &RuleCondition,
        booking: &Booking,
        document: &Value,
    ) -> AppResult<bool> {
        if condition.operator == RuleOperator::Detected {
            if condition.field != DATE_CONFLICT_FIELD {
                return Ok(false);
            }
            let overlapping = self
                .repository
                .bookings
                .find_overlapping(
                    &booking.property_name,
                    booking.check_in,
                    booking.check_out,
                    &booking.id,
                )
                .await?;
            return Ok(!overlapping.is_empty());
        }

        let Some(value) = document.get(condition.field.as_str()) else {
            return Ok(false);
        };
        Ok(match condition.operator {
            RuleOperator::Exists => !value.is_null(),
            RuleOperator::Gte => match (value.as_f64(), condition.value.as_f64()) {
                (Some(actual), Some(expected)) => actual >= expected,
                _ => false,
            },
            RuleOperator::Detected => false,
        })
    }

    /// Dispatch one action. Failures are recorded as warnings, never
    /// propagated; unknown action types are skipped.
    async fn execute_action(&self, action: &RuleAction, booking: &Booking) {
        let outcome = match &action.action_type {
            RuleActionType::MatchClient => self.action_match_client(booking).await,
            RuleActionType::NotifyOwner => self.action_notify_owner(booking).await,
            RuleActionType::FlagConflict => self.action_flag_conflict(booking).await,
            RuleActionType::NotifyAdmin => {
                self.notify(
                    ADMIN_RECIPIENT,
                    NotificationCategory::AdminAlert,
                    "Booking needs attention",
                    booking,
                )
                .await
            }
            RuleActionType::Unknown => {
                tracing::warn!(booking_id = %booking.id, "Skipping unknown rule action type");
                Ok(())
            }
        };
        if let Err(err) = outcome {
            tracing::warn!(
                booking_id = %booking.id,
                action = ?action.action_type,
                error = %err,
                "Rule action failed"
            );
        }
    }

    async fn action_match_client(&self, booking: &Booking) -> AppResult<()> {
        if booking.client_id.is_some() {
            return Ok(());
        }
        let Some(matched) = self
            .matching
            .find_match(&booking.property_name, Some(&booking.guest_email))
            .await?
        else {
            return Ok(());
        };

        let mut booking = self.repository.bookings.get_by_id(&booking.id).await?;
        booking.client_id = Some(matched.owner_id);
        booking.property_id = matched.property_id;
        booking.match_confidence = Some(matched.confidence);
        booking.match_method = Some(matched.method);
        self.repository.bookings.save(&booking).await
    }

    async fn action_notify_owner(&self, booking: &Booking) -> AppResult<()> {
        let Some(owner_id) = booking.client_id.as_deref() else {
            tracing::debug!(booking_id = %booking.id, "No owner assigned, skipping owner notification");
            return Ok(());
        };
        self.notify(
            owner_id,
            NotificationCategory::OwnerUpdate,
            "Booking update",
            booking,
        )
        .await
    }

    async fn action_flag_conflict(&self, booking: &Booking) -> AppResult<()> {
        let overlapping = self
            .repository
            .bookings
            .find_overlapping(
                &booking.property_name,
                booking.check_in,
                booking.check_out,
                &booking.id,
            )
            .await?;
        if overlapping.is_empty() {
            return Ok(());
        }

        let mut booking = self.repository.bookings.get_by_id(&booking.id).await?;
        booking.admin_alert = Some(format!(
            "Date conflict with {} other booking(s) for '{}'",
            overlapping.len(),
            booking.property_name
        ));
        self.repository.bookings.save(&booking).await?;

        self.notify(
            ADMIN_RECIPIENT,
            NotificationCategory::ConflictDetected,
            "Booking date conflict detected",
            &booking,
        )
        .await
    }

    async fn notify(
        &self,
        recipient: &str,
        category: NotificationCategory,
        title: &str,
        booking: &Booking,
    ) -> AppResult<()> {
        self.notifier
            .send(NotificationMessage {
                recipient_id: recipient.to_string(),
                category,
                title: title.to_string(),
                message: format!(
                    "Booking {} at {} ({} to {})",
                    booking.id, booking.property_name, booking.check_in, booking.check_out
                ),
                data: json!({ "booking_id": booking.id }),
                priority: NotificationPriority::High,
                channels: vec![NotificationChannel::Push, NotificationChannel::InApp],
            })
            .await?;
        Ok(())
    }
}

/// Built-in rules used when the store holds none.
pub fn default_rules() -> Vec<AutomationRule> {
    vec![
        AutomationRule {
            id: "rule_smart_client_matching".to_string(),
            name: "Smart client matching".to_string(),
            enabled: true,
            conditions: vec![RuleCondition {
                field: "property_name".to_string(),
                operator: RuleOperator::Exists,
                value: Value::Null,
            }],
            actions: vec![RuleAction {
                action_type: RuleActionType::MatchClient,
                config: Value::Null,
            }],
            execution_count: 0,
            success_rate: 0.0,
        },
        AutomationRule {
            id: "rule_conflict_detection".to_string(),
            name: "Conflict detection".to_string(),
            enabled: true,
            conditions: vec![RuleCondition {
                field: DATE_CONFLICT_FIELD.to_string(),
                operator: RuleOperator::Detected,
                value: Value::Null,
            }],
            actions: vec![
                RuleAction {
                    action_type: RuleActionType::FlagConflict,
                    config: Value::Null,
                },
                RuleAction {
                    action_type: RuleActionType::NotifyAdmin,
                    config: Value::Null,
                },
            ],
            execution_count: 0,
            success_rate: 0.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::{
        config::{IngestionConfig, MatchingConfig},
        models::{
            booking::IncomingBooking,
            enums::MatchMethod,
            owner::{OwnerProfile, Property},
        },
        repository::InMemoryStore,
        services::{
            ingestion::IngestionService,
            notifications::{MockNotificationSender, NotificationOutcome},
        },
    };

    fn incoming(property: &str, check_in: (i32, u32, u32), check_out: (i32, u32, u32)) -> IncomingBooking {
        IncomingBooking {
            guest_name: "A. Smith".to_string(),
            guest_email: "a.smith@guests.test".to_string(),
            property_name: property.to_string(),
            check_in: NaiveDate::from_ymd_opt(check_in.0, check_in.1, check_in.2).unwrap(),
            check_out: NaiveDate::from_ymd_opt(check_out.0, check_out.1, check_out.2).unwrap(),
            price: 2000.0,
            currency: "EUR".to_string(),
            source: "airbnb".to_string(),
            special_requests: None,
        }
    }

    async fn ingest(repository: &Repository, booking: IncomingBooking) -> String {
        IngestionService::new(repository.bookings.clone(), IngestionConfig::default())
            .create_booking(booking)
            .await
            .unwrap()
            .booking_id
    }

    fn evaluator(repository: &Repository, notifier: MockNotificationSender) -> RuleEvaluatorService {
        RuleEvaluatorService::new(
            repository.clone(),
            MatchingService::new(repository.owners.clone(), MatchingConfig::default()),
            Arc::new(notifier),
        )
    }

    async fn seed_owner(repository: &Repository) {
        repository
            .owners
            .create(&OwnerProfile {
                id: "owner_1".to_string(),
                name: "Pat Doe".to_string(),
                email: "pat@owners.test".to_string(),
                properties: vec![Property {
                    id: "prop_1".to_string(),
                    name: "Sunset Villa".to_string(),
                    address: None,
                    attributes: Default::default(),
                }],
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn default_matching_rule_assigns_client() {
        let repository = Repository::new(Arc::new(InMemoryStore::new()));
        seed_owner(&repository).await;
        let booking_id = ingest(&repository, incoming("Sunset Villa", (2025, 3, 1), (2025, 3, 5))).await;

        let fired = evaluator(&repository, MockNotificationSender::new())
            .evaluate(&booking_id)
            .await
            .unwrap();
        assert!(fired);

        let booking = repository.bookings.get_by_id(&booking_id).await.unwrap();
        assert_eq!(booking.client_id.as_deref(), Some("owner_1"));
        assert_eq!(booking.match_method, Some(MatchMethod::Exact));
    }

    #[tokio::test]
    async fn conflict_rule_flags_overlapping_stays() {
        let repository = Repository::new(Arc::new(InMemoryStore::new()));
        seed_owner(&repository).await;
        let first = ingest(&repository, incoming("Sunset Villa", (2025, 3, 1), (2025, 3, 5))).await;
        let _second =
            ingest(&repository, incoming("Sunset Villa", (2025, 3, 4), (2025, 3, 8))).await;

        let mut notifier = MockNotificationSender::new();
        notifier
            .expect_send()
            .withf(|message| message.category == NotificationCategory::ConflictDetected)
            .times(1)
            .returning(|_| Ok(NotificationOutcome::delivered()));
        notifier
            .expect_send()
            .withf(|message| message.category == NotificationCategory::AdminAlert)
            .times(1)
            .returning(|_| Ok(NotificationOutcome::delivered()));

        let fired = evaluator(&repository, notifier).evaluate(&first).await.unwrap();
        assert!(fired);

        let booking = repository.bookings.get_by_id(&first).await.unwrap();
        assert!(booking.admin_alert.as_deref().unwrap_or("").contains("Date conflict"));
    }

    #[tokio::test]
    async fn non_overlapping_stays_do_not_trigger_conflict() {
        let repository = Repository::new(Arc::new(InMemoryStore::new()));
        seed_owner(&repository).await;
        let first = ingest(&repository, incoming("Sunset Villa", (2025, 3, 1), (2025, 3, 5))).await;
        let _second =
            ingest(&repository, incoming("Sunset Villa", (2025, 3, 5), (2025, 3, 9))).await;

        // Only the matching rule fires; no conflict notifications expected.
        let fired = evaluator(&repository, MockNotificationSender::new())
            .evaluate(&first)
            .await
            .unwrap();
        assert!(fired);
        let booking = repository.bookings.get_by_id(&first).await.unwrap();
        assert!(booking.admin_alert.is_none());
    }

    #[tokio::test]
    async fn unknown_condition_field_disables_rule() {
        let repository = Repository::new(Arc::new(InMemoryStore::new()));
        let booking_id = ingest(&repository, incoming("Sunset Villa", (2025, 3, 1), (2025, 3, 5))).await;

        repository
            .automation
            .create_rule(&AutomationRule {
                id: "rule_custom".to_string(),
                name: "Custom".to_string(),
                enabled: true,
                conditions: vec![RuleCondition {
                    field: "loyalty_tier".to_string(),
                    operator: RuleOperator::Exists,
                    value: Value::Null,
                }],
                actions: vec![RuleAction {
                    action_type: RuleActionType::NotifyAdmin,
                    config: Value::Null,
                }],
                execution_count: 0,
                success_rate: 0.0,
            })
            .await
            .unwrap();

        let fired = evaluator(&repository, MockNotificationSender::new())
            .evaluate(&booking_id)
            .await
            .unwrap();
        assert!(!fired);
    }

    #[tokio::test]
    async fn gte_condition_compares_price() {
        let repository = Repository::new(Arc::new(InMemoryStore::new()));
        let booking_id = ingest(&repository, incoming("Sunset Villa", (2025, 3, 1), (2025, 3, 5))).await;

        repository
            .automation
            .create_rule(&AutomationRule {
                id: "rule_high_value".to_string(),
                name: "High value".to_string(),
                enabled: true,
                conditions: vec![RuleCondition {
                    field: "price".to_string(),
                    operator: RuleOperator::Gte,
                    value: serde_json::json!(1500.0),
                }],
                actions: vec![RuleAction {
                    action_type: RuleActionType::Unknown,
                    config: Value::Null,
                }],
                execution_count: 0,
                success_rate: 0.0,
            })
            .await
            .unwrap();

        // Fires (2000 >= 1500) and skips its unknown action without error.
        let fired = evaluator(&repository, MockNotificationSender::new())
            .evaluate(&booking_id)
            .await
            .unwrap();
        assert!(fired);

        let rules = repository.automation.list_enabled_rules().await.unwrap();
        assert_eq!(rules[0].execution_count, 1);
    }
}
