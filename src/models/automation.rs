//! Automation rule, audit log and orchestration result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declarative automation rule: every condition must hold (logical AND) for
/// the actions to fire. Consumed read-only by the evaluator, which writes
/// back only the execution counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub conditions: Vec<RuleCondition>,
    pub actions: Vec<RuleAction>,
    #[serde(default)]
    pub execution_count: u64,
    #[serde(default)]
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleCondition {
    /// Booking field the condition inspects, e.g. `property_name`, `price`.
    pub field: String,
    pub operator: RuleOperator,
    #[serde(default)]
    pub value: Value,
}

/// Condition operator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOperator {
    #[serde(rename = "exists")]
    Exists,
    #[serde(rename = ">=", alias = "gte")]
    Gte,
    #[serde(rename = "detected")]
    Detected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleAction {
    #[serde(rename = "type")]
    pub action_type: RuleActionType,
    #[serde(default)]
    pub config: Value,
}

/// Action dispatch tags. Unknown types deserialize to [`RuleActionType::Unknown`]
/// and are logged and skipped by the evaluator rather than rejected, so new
/// action kinds can roll out ahead of this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleActionType {
    MatchClient,
    NotifyOwner,
    FlagConflict,
    NotifyAdmin,
    #[serde(other)]
    Unknown,
}

/// Append-only audit record of one orchestrator run. Write-once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationLogEntry {
    pub id: String,
    pub booking_id: String,
    pub action: String,
    pub result: Value,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Orchestration results
// ---------------------------------------------------------------------------

/// Outcome of a single orchestrator step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Ok,
    Warning,
    Failed,
}

/// Per-step record accumulated into the final automation report.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: &'static str,
    pub status: StepStatus,
    pub elapsed_ms: u64,
    pub detail: Option<String>,
}

/// Structured result of `process_approved_booking`.
///
/// `success` reflects only whether the booking loaded and the step sequence
/// ran; individual step failures surface through `warnings` and the per-step
/// reports, by design.
#[derive(Debug, Clone, Serialize)]
pub struct AutomationResult {
    pub success: bool,
    pub status: String,
    pub automation_triggered: bool,
    pub financial_report_generated: bool,
    pub client_notified: bool,
    pub details: Map<String, Value>,
    pub steps: Vec<StepReport>,
    pub warnings: Vec<String>,
    pub error: Option<String>,
}

impl AutomationResult {
    pub fn failed(status: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            status: status.into(),
            automation_triggered: false,
            financial_report_generated: false,
            client_notified: false,
            details: Map::new(),
            steps: Vec::new(),
            warnings: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_action_types_deserialize_to_unknown() {
        let action: RuleAction =
            serde_json::from_value(serde_json::json!({ "type": "send_carrier_pigeon" })).unwrap();
        assert_eq!(action.action_type, RuleActionType::Unknown);
    }

    #[test]
    fn gte_operator_accepts_both_wire_names() {
        let a: RuleOperator = serde_json::from_str("\">=\"").unwrap();
        let b: RuleOperator = serde_json::from_str("\"gte\"").unwrap();
        assert_eq!(a, RuleOperator::Gte);
        assert_eq!(b, RuleOperator::Gte);
    }
}
