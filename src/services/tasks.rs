//! Staff task generator
//!
//! Expands an approved booking into scheduled staff tasks: a template set is
//! picked from the booking's value and special requests, a staff pool is
//! resolved for the property, and one task is created per staff member and
//! role-compatible template entry.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::{
    config::TasksConfig,
    error::AppResult,
    models::{
        booking::Booking,
        enums::{TaskPriority, TaskStatus, TaskType},
        owner::StaffMember,
        staff_task::{StaffTask, TaskBatchOutcome, TaskTemplate},
    },
    repository::{staff::StaffRepository, staff_tasks::StaffTasksRepository},
};

static STANDARD_CHECKIN: [TaskTemplate; 4] = [
    TaskTemplate {
        task_type: TaskType::Cleaning,
        title: "Pre-arrival cleaning",
        description: "Full clean of all rooms, fresh linen and towels",
        priority: TaskPriority::High,
        estimated_duration_minutes: 180,
        required_supplies: &["cleaning kit", "fresh linen", "towels"],
    },
    TaskTemplate {
        task_type: TaskType::CheckinPrep,
        title: "Check-in preparation",
        description: "Welcome pack, key handover setup, thermostat and lights",
        priority: TaskPriority::Medium,
        estimated_duration_minutes: 60,
        required_supplies: &["welcome pack", "key set"],
    },
    TaskTemplate {
        task_type: TaskType::Inspection,
        title: "Readiness inspection",
        description: "Walkthrough against the readiness checklist before arrival",
        priority: TaskPriority::Medium,
        estimated_duration_minutes: 45,
        required_supplies: &[],
    },
    TaskTemplate {
        task_type: TaskType::CheckoutProcess,
        title: "Checkout processing",
        description: "Post-stay walkthrough, key collection, damage report",
        priority: TaskPriority::Medium,
        estimated_duration_minutes: 90,
        required_supplies: &[],
    },
];

static LUXURY_CHECKIN: [TaskTemplate; 5] = [
    TaskTemplate {
        task_type: TaskType::Cleaning,
        title: "Deep clean and styling",
        description: "Deep clean, premium linen, staging per the styling guide",
        priority: TaskPriority::Urgent,
        estimated_duration_minutes: 300,
        required_supplies: &["cleaning kit", "premium linen", "styling guide"],
    },
    TaskTemplate {
        task_type: TaskType::CheckinPrep,
        title: "VIP welcome setup",
        description: "Champagne, flowers, personalised welcome note",
        priority: TaskPriority::High,
        estimated_duration_minutes: 120,
        required_supplies: &["champagne", "flowers", "welcome card"],
    },
    TaskTemplate {
        task_type: TaskType::Inspection,
        title: "Quality inspection",
        description: "Supervisor-level walkthrough of every room and amenity",
        priority: TaskPriority::High,
        estimated_duration_minutes: 90,
        required_supplies: &[],
    },
    TaskTemplate {
        task_type: TaskType::CheckoutProcess,
        title: "Checkout and inventory audit",
        description: "Post-stay audit of premium inventory and fixtures",
        priority: TaskPriority::High,
        estimated_duration_minutes: 120,
        required_supplies: &["inventory list"],
    },
    TaskTemplate {
        task_type: TaskType::Custom,
        title: "Concierge briefing",
        description: "Brief the concierge on guest preferences and itinerary",
        priority: TaskPriority::Medium,
        estimated_duration_minutes: 45,
        required_supplies: &[],
    },
];

static MAINTENANCE_REQUIRED: [TaskTemplate; 2] = [
    TaskTemplate {
        task_type: TaskType::Maintenance,
        title: "Pre-arrival maintenance",
        description: "Address reported maintenance items before the stay",
        priority: TaskPriority::High,
        estimated_duration_minutes: 120,
        required_supplies: &["toolkit"],
    },
    TaskTemplate {
        task_type: TaskType::Inspection,
        title: "Post-repair inspection",
        description: "Verify completed maintenance work",
        priority: TaskPriority::Medium,
        estimated_duration_minutes: 60,
        required_supplies: &[],
    },
];

static MAINTENANCE_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)maintenance|repair").expect("static regex"));
static BEACH_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)beach|ocean").expect("static regex"));
static MOUNTAIN_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)mountain|highland").expect("static regex"));
static CITY_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)downtown|urban").expect("static regex"));

const BEACH_POOL: &[&str] = &["staff_beach_01", "staff_beach_02", "staff_beach_03"];
const MOUNTAIN_POOL: &[&str] = &["staff_mountain_01", "staff_mountain_02"];
const CITY_POOL: &[&str] = &["staff_city_01", "staff_city_02"];

#[derive(Clone)]
pub struct TaskGeneratorService {
    staff: StaffRepository,
    staff_tasks: StaffTasksRepository,
    config: TasksConfig,
}

impl TaskGeneratorService {
    pub fn new(
        staff: StaffRepository,
        staff_tasks: StaffTasksRepository,
        config: TasksConfig,
    ) -> Self {
        Self {
            staff,
            staff_tasks,
            config,
        }
    }

    /// Create the staff tasks for an approved booking.
    ///
    /// Task writes fan out concurrently and are joined before returning. The
    /// batch is non-transactional and at-least-once: a failed write does not
    /// roll back siblings; the outcome carries every created id plus the
    /// first error encountered.
    pub async fn create_tasks_for_booking(&self, booking: &Booking) -> AppResult<TaskBatchOutcome> {
        let templates = self.select_templates(booking);
        let staff_ids = self.resolve_staff_pool(&booking.property_name).await?;

        let mut tasks = Vec::new();
        for staff_id in &staff_ids {
            match self.staff.get_member(staff_id).await? {
                Some(member) => {
                    for entry in templates
                        .iter()
                        .filter(|entry| member.role.allows(entry.task_type))
                    {
                        tasks.push(build_task(booking, &member, entry));
                    }
                }
                None => {
                    tracing::warn!(staff_id = %staff_id, "Staff member not found, skipping");
                }
            }
        }

        let writes = tasks.iter().map(|task| self.staff_tasks.create(task));
        let results = futures::future::join_all(writes).await;

        let mut task_ids = Vec::new();
        let mut first_error = None;
        for (task, result) in tasks.iter().zip(results) {
            match result {
                Ok(()) => task_ids.push(task.id.clone()),
                Err(err) => {
                    tracing::error!(task_id = %task.id, error = %err, "Task write failed");
                    if first_error.is_none() {
                        first_error = Some(err.to_string());
                    }
                }
            }
        }

        tracing::info!(
            booking_id = %booking.id,
            created = task_ids.len(),
            attempted = tasks.len(),
            "Staff task batch complete"
        );

        Ok(TaskBatchOutcome {
            success: first_error.is_none(),
            task_ids,
            error: first_error,
        })
    }

    /// Template set for a booking: luxury above the price threshold,
    /// standard otherwise, with the maintenance set appended when the guest's
    /// special requests mention maintenance or repair.
    fn select_templates(&self, booking: &Booking) -> Vec<&'static TaskTemplate> {
        let mut templates: Vec<&'static TaskTemplate> =
            if booking.price > self.config.luxury_price_threshold {
                LUXURY_CHECKIN.iter().collect()
            } else {
                STANDARD_CHECKIN.iter().collect()
            };

        if let Some(requests) = &booking.special_requests {
            if MAINTENANCE_KEYWORDS.is_match(requests) {
                templates.extend(MAINTENANCE_REQUIRED.iter());
            }
        }
        templates
    }

    /// Staff pool for a property: explicit assignment first, then keyword
    /// pools, then the configured default pair.
    async fn resolve_staff_pool(&self, property_name: &str) -> AppResult<Vec<String>> {
        if let Some(assigned) = self.staff.assignment_for_property(property_name).await? {
            return Ok(assigned);
        }
        let pool = if BEACH_KEYWORDS.is_match(property_name) {
            BEACH_POOL
        } else if MOUNTAIN_KEYWORDS.is_match(property_name) {
            MOUNTAIN_POOL
        } else if CITY_KEYWORDS.is_match(property_name) {
            CITY_POOL
        } else {
            return Ok(self.config.default_staff_pool.clone());
        };
        Ok(pool.iter().map(|id| id.to_string()).collect())
    }
}

fn build_task(booking: &Booking, member: &StaffMember, entry: &TaskTemplate) -> StaffTask {
    StaffTask {
        id: Uuid::new_v4().to_string(),
        booking_id: booking.id.clone(),
        staff_id: member.id.clone(),
        staff_name: member.name.clone(),
        staff_email: member.email.clone(),
        task_type: entry.task_type,
        title: entry.title.to_string(),
        description: entry.description.to_string(),
        priority: entry.priority,
        estimated_duration_minutes: entry.estimated_duration_minutes,
        status: TaskStatus::Assigned,
        scheduled_date: scheduled_date_for(entry.task_type, booking.check_in),
        deadline: deadline_for(booking.check_in),
        required_supplies: entry
            .required_supplies
            .iter()
            .map(|supply| supply.to_string())
            .collect(),
        special_instructions: booking.special_requests.clone(),
        auto_created: true,
        automation_rule_id: format!("booking_approved_{}", entry.task_type),
        created_at: Utc::now(),
    }
}

/// Cleaning runs the day before check-in, maintenance two days before,
/// everything else on the check-in day itself.
fn scheduled_date_for(task_type: TaskType, check_in: NaiveDate) -> NaiveDate {
    match task_type {
        TaskType::Cleaning => check_in - Duration::days(1),
        TaskType::Maintenance => check_in - Duration::days(2),
        _ => check_in,
    }
}

/// Deadline is two hours before midnight of the check-in day, regardless of
/// task type.
fn deadline_for(check_in: NaiveDate) -> DateTime<Utc> {
    check_in.and_time(NaiveTime::MIN).and_utc() - Duration::hours(2)
}
