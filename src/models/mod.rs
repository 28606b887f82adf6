//! Data models for the booking automation pipeline

pub mod automation;
pub mod booking;
pub mod enums;
pub mod owner;
pub mod staff_task;

pub use automation::{
    AutomationLogEntry, AutomationResult, AutomationRule, RuleAction, RuleActionType,
    RuleCondition, RuleOperator, StepReport, StepStatus,
};
pub use booking::{Booking, IncomingBooking, IngestReceipt};
pub use enums::{BookingStatus, MatchMethod, StaffRole, TaskPriority, TaskStatus, TaskType};
pub use owner::{OwnerProfile, Property, StaffMember};
pub use staff_task::{StaffTask, TaskBatchOutcome, TaskTemplate};
