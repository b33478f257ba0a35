pub mod entities;
pub mod errors;
pub mod repositories;
pub mod value_objects;

pub use entities::{
    CalendarEvent, CompletionLog, Medication, NewCompletionLog, PlannerSnapshot, Priority,
    ScheduleRule, ScheduleRuleRecord, Task, TaskStatus,
};
pub use errors::InvalidRule;
pub use repositories::{RepositoryError, ScheduleRepository};
pub use value_objects::{DateKey, Frequency, TimeSlot};
