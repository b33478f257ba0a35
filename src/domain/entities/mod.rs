pub mod calendar_event;
pub mod completion_log;
pub mod medication;
pub mod schedule_rule;
pub mod snapshot;
pub mod task;
pub mod transaction;

pub use calendar_event::CalendarEvent;
pub use completion_log::{CompletionLog, NewCompletionLog};
pub use medication::Medication;
pub use schedule_rule::{ScheduleRule, ScheduleRuleRecord, parse_rules};
pub use snapshot::PlannerSnapshot;
pub use task::{Priority, Task, TaskStatus};
pub use transaction::{Transaction, TransactionCategory};
