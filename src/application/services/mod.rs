pub mod calendar_filter;
pub mod dashboard_service;
pub mod deadline_filter;
pub mod dose_view;
pub mod recurrence_evaluator;
pub mod reminder_service;
pub mod schedule_service;

pub use dashboard_service::{DashboardService, DashboardSummary};
pub use deadline_filter::DueSoonFilter;
pub use dose_view::DoseView;
pub use reminder_service::{ReminderService, StartupReminders};
pub use schedule_service::{ScheduleService, ServiceError};
