use crate::application::services::calendar_filter::events_on_day;
use crate::application::services::deadline_filter::DueSoonFilter;
use crate::application::services::dose_view::{DoseView, collect_doses};
use crate::application::services::recurrence_evaluator::resolve_current_slot;
use crate::domain::entities::calendar_event::CalendarEvent;
use crate::domain::entities::completion_log::CompletionLog;
use crate::domain::entities::schedule_rule::ScheduleRule;
use crate::domain::entities::snapshot::PlannerSnapshot;
use crate::domain::entities::task::Task;
use crate::domain::errors::InvalidRule;
use chrono::{DateTime, Days, TimeZone, Utc};
use tracing::info;

/// Everything worth nagging about when the planner starts
#[derive(Debug, Clone, Default)]
pub struct StartupReminders {
    pub upcoming_tasks: Vec<Task>,
    pub tomorrow_events: Vec<CalendarEvent>,
    pub pending_doses: Vec<DoseView>,
}

impl StartupReminders {
    pub fn should_notify(&self) -> bool {
        !self.upcoming_tasks.is_empty()
            || !self.tomorrow_events.is_empty()
            || !self.pending_doses.is_empty()
    }
}

#[derive(Clone)]
pub struct ReminderService {
    task_filter: DueSoonFilter,
}

impl ReminderService {
    pub fn new() -> Self {
        Self {
            task_filter: DueSoonFilter::startup(),
        }
    }

    pub fn with_task_filter(task_filter: DueSoonFilter) -> Self {
        Self { task_filter }
    }

    pub fn collect<Tz: TimeZone>(
        &self,
        rules: &[ScheduleRule],
        logs: &[CompletionLog],
        snapshot: &PlannerSnapshot,
        now: &DateTime<Tz>,
    ) -> Result<StartupReminders, InvalidRule> {
        let today = now.date_naive();
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);

        let upcoming_tasks: Vec<Task> = self
            .task_filter
            .apply(&snapshot.tasks, now.with_timezone(&Utc))
            .into_iter()
            .cloned()
            .collect();

        let tomorrow_events: Vec<CalendarEvent> = events_on_day(&snapshot.events, tomorrow)
            .into_iter()
            .cloned()
            .collect();

        let (slot, day) = resolve_current_slot(now);
        let pending_doses: Vec<DoseView> = collect_doses(rules, logs, snapshot, day, slot)?
            .into_iter()
            .filter(|d| !d.completed)
            .collect();

        info!(
            "Startup reminders: {} tasks, {} events tomorrow, {} pending doses",
            upcoming_tasks.len(),
            tomorrow_events.len(),
            pending_doses.len()
        );

        Ok(StartupReminders {
            upcoming_tasks,
            tomorrow_events,
            pending_doses,
        })
    }
}

impl Default for ReminderService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::task::{Priority, TaskStatus};
    use crate::domain::value_objects::{DateKey, Frequency, TimeSlot};
    use chrono::{Duration, NaiveDate};
    use chrono_tz::Europe::Warsaw;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: u64, day: NaiveDate) -> CalendarEvent {
        CalendarEvent {
            id,
            title: format!("event {}", id),
            date: day,
            start_time: None,
            end_time: None,
        }
    }

    #[test]
    fn test_nothing_to_report() {
        let now = Warsaw.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
        let reminders = ReminderService::new()
            .collect(&[], &[], &PlannerSnapshot::default(), &now)
            .unwrap();
        assert!(!reminders.should_notify());
    }

    #[test]
    fn test_collects_tasks_events_and_pending_doses() {
        let now = Warsaw.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
        let utc_now = now.with_timezone(&Utc);
        let snapshot = PlannerSnapshot {
            tasks: vec![
                Task::new(1, "pay rent".into(), None, Priority::Urgent, Some(utc_now + Duration::hours(47)), TaskStatus::InProgress),
                Task::new(2, "done".into(), None, Priority::Low, Some(utc_now + Duration::hours(2)), TaskStatus::Done),
            ],
            events: vec![event(1, date(2024, 6, 10)), event(2, date(2024, 6, 11))],
            ..Default::default()
        };
        let rules = vec![
            ScheduleRule::new(1, 10, date(2024, 6, 1), TimeSlot::Morning, Frequency::Daily),
            ScheduleRule::new(2, 11, date(2024, 6, 1), TimeSlot::Morning, Frequency::Daily),
        ];
        let logs = vec![CompletionLog::new(1, 1, DateKey::from_date(date(2024, 6, 10)))];

        let reminders = ReminderService::new()
            .collect(&rules, &logs, &snapshot, &now)
            .unwrap();

        assert!(reminders.should_notify());
        assert_eq!(reminders.upcoming_tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(reminders.tomorrow_events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(reminders.pending_doses.iter().map(|d| d.rule_id).collect::<Vec<_>>(), vec![2]);
    }
}
