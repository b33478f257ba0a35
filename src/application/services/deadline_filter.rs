use crate::domain::entities::task::{Task, TaskStatus};
use chrono::{DateTime, Duration, Utc};

pub const DUE_SOON_WINDOW_HOURS: i64 = 48;
pub const DASHBOARD_TASK_LIMIT: usize = 5;

/// Selects tasks whose deadline falls within a window ahead of "now".
/// Call sites that want a narrower view configure the filter instead of re-implementing it.
#[derive(Debug, Clone)]
pub struct DueSoonFilter {
    pub window: Duration,
    pub statuses: Vec<TaskStatus>,
    pub limit: Option<usize>,
    /// Whether a deadline exactly `window` away still counts
    pub inclusive_end: bool,
}

impl DueSoonFilter {
    /// Dashboard widget: open "todo" tasks only, at most five
    pub fn dashboard() -> Self {
        Self {
            window: Duration::hours(DUE_SOON_WINDOW_HOURS),
            statuses: vec![TaskStatus::Todo],
            limit: Some(DASHBOARD_TASK_LIMIT),
            inclusive_end: true,
        }
    }

    /// Startup reminders: anything not done yet, no limit, deadline strictly under 48h
    pub fn startup() -> Self {
        Self {
            window: Duration::hours(DUE_SOON_WINDOW_HOURS),
            statuses: vec![TaskStatus::Todo, TaskStatus::InProgress],
            limit: None,
            inclusive_end: false,
        }
    }

    /// True when the task has a deadline strictly in the future and within the window
    pub fn matches(&self, task: &Task, now: DateTime<Utc>) -> bool {
        if !self.statuses.contains(&task.status) {
            return false;
        }
        match task.deadline {
            Some(deadline) => {
                let remaining = deadline - now;
                let within = if self.inclusive_end {
                    remaining <= self.window
                } else {
                    remaining < self.window
                };
                remaining > Duration::zero() && within
            }
            None => false,
        }
    }

    pub fn apply<'a>(&self, tasks: &'a [Task], now: DateTime<Utc>) -> Vec<&'a Task> {
        let matching = tasks.iter().filter(|t| self.matches(t, now));
        match self.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::task::Priority;
    use chrono::TimeZone;

    fn task(id: u64, deadline: Option<DateTime<Utc>>, status: TaskStatus) -> Task {
        Task::new(id, format!("task {}", id), None, Priority::Low, deadline, status)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_window_is_open_at_now_and_closed_at_48h() {
        let f = DueSoonFilter::dashboard();
        let n = now();
        assert!(!f.matches(&task(1, Some(n), TaskStatus::Todo), n));
        assert!(!f.matches(&task(1, Some(n - Duration::minutes(1)), TaskStatus::Todo), n));
        assert!(f.matches(&task(1, Some(n + Duration::minutes(1)), TaskStatus::Todo), n));
        assert!(f.matches(&task(1, Some(n + Duration::hours(48)), TaskStatus::Todo), n));
        assert!(!f.matches(&task(1, Some(n + Duration::hours(48) + Duration::seconds(1)), TaskStatus::Todo), n));
        assert!(!f.matches(&task(1, None, TaskStatus::Todo), n));
    }

    #[test]
    fn test_startup_excludes_deadline_exactly_48h_away() {
        let n = now();
        let edge = task(1, Some(n + Duration::hours(48)), TaskStatus::Todo);
        let inside = task(2, Some(n + Duration::hours(48) - Duration::seconds(1)), TaskStatus::Todo);

        assert!(!DueSoonFilter::startup().matches(&edge, n));
        assert!(DueSoonFilter::startup().matches(&inside, n));
        assert!(DueSoonFilter::dashboard().matches(&edge, n));
    }

    #[test]
    fn test_presets_differ_in_statuses() {
        let n = now();
        let in_progress = task(1, Some(n + Duration::hours(3)), TaskStatus::InProgress);
        let done = task(2, Some(n + Duration::hours(3)), TaskStatus::Done);

        assert!(!DueSoonFilter::dashboard().matches(&in_progress, n));
        assert!(DueSoonFilter::startup().matches(&in_progress, n));
        assert!(!DueSoonFilter::startup().matches(&done, n));
    }

    #[test]
    fn test_dashboard_limit_keeps_first_five_in_order() {
        let n = now();
        let tasks: Vec<Task> = (1..=8)
            .map(|i| task(i, Some(n + Duration::hours(i as i64)), TaskStatus::Todo))
            .collect();

        let ids: Vec<u64> = DueSoonFilter::dashboard()
            .apply(&tasks, n)
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(DueSoonFilter::startup().apply(&tasks, n).len(), 8);
    }
}
