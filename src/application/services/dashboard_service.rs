use crate::application::services::deadline_filter::DueSoonFilter;
use crate::application::services::dose_view::{DoseView, collect_doses};
use crate::application::services::recurrence_evaluator::resolve_current_slot;
use crate::domain::entities::completion_log::CompletionLog;
use crate::domain::entities::schedule_rule::ScheduleRule;
use crate::domain::entities::snapshot::PlannerSnapshot;
use crate::domain::entities::task::Task;
use crate::domain::entities::transaction::Transaction;
use crate::domain::errors::InvalidRule;
use crate::domain::value_objects::TimeSlot;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::debug;

/// Wallet entries the dashboard previews and sums
pub const WALLET_PREVIEW_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub slot: TimeSlot,
    pub day: NaiveDate,
    pub is_next_day: bool,
    pub doses: Vec<DoseView>,
    pub due_soon: Vec<Task>,
    pub wallet_total: f64,
    pub last_transactions: Vec<Transaction>,
}

impl DashboardSummary {
    /// e.g. "This evening", "Tomorrow morning"
    pub fn session_label(&self) -> &'static str {
        self.slot.label(self.is_next_day)
    }

    pub fn pending_doses(&self) -> usize {
        self.doses.iter().filter(|d| !d.completed).count()
    }
}

#[derive(Clone)]
pub struct DashboardService {
    task_filter: DueSoonFilter,
}

impl DashboardService {
    pub fn new() -> Self {
        Self {
            task_filter: DueSoonFilter::dashboard(),
        }
    }

    pub fn with_task_filter(task_filter: DueSoonFilter) -> Self {
        Self { task_filter }
    }

    /// Builds the "what is due now" view from the given snapshot
    pub fn summary<Tz: TimeZone>(
        &self,
        rules: &[ScheduleRule],
        logs: &[CompletionLog],
        snapshot: &PlannerSnapshot,
        now: &DateTime<Tz>,
    ) -> Result<DashboardSummary, InvalidRule> {
        let (slot, day) = resolve_current_slot(now);
        let doses = collect_doses(rules, logs, snapshot, day, slot)?;

        let due_soon: Vec<Task> = self
            .task_filter
            .apply(&snapshot.tasks, now.with_timezone(&Utc))
            .into_iter()
            .cloned()
            .collect();

        let last_transactions: Vec<Transaction> = snapshot
            .transactions
            .iter()
            .take(WALLET_PREVIEW_LIMIT)
            .cloned()
            .collect();
        let wallet_total: f64 = last_transactions.iter().map(Transaction::signed_amount).sum();

        debug!(
            "Dashboard for {} {}: {} doses, {} tasks due soon",
            day,
            slot,
            doses.len(),
            due_soon.len()
        );

        Ok(DashboardSummary {
            slot,
            day,
            is_next_day: day > now.date_naive(),
            doses,
            due_soon,
            wallet_total,
            last_transactions,
        })
    }
}

impl Default for DashboardService {
    fn default() -> Self {
        Self::new()
    }
}
