use crate::application::services::recurrence_evaluator::{is_completed, occurrences_for_slot};
use crate::domain::entities::completion_log::CompletionLog;
use crate::domain::entities::schedule_rule::ScheduleRule;
use crate::domain::entities::snapshot::PlannerSnapshot;
use crate::domain::errors::InvalidRule;
use crate::domain::value_objects::TimeSlot;
use chrono::NaiveDate;

/// A due dose as shown in the schedule grid and summaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoseView {
    pub rule_id: u64,
    pub subject_id: u64,
    pub subject_name: String,
    pub slot: TimeSlot,
    pub day: NaiveDate,
    pub completed: bool,
}

pub fn collect_doses(
    rules: &[ScheduleRule],
    logs: &[CompletionLog],
    snapshot: &PlannerSnapshot,
    day: NaiveDate,
    slot: TimeSlot,
) -> Result<Vec<DoseView>, InvalidRule> {
    let due = occurrences_for_slot(rules, day, slot)?;
    Ok(due
        .into_iter()
        .map(|rule| DoseView {
            rule_id: rule.id,
            subject_id: rule.subject_id,
            subject_name: snapshot.medication_name(rule.subject_id).to_string(),
            slot,
            day,
            completed: is_completed(logs, rule.id, day),
        })
        .collect())
}
