use crate::application::services::dose_view::{DoseView, collect_doses};
use crate::application::services::recurrence_evaluator::{ToggleAction, toggle_completion};
use crate::domain::entities::completion_log::CompletionLog;
use crate::domain::entities::schedule_rule::{ScheduleRule, ScheduleRuleRecord, parse_rules};
use crate::domain::entities::snapshot::PlannerSnapshot;
use crate::domain::errors::InvalidRule;
use crate::domain::repositories::{RepositoryError, ScheduleRepository};
use crate::domain::value_objects::{Frequency, TimeSlot};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug)]
pub enum ServiceError {
    InvalidRule(InvalidRule),
    RuleNotFound(u64),
    Repository(RepositoryError),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ServiceError::InvalidRule(e) => write!(f, "{}", e),
            ServiceError::RuleNotFound(id) => write!(f, "Couldn't find schedule with ID {}", id),
            ServiceError::Repository(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<InvalidRule> for ServiceError {
    fn from(e: InvalidRule) -> Self {
        ServiceError::InvalidRule(e)
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        ServiceError::Repository(e)
    }
}

/// Schedule operations backed by a repository: creating and removing rules,
/// toggling "taken" and reading the grid for a day.
#[derive(Clone)]
pub struct ScheduleService {
    repo: Arc<dyn ScheduleRepository>,
}

impl ScheduleService {
    pub fn new(repo: Arc<dyn ScheduleRepository>) -> Self {
        Self { repo }
    }

    pub async fn schedule(
        &self,
        subject_id: u64,
        start_date: NaiveDate,
        slot: TimeSlot,
        frequency: Frequency,
    ) -> Result<u64, ServiceError> {
        if frequency == Frequency::EveryNDays(0) {
            return Err(InvalidRule::ZeroInterval.into());
        }

        let rule = ScheduleRule::new(0, subject_id, start_date, slot, frequency);
        let id = self.repo.add_rule(ScheduleRuleRecord::from(&rule)).await?;
        info!(
            "Scheduled subject {} from {} ({} {}) as rule {}",
            subject_id,
            start_date,
            frequency.tag(),
            slot,
            id
        );
        Ok(id)
    }

    /// Current rules, converted from stored records
    pub async fn rules(&self) -> Result<Vec<ScheduleRule>, ServiceError> {
        let records = self.repo.list_rules().await?;
        Ok(parse_rules(&records)?)
    }

    pub async fn logs(&self) -> Result<Vec<CompletionLog>, ServiceError> {
        Ok(self.repo.list_logs().await?)
    }

    /// Flips the "taken" state of a rule on `day`; returns the new state
    pub async fn toggle_taken(&self, rule_id: u64, day: NaiveDate) -> Result<bool, ServiceError> {
        if self.repo.get_rule(rule_id).await?.is_none() {
            return Err(ServiceError::RuleNotFound(rule_id));
        }

        let logs = self.repo.list_logs().await?;
        match toggle_completion(&logs, rule_id, day) {
            ToggleAction::Create(new_log) => {
                let log_id = self.repo.add_log(new_log).await?;
                info!("Marked rule {} taken on {} (log {})", rule_id, day, log_id);
                Ok(true)
            }
            ToggleAction::Delete(log_id) => {
                self.repo.remove_log(log_id).await?;
                info!("Marked rule {} not taken on {}", rule_id, day);
                Ok(false)
            }
        }
    }

    /// Removes a rule and every completion log that references it
    pub async fn unschedule(&self, rule_id: u64) -> Result<usize, ServiceError> {
        match self.repo.remove_rule(rule_id).await {
            Ok(removed_logs) => {
                info!("Removed rule {} and {} logs", rule_id, removed_logs);
                Ok(removed_logs)
            }
            Err(RepositoryError::NotFound) => Err(ServiceError::RuleNotFound(rule_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Cascade for a deleted subject: its rules and their logs go too
    pub async fn remove_subject(&self, subject_id: u64) -> Result<usize, ServiceError> {
        let removed = self.repo.remove_rules_for_subject(subject_id).await?;
        if removed == 0 {
            warn!("Subject {} had no schedules to remove", subject_id);
        }
        Ok(removed)
    }

    /// Grid cell for one slot of one day
    pub async fn doses_for(
        &self,
        day: NaiveDate,
        slot: TimeSlot,
        snapshot: &PlannerSnapshot,
    ) -> Result<Vec<DoseView>, ServiceError> {
        let rules = self.rules().await?;
        let logs = self.logs().await?;
        Ok(collect_doses(&rules, &logs, snapshot, day, slot)?)
    }
}
