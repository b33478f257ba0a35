use async_trait::async_trait;

use crate::domain::entities::completion_log::{CompletionLog, NewCompletionLog};
use crate::domain::entities::schedule_rule::ScheduleRuleRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    NotFound,
    AlreadyExists,
    InvalidData(String),
    StorageError(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RepositoryError::NotFound => write!(f, "Record not found"),
            RepositoryError::AlreadyExists => write!(f, "Record already exists"),
            RepositoryError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
            RepositoryError::StorageError(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Persistence for schedule rules and their completion logs.
/// Rules are handed out as stored records; turning them into evaluable rules is
/// left to the caller so malformed rows surface at evaluation time.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Store a new rule, the record's id is ignored and a fresh one is returned
    async fn add_rule(&self, rule: ScheduleRuleRecord) -> Result<u64>;

    /// All rules in insertion order
    async fn list_rules(&self) -> Result<Vec<ScheduleRuleRecord>>;

    async fn get_rule(&self, rule_id: u64) -> Result<Option<ScheduleRuleRecord>> {
        let rules = self.list_rules().await?;
        Ok(rules.into_iter().find(|r| r.id == rule_id))
    }

    /// Remove a rule together with its logs; returns how many logs went with it
    async fn remove_rule(&self, rule_id: u64) -> Result<usize>;

    /// Remove every rule of a subject (and their logs); returns how many rules were removed
    async fn remove_rules_for_subject(&self, subject_id: u64) -> Result<usize>;

    /// Fails with `AlreadyExists` when the (rule, day) pair is already logged
    async fn add_log(&self, log: NewCompletionLog) -> Result<u64>;

    async fn remove_log(&self, log_id: u64) -> Result<()>;

    async fn list_logs(&self) -> Result<Vec<CompletionLog>>;
}
