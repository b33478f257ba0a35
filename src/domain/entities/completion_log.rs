use crate::domain::value_objects::DateKey;
use serde::{Deserialize, Serialize};

/// Acknowledgment that a rule's occurrence on one day was fulfilled.
/// At most one log exists per `(schedule_rule_id, date_key)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionLog {
    pub id: u64,
    pub schedule_rule_id: u64,
    pub date_key: DateKey,
}

impl CompletionLog {
    pub fn new(id: u64, schedule_rule_id: u64, date_key: DateKey) -> Self {
        Self {
            id,
            schedule_rule_id,
            date_key,
        }
    }

    pub fn matches(&self, schedule_rule_id: u64, date_key: &DateKey) -> bool {
        self.schedule_rule_id == schedule_rule_id && &self.date_key == date_key
    }
}

/// A log that has not been persisted yet; the repository assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompletionLog {
    pub schedule_rule_id: u64,
    pub date_key: DateKey,
}
