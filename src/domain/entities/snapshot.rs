use crate::domain::entities::calendar_event::CalendarEvent;
use crate::domain::entities::medication::Medication;
use crate::domain::entities::task::Task;
use crate::domain::entities::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// Label shown for doses whose medication is no longer in the snapshot
pub const UNKNOWN_SUBJECT_LABEL: &str = "Medication";

/// Point-in-time copy of the user's collections, replaced wholesale on every change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerSnapshot {
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl PlannerSnapshot {
    pub fn medication_name(&self, subject_id: u64) -> &str {
        self.medications
            .iter()
            .find(|m| m.id == subject_id)
            .map(|m| m.name.as_str())
            .unwrap_or(UNKNOWN_SUBJECT_LABEL)
    }
}
