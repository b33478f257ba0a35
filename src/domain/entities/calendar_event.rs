use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: u64,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub start_time: Option<String>, // "HH:MM", free text from the form
    #[serde(default)]
    pub end_time: Option<String>,
}
