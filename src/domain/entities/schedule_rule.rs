use crate::domain::errors::InvalidRule;
use crate::domain::value_objects::date_key::DATE_KEY_FORMAT;
use crate::domain::value_objects::{Frequency, TimeSlot};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One planned recurrence of a subject (usually a medication dose).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRule {
    pub id: u64,
    pub subject_id: u64,
    pub start_date: NaiveDate,
    pub slot: TimeSlot,
    pub frequency: Frequency,
}

impl ScheduleRule {
    pub fn new(
        id: u64,
        subject_id: u64,
        start_date: NaiveDate,
        slot: TimeSlot,
        frequency: Frequency,
    ) -> Self {
        Self {
            id,
            subject_id,
            start_date,
            slot,
            frequency,
        }
    }
}

/// Stored shape of a schedule rule, as exchanged with the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRuleRecord {
    pub id: u64,
    pub subject_id: u64,
    pub start_date: String,
    pub time_of_day: String,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
}

/// Strips any time component from a stored start date
fn parse_start_date(raw: &str) -> Result<NaiveDate, InvalidRule> {
    let trimmed = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, DATE_KEY_FORMAT) {
        return Ok(day);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|dt| dt.date())
        .ok_or_else(|| InvalidRule::InvalidStartDate(raw.to_string()))
}

impl TryFrom<&ScheduleRuleRecord> for ScheduleRule {
    type Error = InvalidRule;

    fn try_from(record: &ScheduleRuleRecord) -> Result<Self, Self::Error> {
        let start_date = parse_start_date(&record.start_date)?;
        let slot = TimeSlot::parse(&record.time_of_day)
            .ok_or_else(|| InvalidRule::UnknownSlot(record.time_of_day.clone()))?;
        let frequency = Frequency::from_parts(
            record.frequency.as_deref(),
            record.custom_interval,
            record.duration,
        )?;

        Ok(ScheduleRule::new(
            record.id,
            record.subject_id,
            start_date,
            slot,
            frequency,
        ))
    }
}

impl From<&ScheduleRule> for ScheduleRuleRecord {
    fn from(rule: &ScheduleRule) -> Self {
        let (tag, custom_interval, duration) = rule.frequency.to_parts();
        Self {
            id: rule.id,
            subject_id: rule.subject_id,
            start_date: rule.start_date.format(DATE_KEY_FORMAT).to_string(),
            time_of_day: rule.slot.as_str().to_string(),
            frequency: Some(tag.to_string()),
            custom_interval,
            duration,
        }
    }
}

/// Converts a whole snapshot of stored records, failing on the first malformed one
pub fn parse_rules(records: &[ScheduleRuleRecord]) -> Result<Vec<ScheduleRule>, InvalidRule> {
    records.iter().map(ScheduleRule::try_from).collect()
}
