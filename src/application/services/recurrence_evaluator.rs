//! Decides whether schedule rules are due on a given day.
//!
//! Every function here is pure: results depend only on the arguments, so callers
//! can re-run them against each fresh snapshot of rules and logs.

use crate::domain::entities::completion_log::{CompletionLog, NewCompletionLog};
use crate::domain::entities::schedule_rule::ScheduleRule;
use crate::domain::errors::InvalidRule;
use crate::domain::value_objects::{DateKey, Frequency, TimeSlot};
use chrono::{DateTime, Days, NaiveDate, TimeZone, Timelike};

/// Evaluated state of one rule on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    NotDue,
    Due { completed: bool },
}

/// What the persistence layer has to do to flip a rule's "taken" state for a day
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleAction {
    Create(NewCompletionLog),
    Delete(u64),
}

/// Whole calendar days from `start` to `day`, negative when `day` comes first
pub fn days_between(start: NaiveDate, day: NaiveDate) -> i64 {
    (day - start).num_days()
}

/// Returns whether `rule` produces an occurrence on `day`.
/// Days before the start date are never due, whatever the frequency.
pub fn is_due(rule: &ScheduleRule, day: NaiveDate) -> Result<bool, InvalidRule> {
    if day < rule.start_date {
        return Ok(false);
    }
    let diff = days_between(rule.start_date, day);

    let due = match rule.frequency {
        Frequency::Daily => true,
        Frequency::Weekly => diff % 7 == 0,
        Frequency::EveryNDays(0) => return Err(InvalidRule::ZeroInterval),
        Frequency::EveryNDays(n) => diff % i64::from(n) == 0,
        Frequency::Once => diff == 0,
        Frequency::ForDuration(days) => diff < days,
    };
    Ok(due)
}

/// Rules of `slot` that are due on `day`, in the order they were given
pub fn occurrences_for_slot<'a>(
    rules: &'a [ScheduleRule],
    day: NaiveDate,
    slot: TimeSlot,
) -> Result<Vec<&'a ScheduleRule>, InvalidRule> {
    let mut due = Vec::new();
    for rule in rules.iter().filter(|r| r.slot == slot) {
        if is_due(rule, day)? {
            due.push(rule);
        }
    }
    Ok(due)
}

/// Slot and day that are "due right now" at local time `now`.
/// From 20:00 on, the next relevant dose is tomorrow morning.
pub fn resolve_current_slot<Tz: TimeZone>(now: &DateTime<Tz>) -> (TimeSlot, NaiveDate) {
    let today = now.date_naive();
    let (slot, next_day) = TimeSlot::for_hour(now.hour());
    let day = if next_day {
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    } else {
        today
    };
    (slot, day)
}

pub fn find_log<'a>(
    logs: &'a [CompletionLog],
    schedule_rule_id: u64,
    day: NaiveDate,
) -> Option<&'a CompletionLog> {
    let key = DateKey::from_date(day);
    logs.iter().find(|log| log.matches(schedule_rule_id, &key))
}

pub fn is_completed(logs: &[CompletionLog], schedule_rule_id: u64, day: NaiveDate) -> bool {
    find_log(logs, schedule_rule_id, day).is_some()
}

/// Decides whether toggling "taken" creates a log or deletes the existing one
pub fn toggle_completion(
    logs: &[CompletionLog],
    schedule_rule_id: u64,
    day: NaiveDate,
) -> ToggleAction {
    match find_log(logs, schedule_rule_id, day) {
        Some(log) => ToggleAction::Delete(log.id),
        None => ToggleAction::Create(NewCompletionLog {
            schedule_rule_id,
            date_key: DateKey::from_date(day),
        }),
    }
}

pub fn occurrence(
    rule: &ScheduleRule,
    logs: &[CompletionLog],
    day: NaiveDate,
) -> Result<Occurrence, InvalidRule> {
    if !is_due(rule, day)? {
        return Ok(Occurrence::NotDue);
    }
    Ok(Occurrence::Due {
        completed: is_completed(logs, rule.id, day),
    })
}
