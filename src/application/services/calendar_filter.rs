use crate::domain::entities::calendar_event::CalendarEvent;
use chrono::NaiveDate;

/// Events that fall on `day`, in input order
pub fn events_on_day(events: &[CalendarEvent], day: NaiveDate) -> Vec<&CalendarEvent> {
    events.iter().filter(|e| e.date == day).collect()
}
