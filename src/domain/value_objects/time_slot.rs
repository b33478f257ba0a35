use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed times of day used to bucket doses and reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Noon,
    Evening,
}

impl TimeSlot {
    /// Wire name used by stored records ("morning", "noon", "evening")
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Noon => "noon",
            TimeSlot::Evening => "evening",
        }
    }

    /// Summary heading for the slot, today or tomorrow
    pub fn label(&self, is_next_day: bool) -> &'static str {
        match (self, is_next_day) {
            (TimeSlot::Morning, false) => "This morning",
            (TimeSlot::Noon, false) => "Today at noon",
            (TimeSlot::Evening, false) => "This evening",
            (TimeSlot::Morning, true) => "Tomorrow morning",
            (TimeSlot::Noon, true) => "Tomorrow at noon",
            (TimeSlot::Evening, true) => "Tomorrow evening",
        }
    }

    /// Parses a wire name into a slot, case-insensitive
    pub fn parse(s: &str) -> Option<TimeSlot> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Some(TimeSlot::Morning),
            "noon" => Some(TimeSlot::Noon),
            "evening" => Some(TimeSlot::Evening),
            _ => None,
        }
    }

    /// Slot that is "next relevant" at the given local hour. The flag is true
    /// when the slot belongs to the following day (after 20:00).
    pub fn for_hour(hour: u32) -> (TimeSlot, bool) {
        match hour {
            0..=9 => (TimeSlot::Morning, false),
            10..=13 => (TimeSlot::Noon, false),
            14..=19 => (TimeSlot::Evening, false),
            _ => (TimeSlot::Morning, true),
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
