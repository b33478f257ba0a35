use crate::domain::errors::InvalidRule;

/// Days a `ForDuration` rule lasts when the stored record omits a duration
pub const DEFAULT_DURATION_DAYS: i64 = 7;

/// How often a schedule rule repeats, measured in whole days from its start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    EveryNDays(u32),
    Once,
    ForDuration(i64),
}

impl Frequency {
    /// Tag used in stored records
    pub fn tag(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::EveryNDays(_) => "custom",
            Frequency::Once => "once",
            Frequency::ForDuration(_) => "for_days",
        }
    }

    /// Builds a frequency from the tag and optional numeric fields of a stored record.
    /// A zero interval is kept as-is so the evaluator can reject it.
    pub fn from_parts(
        tag: Option<&str>,
        interval: Option<i64>,
        duration: Option<i64>,
    ) -> Result<Self, InvalidRule> {
        let tag = tag
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(InvalidRule::MissingFrequency)?;

        match tag.to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "once" => Ok(Frequency::Once),
            "custom" | "every_n_days" => {
                let n = interval.ok_or(InvalidRule::MissingInterval)?;
                u32::try_from(n)
                    .map(Frequency::EveryNDays)
                    .map_err(|_| InvalidRule::IntervalOutOfRange(n))
            }
            "for_days" | "for_duration" => Ok(Frequency::ForDuration(
                duration.unwrap_or(DEFAULT_DURATION_DAYS),
            )),
            _ => Err(InvalidRule::UnknownFrequency(tag.to_string())),
        }
    }

    /// Splits into (tag, interval, duration) for storage
    pub fn to_parts(&self) -> (&'static str, Option<i64>, Option<i64>) {
        match self {
            Frequency::EveryNDays(n) => (self.tag(), Some(i64::from(*n)), None),
            Frequency::ForDuration(d) => (self.tag(), None, Some(*d)),
            _ => (self.tag(), None, None),
        }
    }
}
