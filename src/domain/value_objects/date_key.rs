use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Calendar day serialized as `YYYY-MM-DD`, the key completion logs are stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    pub fn from_date(day: NaiveDate) -> Self {
        Self(day.format(DATE_KEY_FORMAT).to_string())
    }

    /// Accepts only well-formed `YYYY-MM-DD` keys
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)
            .ok()
            .map(Self::from_date)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_date_pads_month_and_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(DateKey::from_date(day).as_str(), "2024-03-05");
    }

    #[test]
    fn test_parse_normalizes_and_rejects_garbage() {
        let key = DateKey::parse(" 2024-06-11 ").unwrap();
        assert_eq!(key.as_str(), "2024-06-11");
        assert_eq!(key, DateKey::from_date(NaiveDate::from_ymd_opt(2024, 6, 11).unwrap()));
        assert!(DateKey::parse("11/06/2024").is_none());
        assert!(DateKey::parse("2024-02-30").is_none());
    }
}
