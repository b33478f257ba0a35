/// Structural problems in a schedule rule. Raised when a rule is converted or
/// evaluated, never coerced into "not due".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidRule {
    MissingFrequency,
    UnknownFrequency(String),
    MissingInterval,
    ZeroInterval,
    IntervalOutOfRange(i64),
    InvalidStartDate(String),
    UnknownSlot(String),
}

impl std::fmt::Display for InvalidRule {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            InvalidRule::MissingFrequency => write!(f, "Invalid rule: frequency is missing"),
            InvalidRule::UnknownFrequency(tag) => {
                write!(f, "Invalid rule: unknown frequency '{}'", tag)
            }
            InvalidRule::MissingInterval => {
                write!(f, "Invalid rule: custom frequency requires an interval")
            }
            InvalidRule::ZeroInterval => write!(f, "Invalid rule: interval must be at least 1 day"),
            InvalidRule::IntervalOutOfRange(n) => {
                write!(f, "Invalid rule: interval {} is out of range", n)
            }
            InvalidRule::InvalidStartDate(raw) => {
                write!(f, "Invalid rule: cannot parse start date '{}'", raw)
            }
            InvalidRule::UnknownSlot(raw) => write!(f, "Invalid rule: unknown time of day '{}'", raw),
        }
    }
}

impl std::error::Error for InvalidRule {}
