pub mod date_key;
pub mod frequency;
pub mod time_slot;

pub use date_key::DateKey;
pub use frequency::Frequency;
pub use time_slot::TimeSlot;
