pub mod json_schedule_repository;
pub mod json_storage;
pub mod sqlite_schedule_repository;

pub use json_schedule_repository::JsonScheduleRepository;
pub use sqlite_schedule_repository::SqliteScheduleRepository;
