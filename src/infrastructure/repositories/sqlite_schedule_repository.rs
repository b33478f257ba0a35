use crate::domain::entities::completion_log::{CompletionLog, NewCompletionLog};
use crate::domain::entities::schedule_rule::ScheduleRuleRecord;
use crate::domain::repositories::schedule_repository::{RepositoryError, Result, ScheduleRepository};
use crate::domain::value_objects::DateKey;
use crate::infrastructure::database::DatabaseManager;

use async_trait::async_trait;
use rusqlite::{OptionalExtension, params};

/// Outcome of an insert that has domain-level failure cases
enum Insert {
    Created(u64),
    MissingRule,
    Duplicate,
}

pub struct SqliteScheduleRepository {
    db: DatabaseManager,
}

impl SqliteScheduleRepository {
    /// Wraps an already initialized database
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    pub async fn open(db: DatabaseManager) -> Result<Self> {
        db.initialize_database().await.map_err(storage_error)?;
        Ok(Self::new(db))
    }

    // NOTE: runs inside spawn_blocking, keep it synchronous
    fn row_to_rule(row: &rusqlite::Row) -> rusqlite::Result<ScheduleRuleRecord> {
        let id: i64 = row.get("id")?;
        let subject_id: i64 = row.get("subject_id")?;
        Ok(ScheduleRuleRecord {
            id: id as u64,
            subject_id: subject_id as u64,
            start_date: row.get("start_date")?,
            time_of_day: row.get("time_of_day")?,
            frequency: row.get("frequency")?,
            custom_interval: row.get("custom_interval")?,
            duration: row.get("duration")?,
        })
    }

    fn row_to_log(row: &rusqlite::Row) -> rusqlite::Result<(u64, u64, String)> {
        let id: i64 = row.get("id")?;
        let rule_id: i64 = row.get("schedule_rule_id")?;
        Ok((id as u64, rule_id as u64, row.get("date_key")?))
    }
}

fn storage_error(e: anyhow::Error) -> RepositoryError {
    RepositoryError::StorageError(format!("{:#}", e))
}

#[async_trait]
impl ScheduleRepository for SqliteScheduleRepository {
    async fn add_rule(&self, rule: ScheduleRuleRecord) -> Result<u64> {
        self.db
            .execute_blocking(move |conn| {
                conn.execute(
                    "INSERT INTO schedule_rules (
                        subject_id, start_date, time_of_day, frequency, custom_interval, duration
                     )
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        rule.subject_id as i64,
                        rule.start_date,
                        rule.time_of_day,
                        rule.frequency,
                        rule.custom_interval,
                        rule.duration
                    ],
                )?;
                Ok(conn.last_insert_rowid() as u64)
            })
            .await
            .map_err(storage_error)
    }

    async fn list_rules(&self) -> Result<Vec<ScheduleRuleRecord>> {
        self.db
            .execute_blocking(|conn| {
                let mut stmt = conn.prepare("SELECT * FROM schedule_rules ORDER BY id")?;
                let rows = stmt.query_map([], Self::row_to_rule)?;
                rows.collect()
            })
            .await
            .map_err(storage_error)
    }

    async fn get_rule(&self, rule_id: u64) -> Result<Option<ScheduleRuleRecord>> {
        self.db
            .execute_blocking(move |conn| {
                conn.query_row(
                    "SELECT * FROM schedule_rules WHERE id = ?1",
                    params![rule_id as i64],
                    Self::row_to_rule,
                )
                .optional()
            })
            .await
            .map_err(storage_error)
    }

    async fn remove_rule(&self, rule_id: u64) -> Result<usize> {
        let removed = self
            .db
            .execute_blocking(move |conn| {
                let logs: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM completion_logs WHERE schedule_rule_id = ?1",
                    params![rule_id as i64],
                    |row| row.get(0),
                )?;
                // logs go with the rule through ON DELETE CASCADE
                let rules = conn.execute(
                    "DELETE FROM schedule_rules WHERE id = ?1",
                    params![rule_id as i64],
                )?;
                Ok((rules, logs as usize))
            })
            .await
            .map_err(storage_error)?;

        match removed {
            (0, _) => Err(RepositoryError::NotFound),
            (_, logs) => Ok(logs),
        }
    }

    async fn remove_rules_for_subject(&self, subject_id: u64) -> Result<usize> {
        self.db
            .execute_blocking(move |conn| {
                conn.execute(
                    "DELETE FROM schedule_rules WHERE subject_id = ?1",
                    params![subject_id as i64],
                )
            })
            .await
            .map_err(storage_error)
    }

    async fn add_log(&self, log: NewCompletionLog) -> Result<u64> {
        let outcome = self
            .db
            .execute_blocking(move |conn| {
                let rule_id = log.schedule_rule_id as i64;
                let key = log.date_key.as_str().to_string();

                let rule_exists = conn
                    .query_row(
                        "SELECT 1 FROM schedule_rules WHERE id = ?1",
                        params![rule_id],
                        |_| Ok(()),
                    )
                    .optional()?
                    .is_some();
                if !rule_exists {
                    return Ok(Insert::MissingRule);
                }

                let inserted = conn.execute(
                    "INSERT OR IGNORE INTO completion_logs (schedule_rule_id, date_key)
                     VALUES (?1, ?2)",
                    params![rule_id, key],
                )?;
                if inserted == 0 {
                    return Ok(Insert::Duplicate);
                }
                Ok(Insert::Created(conn.last_insert_rowid() as u64))
            })
            .await
            .map_err(storage_error)?;

        match outcome {
            Insert::Created(id) => Ok(id),
            Insert::MissingRule => Err(RepositoryError::NotFound),
            Insert::Duplicate => Err(RepositoryError::AlreadyExists),
        }
    }

    async fn remove_log(&self, log_id: u64) -> Result<()> {
        let removed = self
            .db
            .execute_blocking(move |conn| {
                conn.execute(
                    "DELETE FROM completion_logs WHERE id = ?1",
                    params![log_id as i64],
                )
            })
            .await
            .map_err(storage_error)?;

        if removed == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_logs(&self) -> Result<Vec<CompletionLog>> {
        let rows = self
            .db
            .execute_blocking(|conn| {
                let mut stmt = conn.prepare("SELECT * FROM completion_logs ORDER BY id")?;
                let rows = stmt.query_map([], Self::row_to_log)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
            })
            .await
            .map_err(storage_error)?;

        rows.into_iter()
            .map(|(id, rule_id, raw_key)| {
                DateKey::parse(&raw_key)
                    .map(|key| CompletionLog::new(id, rule_id, key))
                    .ok_or_else(|| {
                        RepositoryError::InvalidData(format!(
                            "log {} has malformed date key '{}'",
                            id, raw_key
                        ))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn repo() -> SqliteScheduleRepository {
        let db = DatabaseManager::in_memory().unwrap();
        SqliteScheduleRepository::open(db).await.unwrap()
    }

    fn record(subject_id: u64, frequency: &str) -> ScheduleRuleRecord {
        ScheduleRuleRecord {
            id: 0,
            subject_id,
            start_date: "2024-01-01".to_string(),
            time_of_day: "evening".to_string(),
            frequency: Some(frequency.to_string()),
            custom_interval: Some(3),
            duration: None,
        }
    }

    fn new_log(rule_id: u64, day: u32) -> NewCompletionLog {
        NewCompletionLog {
            schedule_rule_id: rule_id,
            date_key: DateKey::from_date(NaiveDate::from_ymd_opt(2024, 1, day).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_rules_round_trip_in_insertion_order() {
        let repo = repo().await;
        let first = repo.add_rule(record(2, "custom")).await.unwrap();
        let second = repo.add_rule(record(1, "daily")).await.unwrap();

        let rules = repo.list_rules().await.unwrap();
        assert_eq!(rules.iter().map(|r| r.id).collect::<Vec<_>>(), vec![first, second]);
        assert_eq!(rules[0].frequency.as_deref(), Some("custom"));
        assert_eq!(rules[0].custom_interval, Some(3));
        assert_eq!(rules[0].time_of_day, "evening");
        assert_eq!(repo.get_rule(second).await.unwrap().map(|r| r.subject_id), Some(1));
        assert_eq!(repo.get_rule(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_log_uniqueness_and_unknown_rule() {
        let repo = repo().await;
        let rule = repo.add_rule(record(1, "daily")).await.unwrap();

        let log_id = repo.add_log(new_log(rule, 4)).await.unwrap();
        assert_eq!(repo.add_log(new_log(rule, 4)).await, Err(RepositoryError::AlreadyExists));
        assert_eq!(repo.add_log(new_log(rule + 10, 4)).await, Err(RepositoryError::NotFound));

        let logs = repo.list_logs().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, log_id);
        assert_eq!(logs[0].date_key.as_str(), "2024-01-04");

        repo.remove_log(log_id).await.unwrap();
        assert_eq!(repo.remove_log(log_id).await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_remove_rule_cascades_logs() {
        let repo = repo().await;
        let keep = repo.add_rule(record(1, "daily")).await.unwrap();
        let gone = repo.add_rule(record(2, "daily")).await.unwrap();
        repo.add_log(new_log(keep, 1)).await.unwrap();
        repo.add_log(new_log(gone, 1)).await.unwrap();
        repo.add_log(new_log(gone, 2)).await.unwrap();

        assert_eq!(repo.remove_rule(gone).await.unwrap(), 2);
        assert_eq!(repo.remove_rule(gone).await, Err(RepositoryError::NotFound));

        let logs = repo.list_logs().await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].schedule_rule_id, keep);
    }

    #[tokio::test]
    async fn test_remove_rules_for_subject_cascades() {
        let repo = repo().await;
        let a = repo.add_rule(record(5, "daily")).await.unwrap();
        repo.add_rule(record(5, "weekly")).await.unwrap();
        repo.add_rule(record(6, "once")).await.unwrap();
        repo.add_log(new_log(a, 1)).await.unwrap();

        assert_eq!(repo.remove_rules_for_subject(5).await.unwrap(), 2);
        assert_eq!(repo.list_rules().await.unwrap().len(), 1);
        assert!(repo.list_logs().await.unwrap().is_empty());
    }
}
