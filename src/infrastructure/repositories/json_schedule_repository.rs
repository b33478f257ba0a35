use crate::domain::entities::completion_log::{CompletionLog, NewCompletionLog};
use crate::domain::entities::schedule_rule::ScheduleRuleRecord;
use crate::domain::repositories::schedule_repository::{RepositoryError, Result, ScheduleRepository};
use crate::infrastructure::repositories::json_storage::{load_json, save_json};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// On-disk layout of the JSON store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSchedules {
    #[serde(default)]
    rules: Vec<ScheduleRuleRecord>,
    #[serde(default)]
    logs: Vec<CompletionLog>,
    #[serde(default)]
    next_rule_id: u64,
    #[serde(default)]
    next_log_id: u64,
}

impl StoredSchedules {
    // keep counters ahead of any id already present in the file
    fn fix_counters(&mut self) {
        let max_rule = self.rules.iter().map(|r| r.id).max().unwrap_or(0);
        let max_log = self.logs.iter().map(|l| l.id).max().unwrap_or(0);
        self.next_rule_id = self.next_rule_id.max(max_rule + 1);
        self.next_log_id = self.next_log_id.max(max_log + 1);
    }
}

/// ScheduleRepository keeping everything in memory and mirroring it to a JSON file.
/// Without a file path it is purely in-memory.
#[derive(Clone)]
pub struct JsonScheduleRepository {
    state: Arc<Mutex<StoredSchedules>>,
    file_path: Option<PathBuf>,
}

impl JsonScheduleRepository {
    pub fn new(file_path: impl AsRef<Path>) -> Result<Self> {
        let path = file_path.as_ref().to_path_buf();
        let mut state: StoredSchedules = load_json(&path)
            .map_err(|e| RepositoryError::StorageError(format!("{}: {}", path.display(), e)))?;
        state.fix_counters();
        debug!(
            "Loaded {} rules and {} logs from {}",
            state.rules.len(),
            state.logs.len(),
            path.display()
        );

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            file_path: Some(path),
        })
    }

    pub fn in_memory() -> Self {
        let mut state = StoredSchedules::default();
        state.fix_counters();
        Self {
            state: Arc::new(Mutex::new(state)),
            file_path: None,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoredSchedules>> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::StorageError("schedule store lock poisoned".to_string()))
    }

    fn save_all(&self, snapshot: &StoredSchedules) -> Result<()> {
        match &self.file_path {
            Some(path) => save_json(snapshot, path)
                .map_err(|e| RepositoryError::StorageError(format!("{}: {}", path.display(), e))),
            None => Ok(()),
        }
    }

    /// Applies `change` to a copy of the state and persists it under the lock.
    /// Memory only moves forward once the file has been written.
    fn commit<T>(&self, change: impl FnOnce(&mut StoredSchedules) -> Result<T>) -> Result<T> {
        let mut state = self.lock()?;
        let mut draft = state.clone();
        let outcome = change(&mut draft)?;
        self.save_all(&draft)?;
        *state = draft;
        Ok(outcome)
    }
}

#[async_trait]
impl ScheduleRepository for JsonScheduleRepository {
    async fn add_rule(&self, mut rule: ScheduleRuleRecord) -> Result<u64> {
        self.commit(|state| {
            let id = state.next_rule_id;
            state.next_rule_id += 1;
            rule.id = id;
            state.rules.push(rule);
            Ok(id)
        })
    }

    async fn list_rules(&self) -> Result<Vec<ScheduleRuleRecord>> {
        Ok(self.lock()?.rules.clone())
    }

    async fn get_rule(&self, rule_id: u64) -> Result<Option<ScheduleRuleRecord>> {
        Ok(self.lock()?.rules.iter().find(|r| r.id == rule_id).cloned())
    }

    async fn remove_rule(&self, rule_id: u64) -> Result<usize> {
        self.commit(|state| {
            let before = state.rules.len();
            state.rules.retain(|r| r.id != rule_id);
            if state.rules.len() == before {
                return Err(RepositoryError::NotFound);
            }

            let logs_before = state.logs.len();
            state.logs.retain(|l| l.schedule_rule_id != rule_id);
            Ok(logs_before - state.logs.len())
        })
    }

    async fn remove_rules_for_subject(&self, subject_id: u64) -> Result<usize> {
        let has_rules = self.lock()?.rules.iter().any(|r| r.subject_id == subject_id);
        if !has_rules {
            return Ok(0);
        }

        self.commit(|state| {
            let doomed: Vec<u64> = state
                .rules
                .iter()
                .filter(|r| r.subject_id == subject_id)
                .map(|r| r.id)
                .collect();
            state.rules.retain(|r| r.subject_id != subject_id);
            state.logs.retain(|l| !doomed.contains(&l.schedule_rule_id));
            Ok(doomed.len())
        })
    }

    async fn add_log(&self, log: NewCompletionLog) -> Result<u64> {
        self.commit(|state| {
            if !state.rules.iter().any(|r| r.id == log.schedule_rule_id) {
                return Err(RepositoryError::NotFound);
            }
            if state
                .logs
                .iter()
                .any(|l| l.matches(log.schedule_rule_id, &log.date_key))
            {
                return Err(RepositoryError::AlreadyExists);
            }

            let id = state.next_log_id;
            state.next_log_id += 1;
            state
                .logs
                .push(CompletionLog::new(id, log.schedule_rule_id, log.date_key));
            Ok(id)
        })
    }

    async fn remove_log(&self, log_id: u64) -> Result<()> {
        self.commit(|state| {
            let before = state.logs.len();
            state.logs.retain(|l| l.id != log_id);
            if state.logs.len() == before {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        })
    }

    async fn list_logs(&self) -> Result<Vec<CompletionLog>> {
        Ok(self.lock()?.logs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::DateKey;
    use chrono::NaiveDate;

    fn record(subject_id: u64) -> ScheduleRuleRecord {
        ScheduleRuleRecord {
            id: 0,
            subject_id,
            start_date: "2024-01-01".to_string(),
            time_of_day: "morning".to_string(),
            frequency: Some("daily".to_string()),
            custom_interval: None,
            duration: None,
        }
    }

    fn new_log(rule_id: u64, day: u32) -> NewCompletionLog {
        NewCompletionLog {
            schedule_rule_id: rule_id,
            date_key: DateKey::from_date(NaiveDate::from_ymd_opt(2024, 1, day).unwrap()),
        }
    }

    fn temp_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("planner-{}-{}.json", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[tokio::test]
    async fn test_rules_keep_insertion_order() {
        let repo = JsonScheduleRepository::in_memory();
        for subject in [30, 10, 20] {
            repo.add_rule(record(subject)).await.unwrap();
        }
        let subjects: Vec<u64> = repo
            .list_rules()
            .await
            .unwrap()
            .iter()
            .map(|r| r.subject_id)
            .collect();
        assert_eq!(subjects, vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn test_duplicate_log_is_rejected() {
        let repo = JsonScheduleRepository::in_memory();
        let rule = repo.add_rule(record(1)).await.unwrap();

        repo.add_log(new_log(rule, 1)).await.unwrap();
        assert_eq!(repo.add_log(new_log(rule, 1)).await, Err(RepositoryError::AlreadyExists));
        assert_eq!(repo.add_log(new_log(rule + 1, 1)).await, Err(RepositoryError::NotFound));
        assert_eq!(repo.list_logs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_missing_records() {
        let repo = JsonScheduleRepository::in_memory();
        assert_eq!(repo.remove_rule(9).await, Err(RepositoryError::NotFound));
        assert_eq!(repo.remove_log(9).await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_state_survives_reload() {
        let path = temp_file("reload");
        {
            let repo = JsonScheduleRepository::new(&path).unwrap();
            let a = repo.add_rule(record(1)).await.unwrap();
            let b = repo.add_rule(record(2)).await.unwrap();
            repo.add_log(new_log(a, 2)).await.unwrap();
            repo.add_log(new_log(b, 2)).await.unwrap();
            assert_eq!(repo.remove_rule(b).await.unwrap(), 1);
        }

        let reopened = JsonScheduleRepository::new(&path).unwrap();
        let rules = reopened.list_rules().await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].subject_id, 1);
        assert_eq!(reopened.list_logs().await.unwrap().len(), 1);

        // ids keep growing after a reload
        let c = reopened.add_rule(record(3)).await.unwrap();
        assert!(c > rules[0].id);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_writers_leave_a_readable_file() {
        let path = temp_file("concurrent");
        let repo = JsonScheduleRepository::new(&path).unwrap();

        let handles: Vec<_> = (0..64)
            .map(|subject| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.add_rule(record(subject)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let reopened = JsonScheduleRepository::new(&path).unwrap();
        let mut ids: Vec<u64> = reopened.list_rules().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 64);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 64);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_state_untouched() {
        let dir = std::env::temp_dir().join(format!("planner-missing-dir-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let repo = JsonScheduleRepository::new(dir.join("schedules.json")).unwrap();

        assert!(matches!(
            repo.add_rule(record(1)).await,
            Err(RepositoryError::StorageError(_))
        ));
        assert!(repo.list_rules().await.unwrap().is_empty());

        std::fs::create_dir_all(&dir).unwrap();
        assert_eq!(repo.add_rule(record(1)).await.unwrap(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
