use anyhow::{Result, anyhow};
use chrono_tz::Tz;
use std::path::PathBuf;
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Json,
    Sqlite,
}

/// Runtime settings, read from the environment (and `.env` through dotenvy)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreKind,
    pub db_path: PathBuf,
    pub json_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub timezone: Tz,
    pub log_level: Level,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or empty keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let store = match get("PLANNER_STORE").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("sqlite") => StoreKind::Sqlite,
            Some("json") => StoreKind::Json,
            Some(other) => return Err(anyhow!("Unknown PLANNER_STORE '{}', expected json or sqlite", other)),
        };

        let timezone = match get("PLANNER_TIMEZONE") {
            Some(raw) => raw
                .parse::<Tz>()
                .map_err(|e| anyhow!("Invalid PLANNER_TIMEZONE '{}': {}", raw, e))?,
            None => Tz::UTC,
        };

        let log_level = match get("PLANNER_LOG_LEVEL") {
            Some(raw) => raw
                .parse::<Level>()
                .map_err(|e| anyhow!("Invalid PLANNER_LOG_LEVEL '{}': {}", raw, e))?,
            None => Level::INFO,
        };

        Ok(Self {
            store,
            db_path: get("PLANNER_DB_PATH").unwrap_or_else(|| "planner.db".into()).into(),
            json_path: get("PLANNER_JSON_PATH")
                .unwrap_or_else(|| "schedules.json".into())
                .into(),
            snapshot_path: get("PLANNER_SNAPSHOT_PATH")
                .unwrap_or_else(|| "snapshot.json".into())
                .into(),
            timezone,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.store, StoreKind::Sqlite);
        assert_eq!(cfg.db_path, PathBuf::from("planner.db"));
        assert_eq!(cfg.snapshot_path, PathBuf::from("snapshot.json"));
        assert_eq!(cfg.timezone, Tz::UTC);
        assert_eq!(cfg.log_level, Level::INFO);
    }

    #[test]
    fn test_reads_overrides() {
        let cfg = config(&[
            ("PLANNER_STORE", "JSON"),
            ("PLANNER_JSON_PATH", "/tmp/meds.json"),
            ("PLANNER_TIMEZONE", "Europe/Warsaw"),
            ("PLANNER_LOG_LEVEL", "debug"),
            ("PLANNER_DB_PATH", "  "),
        ])
        .unwrap();
        assert_eq!(cfg.store, StoreKind::Json);
        assert_eq!(cfg.json_path, PathBuf::from("/tmp/meds.json"));
        assert_eq!(cfg.timezone, chrono_tz::Europe::Warsaw);
        assert_eq!(cfg.log_level, Level::DEBUG);
        assert_eq!(cfg.db_path, PathBuf::from("planner.db"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(config(&[("PLANNER_STORE", "firestore")]).is_err());
        assert!(config(&[("PLANNER_TIMEZONE", "Mars/Olympus")]).is_err());
        assert!(config(&[("PLANNER_LOG_LEVEL", "loud")]).is_err());
    }
}
