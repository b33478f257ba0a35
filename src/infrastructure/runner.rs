use crate::application::services::{
    DashboardService, DashboardSummary, ReminderService, ScheduleService, StartupReminders,
};
use crate::config::{AppConfig, StoreKind};
use crate::domain::entities::snapshot::PlannerSnapshot;
use crate::domain::repositories::ScheduleRepository;
use crate::domain::value_objects::date_key::DATE_KEY_FORMAT;
use crate::infrastructure::database::DatabaseManager;
use crate::infrastructure::repositories::json_storage::load_json;
use crate::infrastructure::repositories::{JsonScheduleRepository, SqliteScheduleRepository};

use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Summary,
    Toggle { rule_id: u64, day: NaiveDate },
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        match args.first().map(String::as_str) {
            None | Some("summary") => Ok(Command::Summary),
            Some("toggle") => {
                let rule_id = args
                    .get(1)
                    .ok_or_else(|| anyhow!("usage: planner toggle <rule-id> <YYYY-MM-DD>"))?
                    .parse::<u64>()
                    .context("rule id must be a number")?;
                let raw_day = args
                    .get(2)
                    .ok_or_else(|| anyhow!("usage: planner toggle <rule-id> <YYYY-MM-DD>"))?;
                let day = NaiveDate::parse_from_str(raw_day, DATE_KEY_FORMAT)
                    .with_context(|| format!("invalid day '{}'", raw_day))?;
                Ok(Command::Toggle { rule_id, day })
            }
            Some(other) => bail!("Unknown command '{}', expected summary or toggle", other),
        }
    }
}

async fn open_repository(config: &AppConfig) -> Result<Arc<dyn ScheduleRepository>> {
    let repo: Arc<dyn ScheduleRepository> = match config.store {
        StoreKind::Sqlite => {
            let db = DatabaseManager::new(&config.db_path)?;
            Arc::new(SqliteScheduleRepository::open(db).await?)
        }
        StoreKind::Json => Arc::new(JsonScheduleRepository::new(&config.json_path)?),
    };
    info!("Using {:?} schedule store", config.store);
    Ok(repo)
}

pub async fn run_planner(config: AppConfig, args: Vec<String>) -> Result<()> {
    let command = Command::parse(&args)?;
    let schedules = ScheduleService::new(open_repository(&config).await?);

    match command {
        Command::Toggle { rule_id, day } => {
            let taken = schedules.toggle_taken(rule_id, day).await?;
            println!(
                "Rule {} on {}: {}",
                rule_id,
                day,
                if taken { "taken" } else { "not taken" }
            );
        }
        Command::Summary => {
            let snapshot: PlannerSnapshot = load_json(&config.snapshot_path).with_context(|| {
                format!("Failed to read snapshot {}", config.snapshot_path.display())
            })?;
            let rules = schedules.rules().await?;
            let logs = schedules.logs().await?;
            let now = Utc::now().with_timezone(&config.timezone);

            let summary = DashboardService::new().summary(&rules, &logs, &snapshot, &now)?;
            let reminders = ReminderService::new().collect(&rules, &logs, &snapshot, &now)?;
            print_summary(&summary);
            print_reminders(&reminders, &config);
        }
    }
    Ok(())
}

fn print_summary(summary: &DashboardSummary) {
    println!("== {} ({}) ==", summary.session_label(), summary.day);
    if summary.doses.is_empty() {
        println!("  no doses planned");
    }
    for dose in &summary.doses {
        let mark = if dose.completed { "x" } else { " " };
        println!("  [{}] {} (rule {})", mark, dose.subject_name, dose.rule_id);
    }
    if !summary.due_soon.is_empty() {
        println!("== Due within 48h ==");
        for task in &summary.due_soon {
            println!("  {} ({:?})", task.title, task.priority);
        }
    }
    if !summary.last_transactions.is_empty() {
        println!(
            "== Wallet: {:.2} over last {} ==",
            summary.wallet_total,
            summary.last_transactions.len()
        );
    }
}

fn print_reminders(reminders: &StartupReminders, config: &AppConfig) {
    if !reminders.should_notify() {
        return;
    }
    println!("== Reminders ==");
    for task in &reminders.upcoming_tasks {
        if let Some(deadline) = task.deadline {
            let local = deadline.with_timezone(&config.timezone);
            println!("  task: {} by {}", task.title, local.format("%A %H:%M"));
        }
    }
    for event in &reminders.tomorrow_events {
        println!(
            "  tomorrow: {} {}-{}",
            event.title,
            event.start_time.as_deref().unwrap_or("?"),
            event.end_time.as_deref().unwrap_or("?")
        );
    }
    for dose in &reminders.pending_doses {
        println!("  take: {} ({})", dose.subject_name, dose.slot);
    }
}
