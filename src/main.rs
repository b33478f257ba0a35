use dotenvy::dotenv;
use planner::config::AppConfig;
use planner::infrastructure::runner::run_planner;
use planner::utils;
use tracing::error;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {:#}", e);
            std::process::exit(2);
        }
    };
    utils::setup_logging(config.log_level);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run_planner(config, args).await {
        error!("Error running planner: {:#}", e);
        std::process::exit(1);
    }
}
