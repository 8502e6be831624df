use std::process::ExitCode;

use chrono::Local;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use court_slot_notifier::{run, AppConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Watching {} courts, window {}-{}, {} push channels",
        config.locations.len(),
        config.time_window.start(),
        config.time_window.end(),
        config.channels.len()
    );

    // Partial failures are only logged; the scheduler sees success unless the run itself broke
    match run(&config, Local::now().date_naive()).await {
        Ok(report) => {
            info!(
                "Run for {} to {} finished: {} slots, {} deliveries",
                report.range.start_param(),
                report.range.end_param(),
                report.slots().len(),
                report.deliveries.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
