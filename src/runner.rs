use chrono::NaiveDate;
use reqwest::Client;
use tracing::{error, info, warn};

use crate::client::AlumniClient;
use crate::config::{AppConfig, ChannelName};
use crate::error::AppError;
use crate::models::slot::DateRange;
use crate::services::fetcher::{AvailabilityFetcher, FetchOutcome, FetchState};
use crate::services::maintenance::MaintenanceAlerter;
use crate::services::notify::{NotificationDispatcher, SendResult};

// Summary of a single fetch + notify cycle
#[derive(Debug, Clone)]
pub struct RunReport {
    pub range: DateRange,
    pub fetch: Option<FetchOutcome>,
    pub deliveries: Vec<(ChannelName, SendResult)>,
}

impl RunReport {
    pub fn slots(&self) -> &[String] {
        self.fetch.as_ref().map(|f| f.slots.as_slice()).unwrap_or(&[])
    }

    /// True when no court could be reached or the booking API rejected the session
    pub fn upstream_unhealthy(&self) -> bool {
        match &self.fetch {
            Some(outcome) => {
                outcome.terminated_early()
                    || (outcome.courts_requested > 0
                        && outcome.transport_failures == outcome.courts_requested)
            }
            None => false,
        }
    }

    pub fn failed_channels(&self) -> Vec<ChannelName> {
        self.deliveries
            .iter()
            .filter(|(_, result)| matches!(result, SendResult::Failed(_)))
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Run one fetch + notify cycle for the week starting at `today`
pub async fn run(config: &AppConfig, today: NaiveDate) -> Result<RunReport, AppError> {
    let range = DateRange::upcoming_week(today);
    let http = Client::new();

    info!(
        "Starting the data fetching process for {} to {}",
        range.start_param(),
        range.end_param()
    );

    if config.alumni.is_some() && config.locations.is_empty() {
        warn!("Location table is empty, no court will be requested");
    }

    let fetch = match &config.alumni {
        Some(alumni) => {
            let source = AlumniClient::new(http.clone(), alumni);
            let alerter = MaintenanceAlerter::new(http.clone(), config);
            let fetcher =
                AvailabilityFetcher::new(&source, &alerter, &config.locations, config.time_window);
            Some(fetcher.fetch(&range).await?)
        }
        None => {
            warn!("No supported platform enabled, skipping slot fetch");
            None
        }
    };

    if let Some(outcome) = &fetch {
        if let FetchState::TerminatedEarly { code, envelope_code } = outcome.state {
            warn!(
                "Fetch stopped at facility {} with business code {}",
                code, envelope_code
            );
        }
        info!("Available slots: {:?}", outcome.slots);
    }

    let dispatcher = NotificationDispatcher::new(http, config);
    let slots = fetch.as_ref().map(|f| f.slots.clone()).unwrap_or_default();
    let deliveries = dispatcher.dispatch(&slots).await;

    let report = RunReport {
        range,
        fetch,
        deliveries,
    };

    if report.upstream_unhealthy() {
        error!("Booking API looks unhealthy this run; check the authorization header");
    }
    let failed = report.failed_channels();
    if !failed.is_empty() {
        warn!("Notification failed for channels: {:?}", failed);
    }

    Ok(report)
}
