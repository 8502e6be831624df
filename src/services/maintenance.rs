use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info, warn};

#[cfg(test)]
use mockall::automock;

use crate::config::AppConfig;

/// Text pushed to the operator when the booking API stops accepting our credentials
pub const MAINTENANCE_MESSAGE: &str = "[抢场地]AUTHORIZATION过期了";

/// Operator-facing alert raised when the upstream session looks expired
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MaintenanceNotifier: Send + Sync {
    /// Send the alert. Failures are logged, never returned.
    async fn alert_maintenance(&self);
}

/// Sends the maintenance alert through pushdeer with a dedicated token
pub struct MaintenanceAlerter {
    client: Client,
    pushdeer_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl MaintenanceAlerter {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            pushdeer_url: config.endpoints.pushdeer_url.clone(),
            token: config.maintenance_token.clone(),
            timeout: config.endpoints.timeout,
        }
    }
}

#[async_trait]
impl MaintenanceNotifier for MaintenanceAlerter {
    async fn alert_maintenance(&self) {
        let Some(token) = self.token.as_deref() else {
            warn!("No maintenance token configured, skipping maintenance notification");
            return;
        };

        let result = self
            .client
            .get(&self.pushdeer_url)
            .query(&[("pushkey", token), ("text", MAINTENANCE_MESSAGE)])
            .timeout(self.timeout)
            .send()
            .await;

        match result {
            Ok(res) if res.status() == reqwest::StatusCode::OK => {
                info!("Maintenance notification sent successfully.");
            }
            Ok(res) => {
                warn!(
                    "Failed to send maintenance notification. Status code: {}",
                    res.status()
                );
            }
            Err(e) => {
                error!("Error sending maintenance notification: {}", e);
            }
        }
    }
}
