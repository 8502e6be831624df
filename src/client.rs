use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

#[cfg(test)]
use mockall::automock;

use crate::config::AlumniConfig;
use crate::error::UpstreamError;
use crate::models::location::LocationCode;
use crate::models::slot::{DateRange, SlotEnvelope};

/// Source of per-court timeslot envelopes
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SlotSource: Send + Sync {
    /// Fetch the raw envelope for one court over `range`
    async fn fetch_court(
        &self,
        code: LocationCode,
        range: &DateRange,
    ) -> Result<SlotEnvelope, UpstreamError>;
}

/// Client for the alumni facility booking API
pub struct AlumniClient {
    client: Client,
    fetch_url: String,
    user_agent: String,
    authorization: String,
    timeout: Duration,
}

impl AlumniClient {
    pub fn new(client: Client, config: &AlumniConfig) -> Self {
        Self {
            client,
            fetch_url: config.fetch_url.clone(),
            user_agent: config.user_agent.clone(),
            authorization: config.authorization.clone(),
            timeout: config.timeout,
        }
    }

    /// Fill the `{id}`, `{startdate}` and `{enddate}` placeholders of the URL template
    pub fn court_url(&self, code: LocationCode, range: &DateRange) -> String {
        self.fetch_url
            .replace("{id}", &code.to_string())
            .replace("{startdate}", &range.start_param())
            .replace("{enddate}", &range.end_param())
    }
}

#[async_trait]
impl SlotSource for AlumniClient {
    async fn fetch_court(
        &self,
        code: LocationCode,
        range: &DateRange,
    ) -> Result<SlotEnvelope, UpstreamError> {
        let url = self.court_url(code, range);

        info!("Requesting timeslots for facility {}", code);
        debug!("API URL: {}", url);

        let res = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .header(AUTHORIZATION, &self.authorization)
            .timeout(self.timeout)
            .send()
            .await?;
        info!("Response received with status: {}", res.status());

        if !res.status().is_success() {
            return Err(UpstreamError::Status(res.status()));
        }

        let envelope = res.json::<SlotEnvelope>().await?;
        Ok(envelope)
    }
}
