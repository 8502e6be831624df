use tracing::{error, info, warn};

use crate::client::SlotSource;
use crate::error::SlotParseError;
use crate::models::location::{LocationCode, LocationTable};
use crate::models::slot::{DateRange, TimeWindow};
use crate::services::maintenance::MaintenanceNotifier;
use crate::services::time_slots::format_available_slots;

/// How the court loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    /// Every court in the table was visited
    Done,
    /// The booking API returned a non-success business code, remaining courts were skipped
    TerminatedEarly { code: LocationCode, envelope_code: i64 },
}

// Result of one pass over the location table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub slots: Vec<String>,
    pub state: FetchState,
    pub courts_requested: usize,
    pub transport_failures: usize,
}

impl FetchOutcome {
    pub fn terminated_early(&self) -> bool {
        matches!(self.state, FetchState::TerminatedEarly { .. })
    }
}

/// Walks the location table and collects rendered available slots
pub struct AvailabilityFetcher<'a, S, M> {
    source: &'a S,
    alerter: &'a M,
    locations: &'a LocationTable,
    window: TimeWindow,
}

impl<'a, S, M> AvailabilityFetcher<'a, S, M>
where
    S: SlotSource,
    M: MaintenanceNotifier,
{
    pub fn new(
        source: &'a S,
        alerter: &'a M,
        locations: &'a LocationTable,
        window: TimeWindow,
    ) -> Self {
        Self {
            source,
            alerter,
            locations,
            window,
        }
    }

    /// Query every court in table order.
    ///
    /// A transport failure raises one maintenance alert and moves on to the next court.
    /// A non-success envelope code stops the loop without alerting; slots gathered
    /// from earlier courts are kept. Malformed slot records are returned as errors.
    pub async fn fetch(&self, range: &DateRange) -> Result<FetchOutcome, SlotParseError> {
        let mut outcome = FetchOutcome {
            slots: Vec::new(),
            state: FetchState::Done,
            courts_requested: 0,
            transport_failures: 0,
        };

        for location in self.locations.iter() {
            outcome.courts_requested += 1;

            let envelope = match self.source.fetch_court(location.code, range).await {
                Ok(envelope) => envelope,
                Err(e) => {
                    error!("Error fetching data for code {}: {}", location.code, e);
                    outcome.transport_failures += 1;
                    self.alerter.alert_maintenance().await;
                    continue;
                }
            };

            if !envelope.is_success() {
                warn!(
                    "Booking API returned code {} for facility {}, skipping remaining courts",
                    envelope.meta.code, location.code
                );
                outcome.state = FetchState::TerminatedEarly {
                    code: location.code,
                    envelope_code: envelope.meta.code,
                };
                break;
            }

            let Some(data) = envelope.data else {
                warn!("Facility {} returned no timeslot data", location.code);
                continue;
            };

            let rendered =
                format_available_slots(&data.facility_timeslots, &location.label, &self.window)?;
            info!(
                "Facility {} ({}): {} matching slots",
                location.code,
                location.label,
                rendered.len()
            );
            outcome.slots.extend(rendered);
        }

        Ok(outcome)
    }
}
