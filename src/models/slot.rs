use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Business code the booking API puts in `meta.code` on success
pub const ENVELOPE_SUCCESS: i64 = 200;

/// Days past today covered by each run
pub const LOOKAHEAD_DAYS: i64 = 7;

// Inclusive date range sent to the booking API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Range covering `today` through `today + 7 days`
    pub fn upcoming_week(today: NaiveDate) -> Self {
        Self {
            start: today,
            end: today + Duration::days(LOOKAHEAD_DAYS),
        }
    }

    /// Start date as the API expects it (`YYYY-MM-DD`)
    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// End date as the API expects it (`YYYY-MM-DD`)
    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

/// Allowed time-of-day window, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvalidWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Window from `start_hour:00` to `end_hour:00`
    pub fn from_hours(start_hour: u32, end_hour: u32) -> Result<Self, ConfigError> {
        let start = NaiveTime::from_hms_opt(start_hour, 0, 0).ok_or(ConfigError::InvalidHour {
            key: "TIME_FILTER_START",
            value: start_hour.to_string(),
        })?;
        let end = NaiveTime::from_hms_opt(end_hour, 0, 0).ok_or(ConfigError::InvalidHour {
            key: "TIME_FILTER_END",
            value: end_hour.to_string(),
        })?;
        Self::new(start, end)
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }
}

// One timeslot record as returned by the booking API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawSlot {
    pub date: String,
    pub start_time: String,
    pub status: String,
}

impl RawSlot {
    pub fn is_available(&self) -> bool {
        self.status == "Available"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub code: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacilityTimeslots {
    #[serde(default)]
    pub facility_timeslots: Vec<RawSlot>,
}

/// Response wrapper of the facility-timeslots endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotEnvelope {
    pub meta: EnvelopeMeta,
    #[serde(default)]
    pub data: Option<FacilityTimeslots>,
}

impl SlotEnvelope {
    pub fn is_success(&self) -> bool {
        self.meta.code == ENVELOPE_SUCCESS
    }
}
