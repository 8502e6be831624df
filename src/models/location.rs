use std::collections::HashSet;

use crate::error::ConfigError;

/// Facility identifier used by the booking API
pub type LocationCode = u32;

// One bookable court and the label used in notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub code: LocationCode,
    pub label: String,
}

// Courts are queried in the order they appear here
const DEFAULT_COURTS: [(LocationCode, &str); 8] = [
    (100, "SF-C1"),
    (101, "SF-C2"),
    (2, "LG1-C1"),
    (3, "LG1-C2"),
    (4, "LG1-C3"),
    (5, "LG1-C4"),
    (79, "LG1-C5"),
    (80, "LG1-C6"),
];

/// Ordered mapping from facility code to court label
#[derive(Debug, Clone)]
pub struct LocationTable {
    entries: Vec<Location>,
}

impl LocationTable {
    /// Build a table, rejecting repeated codes
    pub fn new<I, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (LocationCode, S)>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut locations = Vec::new();

        for (code, label) in entries {
            if !seen.insert(code) {
                return Err(ConfigError::DuplicateLocation(code));
            }
            locations.push(Location {
                code,
                label: label.into(),
            });
        }

        Ok(Self { entries: locations })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LocationTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_COURTS
                .iter()
                .map(|(code, label)| Location {
                    code: *code,
                    label: label.to_string(),
                })
                .collect(),
        }
    }
}
