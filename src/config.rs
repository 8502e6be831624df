use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::ConfigError;
use crate::models::location::LocationTable;
use crate::models::slot::TimeWindow;

pub const DEFAULT_FETCH_URL: &str = "https://w5.ab.ust.hk/msalum/api/app/fbs/facility-timeslots?facility_id={id}&start_date={startdate}&end_date={enddate}";
pub const DEFAULT_PUSHDEER_URL: &str = "https://api2.pushdeer.com/message/push";
pub const DEFAULT_FEISHU_HOOK_BASE: &str = "https://open.feishu.cn/open-apis/bot/v2/hook";
pub const DEFAULT_LARK_HOOK_BASE: &str = "https://open.larksuite.com/open-apis/bot/v2/hook";

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(2);

/// Data sources the tool knows how to poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Alumni,
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alumni" => Ok(Platform::Alumni),
            other => Err(other.to_string()),
        }
    }
}

/// Push backends that can be listed in `PUSH_CHANNEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelName {
    PushDeer,
    FeishuBot,
    LarkBot,
}

impl ChannelName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelName::PushDeer => "pushdeer",
            ChannelName::FeishuBot => "feishubot",
            ChannelName::LarkBot => "larkbot",
        }
    }
}

impl FromStr for ChannelName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pushdeer" => Ok(ChannelName::PushDeer),
            "feishubot" => Ok(ChannelName::FeishuBot),
            "larkbot" => Ok(ChannelName::LarkBot),
            other => Err(other.to_string()),
        }
    }
}

impl std::fmt::Display for ChannelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An enabled push channel together with its secret(s)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelConfig {
    /// Broadcast to every token
    PushDeer { tokens: Vec<String> },
    FeishuBot { token: String },
    LarkBot { token: String },
}

impl ChannelConfig {
    pub fn name(&self) -> ChannelName {
        match self {
            ChannelConfig::PushDeer { .. } => ChannelName::PushDeer,
            ChannelConfig::FeishuBot { .. } => ChannelName::FeishuBot,
            ChannelConfig::LarkBot { .. } => ChannelName::LarkBot,
        }
    }
}

// Booking API settings, only present when the alumni platform is enabled
#[derive(Debug, Clone)]
pub struct AlumniConfig {
    pub fetch_url: String,
    pub user_agent: String,
    pub authorization: String,
    pub timeout: Duration,
}

// Where notifications are delivered
#[derive(Debug, Clone)]
pub struct NotifyEndpoints {
    pub pushdeer_url: String,
    pub feishu_hook_base: String,
    pub lark_hook_base: String,
    pub timeout: Duration,
}

impl Default for NotifyEndpoints {
    fn default() -> Self {
        Self {
            pushdeer_url: DEFAULT_PUSHDEER_URL.to_string(),
            feishu_hook_base: DEFAULT_FEISHU_HOOK_BASE.to_string(),
            lark_hook_base: DEFAULT_LARK_HOOK_BASE.to_string(),
            timeout: NOTIFY_TIMEOUT,
        }
    }
}

/// Everything a run needs, built once at startup and passed down explicitly
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub platforms: Vec<Platform>,
    pub alumni: Option<AlumniConfig>,
    pub channels: Vec<ChannelConfig>,
    pub maintenance_token: Option<String>,
    pub time_window: TimeWindow,
    pub locations: LocationTable,
    pub endpoints: NotifyEndpoints,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read a dotenv file; keys missing from it fall back to the process environment
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for item in dotenv::from_path_iter(path.as_ref())? {
            let (key, value) = item?;
            values.insert(key, value);
        }

        info!("Loaded {} settings from {}", values.len(), path.as_ref().display());
        Self::from_lookup(|key| values.get(key).cloned().or_else(|| env::var(key).ok()))
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let platforms = parse_platforms(&require("PLATFORMS")?);

        let alumni = if platforms.contains(&Platform::Alumni) {
            Some(AlumniConfig {
                fetch_url: lookup("ALUMNI_FETCH_URL")
                    .unwrap_or_else(|| DEFAULT_FETCH_URL.to_string()),
                user_agent: require("ALUMNI_USER_AGENT")?,
                authorization: require("ALUMNI_AUTHORIZATION")?,
                timeout: FETCH_TIMEOUT,
            })
        } else {
            None
        };

        let mut channels = Vec::new();
        for name in split_list(&require("PUSH_CHANNEL")?) {
            match name.parse::<ChannelName>() {
                Ok(ChannelName::PushDeer) => {
                    let tokens = split_list(&require("PUSHDEER_TOKEN")?);
                    if tokens.is_empty() {
                        return Err(ConfigError::Empty("PUSHDEER_TOKEN"));
                    }
                    channels.push(ChannelConfig::PushDeer { tokens })
                }
                Ok(ChannelName::FeishuBot) => channels.push(ChannelConfig::FeishuBot {
                    token: require("FEISHUBOT_TOKEN")?,
                }),
                Ok(ChannelName::LarkBot) => channels.push(ChannelConfig::LarkBot {
                    token: require("LARKBOT_TOKEN")?,
                }),
                Err(unknown) => warn!("Unsupported push channel: {}", unknown),
            }
        }

        let start_hour = parse_hour(&lookup, "TIME_FILTER_START", 9)?;
        let end_hour = parse_hour(&lookup, "TIME_FILTER_END", 22)?;
        let time_window = TimeWindow::from_hours(start_hour, end_hour)?;

        let defaults = NotifyEndpoints::default();
        let endpoints = NotifyEndpoints {
            pushdeer_url: lookup("PUSHDEER_URL").unwrap_or(defaults.pushdeer_url),
            feishu_hook_base: lookup("FEISHUBOT_HOOK_BASE")
                .unwrap_or(defaults.feishu_hook_base),
            lark_hook_base: lookup("LARKBOT_HOOK_BASE").unwrap_or(defaults.lark_hook_base),
            timeout: defaults.timeout,
        };

        let maintenance_token =
            lookup("PUSHDEER_MAINTAIN_TOKEN").filter(|t| !t.trim().is_empty());
        if maintenance_token.is_none() {
            warn!("PUSHDEER_MAINTAIN_TOKEN is not set, maintenance alerts are disabled");
        }

        Ok(Self {
            platforms,
            alumni,
            channels,
            maintenance_token,
            time_window,
            locations: LocationTable::default(),
            endpoints,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_platforms(raw: &str) -> Vec<Platform> {
    split_list(raw)
        .into_iter()
        .filter_map(|name| match name.parse::<Platform>() {
            Ok(platform) => Some(platform),
            Err(unknown) => {
                warn!("Unsupported platform: {}", unknown);
                None
            }
        })
        .collect()
}

fn parse_hour<F>(lookup: &F, key: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidHour { key, value }),
        None => Ok(default),
    }
}
