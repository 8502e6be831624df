//! Court Slot Notifier
//!
//! Polls the alumni facility booking API for free sports-court time slots,
//! keeps the ones inside a configured time-of-day window and pushes a short
//! summary to pushdeer, feishu and lark bots.
//!
//! # Modules
//!
//! - `config`: `AppConfig` built once from `.env` / environment variables
//! - `client`: `AlumniClient` for the booking API, behind the `SlotSource` trait
//! - `services`: slot filtering, the court fetch loop, maintenance alerts and push dispatch
//! - `runner`: one complete fetch + notify cycle
//!
//! # Failure handling
//!
//! Transport failures on a court raise a maintenance alert and the loop moves on.
//! A non-success business code from the API ends the loop early. Push failures
//! are logged per channel and never stop the other channels.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod runner;
pub mod services;


// Re-export the main API types for ease of use
pub use client::{AlumniClient, SlotSource};
pub use config::{AppConfig, ChannelConfig, ChannelName};
pub use error::{AppError, ConfigError, NotifyError, SlotParseError, UpstreamError};
pub use runner::{run, RunReport};
pub use services::fetcher::{AvailabilityFetcher, FetchOutcome, FetchState};
pub use services::notify::NotificationDispatcher;
