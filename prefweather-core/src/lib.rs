//! Core library for the `prefweather` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The weather connector abstraction and its MSN Weather implementation
//! - Normalization of connector payloads into display views
//! - Display formatting helpers
//! - The fetch service that drives one request cycle
//!
//! It is used by `prefweather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod format;
pub mod model;
pub mod normalize;
pub mod prefecture;
pub mod provider;
pub mod service;

pub use config::{Config, ConnectorConfig};
pub use model::{
    CurrentView, ForecastDay, TodayView, UnitLabels, UnitSystem, WeatherRequest, WeatherSnapshot,
};
pub use normalize::{pick_current, pick_today, unwrap_envelope};
pub use prefecture::{PREFECTURES, Prefecture};
pub use provider::{ConnectorError, ConnectorOperation, WeatherConnector, connector_from_config};
pub use service::{FetchOutcome, WeatherService};
