use crate::{Config, UnitSystem, provider::msn::MsnWeatherConnector};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

pub mod msn;

/// Connector operations this crate calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorOperation {
    CurrentWeather,
    TodaysForecast,
    TomorrowsForecast,
}

impl ConnectorOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorOperation::CurrentWeather => "CurrentWeather",
            ConnectorOperation::TodaysForecast => "TodaysForecast",
            ConnectorOperation::TomorrowsForecast => "TomorrowsForecast",
        }
    }

    /// Path segments between the connection id and the location.
    pub fn path_segments(&self) -> &'static [&'static str] {
        match self {
            ConnectorOperation::CurrentWeather => &["current"],
            ConnectorOperation::TodaysForecast => &["forecast", "today"],
            ConnectorOperation::TomorrowsForecast => &["forecast", "tomorrow"],
        }
    }
}

impl std::fmt::Display for ConnectorOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed failures of a connector call.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("{operation} request failed with status {status}: {body}")]
    Status {
        operation: ConnectorOperation,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid connector URL '{0}'")]
    InvalidUrl(String),
}

#[async_trait]
pub trait WeatherConnector: Send + Sync + Debug {
    /// Establish session context. Called at most once per service.
    async fn initialize(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Run `operation` for a free-text location; returns the response as received.
    async fn call(
        &self,
        operation: ConnectorOperation,
        location: &str,
        units: UnitSystem,
    ) -> anyhow::Result<Value>;
}

/// Construct the MSN Weather connector from config.
pub fn connector_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherConnector>> {
    let settings = config.connector_settings()?;

    let connector = MsnWeatherConnector::new(
        settings.base_url.clone(),
        settings.connection_id.clone(),
        settings.api_token.clone(),
    )?;

    Ok(Box::new(connector))
}
