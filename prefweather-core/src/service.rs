//! One fetch cycle: current conditions plus a forecast, requested together.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use chrono::Utc;
use tokio::sync::OnceCell;

use crate::{
    model::{ForecastDay, WeatherRequest, WeatherSnapshot},
    normalize::{pick_current, pick_today, unwrap_envelope},
    provider::{ConnectorOperation, WeatherConnector},
};

/// Result of [`WeatherService::fetch`].
#[derive(Debug)]
pub enum FetchOutcome {
    /// The most recently issued cycle finished.
    Fresh(Box<WeatherSnapshot>),
    /// A newer cycle was issued while this one was in flight; its data was dropped.
    Superseded(WeatherRequest),
}

impl FetchOutcome {
    pub fn into_snapshot(self) -> Option<WeatherSnapshot> {
        match self {
            FetchOutcome::Fresh(snapshot) => Some(*snapshot),
            FetchOutcome::Superseded(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct WeatherService {
    connector: Box<dyn WeatherConnector>,
    initialized: OnceCell<()>,
    latest: AtomicU64,
}

impl WeatherService {
    pub fn new(connector: Box<dyn WeatherConnector>) -> Self {
        Self { connector, initialized: OnceCell::new(), latest: AtomicU64::new(0) }
    }

    /// Run connector initialization once. Failure is logged and otherwise ignored.
    pub async fn initialize(&self) {
        self.initialized
            .get_or_init(|| async {
                match self.connector.initialize().await {
                    Ok(()) => tracing::info!("connector initialized"),
                    Err(e) => tracing::error!(error = %format!("{e:#}"), "connector initialization failed"),
                }
            })
            .await;
    }

    /// Fetch current conditions and the requested forecast concurrently.
    ///
    /// Fails if either call fails. In-flight cycles are never aborted, but
    /// only the most recently issued one is returned as
    /// [`FetchOutcome::Fresh`].
    pub async fn fetch(&self, request: &WeatherRequest) -> Result<FetchOutcome> {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.initialize().await;

        let location = request.location_text();
        let forecast_op = match request.day {
            ForecastDay::Today => ConnectorOperation::TodaysForecast,
            ForecastDay::Tomorrow => ConnectorOperation::TomorrowsForecast,
        };

        tracing::info!(seq, location = %location, units = %request.units, "fetching weather");

        let joined = tokio::try_join!(
            self.connector.call(ConnectorOperation::CurrentWeather, &location, request.units),
            self.connector.call(forecast_op, &location, request.units),
        );

        let (current_res, forecast_res) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(seq, location = %location, error = %format!("{e:#}"), "weather fetch failed");
                return Err(e);
            }
        };

        if self.latest.load(Ordering::SeqCst) != seq {
            tracing::debug!(seq, location = %location, "discarding superseded weather fetch");
            return Ok(FetchOutcome::Superseded(request.clone()));
        }

        let current_raw = unwrap_envelope(&current_res).clone();
        let forecast_raw = unwrap_envelope(&forecast_res).clone();

        let snapshot = WeatherSnapshot {
            request: request.clone(),
            fetched_at: Utc::now(),
            current: pick_current(Some(&current_raw), request.units),
            today: pick_today(Some(&forecast_raw)),
            current_raw,
            forecast_raw,
        };

        tracing::info!(seq, has_forecast = snapshot.today.is_some(), "weather fetch complete");

        Ok(FetchOutcome::Fresh(Box::new(snapshot)))
    }
}
