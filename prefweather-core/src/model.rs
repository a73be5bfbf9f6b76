use anyhow::Context;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::{convert::TryFrom, fmt};

use crate::prefecture::Prefecture;

/// Unit system understood by the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Name sent to the connector as the `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "Metric",
            UnitSystem::Imperial => "Imperial",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Imperial]
    }

    /// Labels used when the provider does not send its own.
    pub fn default_labels(&self) -> UnitLabels {
        match self {
            UnitSystem::Metric => UnitLabels::new("°C", "km/h"),
            UnitSystem::Imperial => UnitLabels::new("°F", "mph"),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported unit systems: Metric, Imperial."
            )),
        }
    }
}

/// Which forecast operation accompanies the current conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ForecastDay {
    #[default]
    Today,
    Tomorrow,
}

/// Key of a fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub prefecture: Prefecture,
    pub units: UnitSystem,
    pub day: ForecastDay,
}

impl WeatherRequest {
    pub fn new(prefecture: Prefecture, units: UnitSystem) -> Self {
        Self { prefecture, units, day: ForecastDay::Today }
    }

    pub fn with_day(mut self, day: ForecastDay) -> Self {
        self.day = day;
        self
    }

    /// Location text as the connector expects it, e.g. `大阪府, 日本`.
    pub fn location_text(&self) -> String {
        self.prefecture.location_text()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitLabels {
    pub temp: String,
    pub speed: String,
}

impl UnitLabels {
    pub fn new(temp: impl Into<String>, speed: impl Into<String>) -> Self {
        Self { temp: temp.into(), speed: speed.into() }
    }
}

/// Flattened current conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentView {
    pub temperature: Option<f64>,
    pub condition: Option<String>,
    /// Relative humidity, percent.
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    /// Degrees.
    pub wind_dir: Option<f64>,
    pub observed_at: Option<String>,
    pub location: Option<String>,
    pub nowcast_summary: Option<String>,
    pub alert_title: Option<String>,
    pub uv: Option<f64>,
    pub uv_desc: Option<String>,
    pub unit_labels: UnitLabels,
}

impl CurrentView {
    /// View with nothing but the labels for `units`.
    pub fn empty(units: UnitSystem) -> Self {
        Self {
            temperature: None,
            condition: None,
            humidity: None,
            wind_speed: None,
            wind_dir: None,
            observed_at: None,
            location: None,
            nowcast_summary: None,
            alert_title: None,
            uv: None,
            uv_desc: None,
            unit_labels: units.default_labels(),
        }
    }
}

/// Flattened daily forecast.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodayView {
    pub high: Option<f64>,
    pub low: Option<f64>,
    /// Precipitation probability, percent.
    pub precip: Option<f64>,
    pub day_caption: Option<String>,
    pub night_caption: Option<String>,
    pub valid: Option<String>,
    pub uv: Option<f64>,
    pub uv_desc: Option<String>,
    /// UTC instant.
    pub sunrise: Option<String>,
    /// UTC instant.
    pub sunset: Option<String>,
    /// `[-]HH:MM:SS`
    pub utc_offset: Option<String>,
}

/// Everything one fetch cycle produced.
#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    pub request: WeatherRequest,
    pub fetched_at: DateTime<Utc>,
    pub current_raw: Value,
    pub forecast_raw: Value,
    pub current: CurrentView,
    pub today: Option<TodayView>,
}

impl WeatherSnapshot {
    /// Both raw payloads as `{"cw": ..., "today": ...}`.
    pub fn raw_json(&self) -> Value {
        json!({ "cw": self.current_raw, "today": self.forecast_raw })
    }

    pub fn raw_json_pretty(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(&self.raw_json()).context("Failed to serialize raw payloads")
    }
}
