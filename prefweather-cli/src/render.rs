//! Plain-text rendering of a fetched snapshot.

use std::fmt::Write as _;

use chrono::Local;
use prefweather_core::{
    ForecastDay, WeatherSnapshot,
    format::{
        PLACEHOLDER, condition_emoji, format_number, format_time, format_time_at_offset,
        format_uv, pick_uv, round_half_up, wind_direction,
    },
};

pub const NO_DATA: &str = "データなし";

pub fn render(snapshot: &WeatherSnapshot) -> String {
    let mut out = String::new();
    let c = &snapshot.current;
    let d = snapshot.today.as_ref();
    let labels = &c.unit_labels;

    if let Some(alert) = &c.alert_title {
        let _ = writeln!(out, "⚠️  {alert}");
    }

    let _ = writeln!(
        out,
        "{}  {}  {}",
        condition_emoji(c.condition.as_deref()),
        format_number(c.temperature, &labels.temp),
        c.condition.as_deref().unwrap_or(PLACEHOLDER),
    );

    match &c.location {
        Some(location) => {
            let _ = writeln!(out, "{location} / {}", snapshot.request.prefecture);
        }
        None => {
            let _ = writeln!(out, "{}", snapshot.request.prefecture);
        }
    }

    if let Some(summary) = &c.nowcast_summary {
        let _ = writeln!(out, "{summary}");
    }

    if let Some(d) = d {
        if d.day_caption.is_some() || d.night_caption.is_some() {
            let heading = match snapshot.request.day {
                ForecastDay::Today => "今日",
                ForecastDay::Tomorrow => "明日",
            };
            let _ = write!(out, "{heading}: {}", d.day_caption.as_deref().unwrap_or(PLACEHOLDER));
            if let Some(night) = &d.night_caption {
                let _ = write!(out, " ／ 夜: {night}");
            }
            out.push('\n');
        }

        if d.sunrise.is_some() || d.sunset.is_some() {
            let offset = d.utc_offset.as_deref();
            let _ = writeln!(
                out,
                "🌅 {}  🌇 {}",
                format_time_at_offset(d.sunrise.as_deref(), offset),
                format_time_at_offset(d.sunset.as_deref(), offset),
            );
        }
    }

    let mut stats: Vec<(&str, String)> = Vec::new();

    if let Some(d) = d {
        if let Some(high) = d.high {
            stats.push(("最高", format!("{}{}", round_half_up(high), labels.temp)));
        }
        if let Some(low) = d.low {
            stats.push(("最低", format!("{}{}", round_half_up(low), labels.temp)));
        }
        if let Some(precip) = d.precip {
            stats.push(("降水確率", format!("{}%", round_half_up(precip))));
        }
    }

    if let Some(rh) = c.humidity {
        stats.push(("湿度", format!("{}%", round_half_up(rh))));
    }
    if let Some(speed) = c.wind_speed {
        stats.push(("風", format!("{} {}", round_half_up(speed), labels.speed)));
    }
    if c.wind_dir.is_some() {
        stats.push(("風向", wind_direction(c.wind_dir)));
    }
    if c.observed_at.is_some() {
        stats.push(("更新", format_time(c.observed_at.as_deref())));
    }
    if let Some((uv, desc)) = pick_uv(c, d) {
        stats.push(("UV指数", format_uv(Some(uv), desc)));
    }

    if !stats.is_empty() {
        out.push('\n');
        for (label, value) in stats {
            let _ = writeln!(out, "  {label}: {value}");
        }
    }

    let _ = writeln!(
        out,
        "\n取得 {} ({})",
        snapshot.fetched_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
        snapshot.request.units,
    );

    out
}
