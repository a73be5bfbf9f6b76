//! Display helpers shared by front ends.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeDelta, Timelike, Utc};

use crate::model::{CurrentView, TodayView};

/// Shown wherever a value is missing or unreadable.
pub const PLACEHOLDER: &str = "—";

const COMPASS: [&str; 8] = ["北", "北東", "東", "南東", "南", "南西", "西", "北西"];

/// Round half up, so `-2.5` becomes `-2` and `2.5` becomes `3`.
pub fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

pub fn format_number(v: Option<f64>, suffix: &str) -> String {
    match v {
        Some(n) if n.is_finite() => format!("{}{suffix}", round_half_up(n)),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Parse a timestamp as sent by the connector.
///
/// RFC 3339 strings keep their offset; a bare `YYYY-MM-DDTHH:MM:SS` is taken
/// as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::<FixedOffset>::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ndt| ndt.and_utc())
}

/// `HH:MM` in the local time zone of the machine running this.
pub fn format_time(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Parse `[-]HH:MM[:SS]` into signed minutes. Unreadable parts count as zero.
///
/// `None` when the value does not fit in minutes at all.
pub fn parse_offset_minutes(offset: &str) -> Option<i64> {
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    let parts = offset.replacen('-', "", 1);

    let mut fields = parts.split(':').map(|part| leading_int(part.trim()));
    let hours = fields.next().unwrap_or(0).checked_abs()?;
    let minutes = fields.next().unwrap_or(0);

    hours.checked_mul(60)?.checked_add(minutes)?.checked_mul(sign)
}

/// Integer prefix of `s` (optional sign, then digits); `0` if there is none.
fn leading_int(s: &str) -> i64 {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    let value = digits[..end].parse::<i64>().unwrap_or(0);

    if negative { -value } else { value }
}

/// `HH:MM` at a location whose UTC offset is `offset`.
///
/// The instant is shifted by the offset and read back as UTC, so the local
/// zone of this machine never enters the calculation. Without an offset this
/// falls back to [`format_time`]. An offset too large to apply yields the
/// placeholder.
pub fn format_time_at_offset(raw: Option<&str>, offset: Option<&str>) -> String {
    let Some(base) = raw.and_then(parse_timestamp) else {
        return PLACEHOLDER.to_string();
    };

    let offset = match offset {
        Some(o) if !o.is_empty() => o,
        _ => return format_time(raw),
    };

    let shifted = parse_offset_minutes(offset)
        .and_then(TimeDelta::try_minutes)
        .and_then(|delta| base.checked_add_signed(delta));

    match shifted {
        Some(t) => format!("{:02}:{:02}", t.hour(), t.minute()),
        None => PLACEHOLDER.to_string(),
    }
}

/// Eight-point compass label plus rounded degrees, e.g. `南西 (230°)`.
pub fn wind_direction(deg: Option<f64>) -> String {
    let Some(deg) = deg.filter(|d| d.is_finite()) else {
        return PLACEHOLDER.to_string();
    };

    let idx = round_half_up(deg.rem_euclid(360.0) / 45.0).rem_euclid(8) as usize;
    format!("{} ({}°)", COMPASS[idx], round_half_up(deg))
}

pub fn format_uv(uv: Option<f64>, desc: Option<&str>) -> String {
    match (uv.filter(|v| v.is_finite()), desc) {
        (None, _) => PLACEHOLDER.to_string(),
        (Some(n), Some(desc)) if !desc.is_empty() => format!("{} ({desc})", round_half_up(n)),
        (Some(n), _) => round_half_up(n).to_string(),
    }
}

/// UV reading to display: current conditions first, then the forecast.
///
/// The description always comes from the same source as the index.
pub fn pick_uv<'a>(
    current: &'a CurrentView,
    today: Option<&'a TodayView>,
) -> Option<(f64, Option<&'a str>)> {
    if let Some(uv) = current.uv {
        return Some((uv, current.uv_desc.as_deref()));
    }

    today.and_then(|t| t.uv.map(|uv| (uv, t.uv_desc.as_deref())))
}

/// Emoji for a condition caption; understands English and Japanese keywords.
pub fn condition_emoji(text: Option<&str>) -> &'static str {
    let s = text.unwrap_or_default().to_lowercase();
    let has = |keys: &[&str]| keys.iter().any(|k| s.contains(k));

    if has(&["snow", "雪"]) {
        "❄️"
    } else if has(&["storm", "雷"]) {
        "⛈️"
    } else if has(&["rain", "雨"]) {
        "🌧️"
    } else if has(&["cloud", "曇"]) {
        "☁️"
    } else if has(&["clear", "晴"]) {
        "☀️"
    } else {
        "🌤️"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UnitSystem;

    #[test]
    fn time_at_positive_offset() {
        let out = format_time_at_offset(Some("2024-01-01T00:00:00Z"), Some("09:00:00"));
        assert_eq!(out, "09:00");
    }

    #[test]
    fn time_at_negative_offset_wraps_to_previous_day() {
        let out = format_time_at_offset(Some("2024-01-01T00:00:00Z"), Some("-05:00:00"));
        assert_eq!(out, "19:00");
    }

    #[test]
    fn time_at_offset_with_minutes() {
        let out = format_time_at_offset(Some("2024-01-01T00:00:00Z"), Some("05:30:00"));
        assert_eq!(out, "05:30");

        let out = format_time_at_offset(Some("2024-01-01T00:00:00Z"), Some("-03:30:00"));
        assert_eq!(out, "20:30");
    }

    #[test]
    fn time_at_offset_respects_source_offset_of_timestamp() {
        let out = format_time_at_offset(Some("2024-01-01T09:00:00+09:00"), Some("01:00:00"));
        assert_eq!(out, "01:00");
    }

    #[test]
    fn time_at_offset_placeholder_for_bad_timestamp() {
        assert_eq!(format_time_at_offset(None, Some("09:00:00")), PLACEHOLDER);
        assert_eq!(format_time_at_offset(Some("yesterday"), Some("09:00:00")), PLACEHOLDER);
        assert_eq!(format_time_at_offset(Some("garbage"), None), PLACEHOLDER);
    }

    #[test]
    fn time_without_offset_uses_local_zone() {
        let raw = "2024-01-01T00:00:00Z";
        let expected = parse_timestamp(raw)
            .unwrap()
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();

        assert_eq!(format_time_at_offset(Some(raw), None), expected);
        assert_eq!(format_time_at_offset(Some(raw), Some("")), expected);
        assert_eq!(format_time(Some(raw)), expected);
    }

    #[test]
    fn offset_parsing() {
        assert_eq!(parse_offset_minutes("09:00:00"), Some(540));
        assert_eq!(parse_offset_minutes("-05:00:00"), Some(-300));
        assert_eq!(parse_offset_minutes("-03:30:00"), Some(-210));
        assert_eq!(parse_offset_minutes("+05:45"), Some(345));
        assert_eq!(parse_offset_minutes(" 09:00:00 "), Some(540));
        assert_eq!(parse_offset_minutes("xx:yy"), Some(0));
    }

    #[test]
    fn offset_reads_only_the_leading_integer_of_each_part() {
        assert_eq!(parse_offset_minutes("0 9:00"), Some(0));
        assert_eq!(parse_offset_minutes("09:3 0"), Some(543));
    }

    #[test]
    fn oversized_offset_does_not_fit() {
        assert_eq!(parse_offset_minutes("9223372036854775807:00:00"), None);
        assert_eq!(parse_offset_minutes("-9223372036854775807:00:00"), None);
        assert_eq!(parse_offset_minutes("153722867280912930:08"), None);
    }

    #[test]
    fn time_at_absurd_offset_is_placeholder() {
        let raw = Some("2024-01-01T00:00:00Z");

        assert_eq!(format_time_at_offset(raw, Some("9223372036854775807:00:00")), PLACEHOLDER);
        assert_eq!(format_time_at_offset(raw, Some("99999999999:00:00")), PLACEHOLDER);
        assert_eq!(format_time_at_offset(raw, Some("-99999999999:00:00")), PLACEHOLDER);
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let dt = parse_timestamp("2024-03-10T12:34:56").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (12, 34));
    }

    #[test]
    fn number_formatting_rounds_half_up() {
        assert_eq!(format_number(Some(42.9), "°C"), "43°C");
        assert_eq!(format_number(Some(2.5), "%"), "3%");
        assert_eq!(format_number(Some(-2.5), "°F"), "-2°F");
        assert_eq!(format_number(None, "°C"), PLACEHOLDER);
    }

    #[test]
    fn wind_direction_labels() {
        assert_eq!(wind_direction(Some(0.0)), "北 (0°)");
        assert_eq!(wind_direction(Some(44.0)), "北東 (44°)");
        assert_eq!(wind_direction(Some(230.0)), "南西 (230°)");
        assert_eq!(wind_direction(Some(350.0)), "北 (350°)");
        assert_eq!(wind_direction(Some(-90.0)), "西 (-90°)");
        assert_eq!(wind_direction(None), PLACEHOLDER);
    }

    #[test]
    fn uv_formatting() {
        assert_eq!(format_uv(Some(5.4), Some("Moderate")), "5 (Moderate)");
        assert_eq!(format_uv(Some(5.4), None), "5");
        assert_eq!(format_uv(Some(5.4), Some("")), "5");
        assert_eq!(format_uv(None, Some("High")), PLACEHOLDER);
    }

    #[test]
    fn uv_prefers_current_then_today() {
        let mut current = CurrentView::empty(UnitSystem::Metric);
        let today = TodayView {
            uv: Some(8.0),
            uv_desc: Some("Very high".into()),
            ..TodayView::default()
        };

        assert_eq!(pick_uv(&current, Some(&today)), Some((8.0, Some("Very high"))));

        current.uv = Some(3.0);
        assert_eq!(pick_uv(&current, Some(&today)), Some((3.0, None)));

        assert_eq!(pick_uv(&CurrentView::empty(UnitSystem::Metric), None), None);
    }

    #[test]
    fn emoji_classification() {
        assert_eq!(condition_emoji(Some("Light Snow")), "❄️");
        assert_eq!(condition_emoji(Some("雷雨")), "⛈️");
        assert_eq!(condition_emoji(Some("Rain showers")), "🌧️");
        assert_eq!(condition_emoji(Some("Mostly cloudy")), "☁️");
        assert_eq!(condition_emoji(Some("晴れ")), "☀️");
        assert_eq!(condition_emoji(None), "🌤️");
    }
}
