//! Projection of connector payloads into display views.
//!
//! Payloads are loosely shaped JSON. Every field is optional and nothing in
//! here fails: a missing or mistyped field simply leaves the view field unset.

use serde_json::Value;

use crate::model::{CurrentView, TodayView, UnitLabels, UnitSystem};

/// Wrapper keys checked by [`unwrap_envelope`], highest priority first.
pub const ENVELOPE_KEYS: [&str; 4] = ["data", "value", "result", "body"];

/// Strip one transport wrapper, if any.
///
/// Returns the first of `data`, `value`, `result`, `body` that is present and
/// non-null, otherwise the input itself.
pub fn unwrap_envelope(response: &Value) -> &Value {
    ENVELOPE_KEYS
        .iter()
        .find_map(|key| response.get(key).filter(|inner| !inner.is_null()))
        .unwrap_or(response)
}

/// Accept a JSON number or numeric-looking text.
pub fn to_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

fn number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

fn text(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_owned)
}

/// Walk nested object keys, treating `null` like a missing key.
fn at<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(root, |node, key| node.get(key))
        .filter(|v| !v.is_null())
}

/// Project an unwrapped `CurrentWeather` payload.
pub fn pick_current(root: Option<&Value>, units: UnitSystem) -> CurrentView {
    let fallback = units.default_labels();

    let Some(root) = root.filter(|r| !r.is_null()) else {
        return CurrentView::empty(units);
    };

    let weather = at(root, &["responses", "weather"]);
    let cur = weather.and_then(|w| at(w, &["current"]));
    let field = |name: &str| cur.and_then(|c| at(c, &[name]));

    let condition = text(field("cap")).or_else(|| text(field("capAbbr")));

    let nowcast = weather.and_then(|w| at(w, &["nowcasting"]));
    let nowcast_summary = nowcast
        .and_then(|n| text(at(n, &["shortSummary"])))
        .or_else(|| nowcast.and_then(|n| text(at(n, &["summary"]))));

    let alert_title = weather
        .and_then(|w| at(w, &["alerts"]))
        .and_then(Value::as_array)
        .and_then(|alerts| alerts.first())
        .and_then(|first| text(at(first, &["title"])));

    let unit_labels = UnitLabels {
        temp: text(at(root, &["units", "temperature"])).unwrap_or(fallback.temp),
        speed: text(at(root, &["units", "speed"])).unwrap_or(fallback.speed),
    };

    CurrentView {
        temperature: number(field("temp")),
        condition,
        humidity: number(field("rh")),
        wind_speed: number(field("windSpd")),
        wind_dir: number(field("windDir")),
        observed_at: text(field("created")),
        location: text(at(root, &["responses", "source", "location"])),
        nowcast_summary,
        alert_title,
        uv: number(field("uv")),
        uv_desc: text(field("uvDesc")),
        unit_labels,
    }
}

/// Project an unwrapped `TodaysForecast`/`TomorrowsForecast` payload.
///
/// `None` means the payload carries neither `daily` nor `almanac` data.
pub fn pick_today(root: Option<&Value>) -> Option<TodayView> {
    let root = root.filter(|r| !r.is_null())?;

    let daily = at(root, &["responses", "daily"]);
    let almanac = at(root, &["responses", "almanac"]);
    if daily.is_none() && almanac.is_none() {
        return None;
    }

    let d = |path: &[&str]| daily.and_then(|v| at(v, path));

    let precip = [
        to_number(d(&["day", "precip"])),
        to_number(d(&["night", "precip"])),
        to_number(d(&["precip"])),
    ]
    .into_iter()
    .flatten()
    .reduce(f64::max);

    Some(TodayView {
        high: to_number(d(&["tempHi"])),
        low: to_number(d(&["tempLo"])),
        precip,
        day_caption: text(d(&["day", "cap"])).or_else(|| text(d(&["pvdrCap"]))),
        night_caption: text(d(&["night", "cap"])),
        valid: text(d(&["valid"])),
        uv: to_number(d(&["uv"])),
        uv_desc: text(d(&["uvDesc"])),
        sunrise: text(almanac.and_then(|a| at(a, &["sunrise"]))),
        sunset: text(almanac.and_then(|a| at(a, &["sunset"]))),
        utc_offset: text(at(root, &["responses", "source", "utcOffset"])),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwrap_prefers_highest_priority_key() {
        let env = json!({ "body": 4, "result": 3, "value": 2, "data": 1 });
        assert_eq!(unwrap_envelope(&env), &json!(1));

        let env = json!({ "body": 4, "result": 3 });
        assert_eq!(unwrap_envelope(&env), &json!(3));

        let env = json!({ "body": { "responses": {} }, "value": { "x": true } });
        assert_eq!(unwrap_envelope(&env), &json!({ "x": true }));
    }

    #[test]
    fn unwrap_returns_input_when_no_wrapper() {
        let payload = json!({ "responses": { "daily": {} } });
        assert_eq!(unwrap_envelope(&payload), &payload);

        let scalar = json!("plain");
        assert_eq!(unwrap_envelope(&scalar), &scalar);
    }

    #[test]
    fn unwrap_skips_null_wrappers() {
        let env = json!({ "data": null, "body": { "ok": 1 } });
        assert_eq!(unwrap_envelope(&env), &json!({ "ok": 1 }));
    }

    #[test]
    fn unwrap_applies_a_single_step() {
        let env = json!({ "data": { "responses": { "source": {} } } });
        let once = unwrap_envelope(&env);
        assert_eq!(unwrap_envelope(once), once);
    }

    #[test]
    fn to_number_accepts_numbers_and_numeric_text() {
        assert_eq!(to_number(Some(&json!("42"))), Some(42.0));
        assert_eq!(to_number(Some(&json!("  7.5 "))), Some(7.5));
        assert_eq!(to_number(Some(&json!(42.9))), Some(42.9));
        assert_eq!(to_number(Some(&json!("abc"))), None);
        assert_eq!(to_number(Some(&json!("   "))), None);
        assert_eq!(to_number(Some(&json!("NaN"))), None);
        assert_eq!(to_number(Some(&json!(true))), None);
        assert_eq!(to_number(None), None);
    }

    #[test]
    fn pick_current_without_payload_has_only_labels() {
        let view = pick_current(None, UnitSystem::Imperial);
        assert_eq!(view, CurrentView::empty(UnitSystem::Imperial));
        assert_eq!(view.unit_labels, UnitLabels::new("°F", "mph"));
        assert!(view.temperature.is_none());
        assert!(view.condition.is_none());

        let view = pick_current(Some(&Value::Null), UnitSystem::Metric);
        assert_eq!(view.unit_labels, UnitLabels::new("°C", "km/h"));
    }

    #[test]
    fn pick_current_reads_full_payload() {
        let payload = json!({
            "units": { "temperature": "°C", "speed": "m/s" },
            "responses": {
                "source": { "location": "Osaka, Japan" },
                "weather": {
                    "current": {
                        "temp": 21.4, "cap": "Partly sunny", "capAbbr": "P. sunny",
                        "rh": 64, "windSpd": 11, "windDir": 230,
                        "created": "2024-05-01T03:10:00+00:00",
                        "uv": 5, "uvDesc": "Moderate"
                    },
                    "nowcasting": { "shortSummary": "Dry for the next hour", "summary": "long text" },
                    "alerts": [{ "title": "Heavy rain advisory" }, { "title": "ignored" }]
                }
            }
        });

        let view = pick_current(Some(&payload), UnitSystem::Imperial);

        assert_eq!(view.temperature, Some(21.4));
        assert_eq!(view.condition.as_deref(), Some("Partly sunny"));
        assert_eq!(view.humidity, Some(64.0));
        assert_eq!(view.wind_speed, Some(11.0));
        assert_eq!(view.wind_dir, Some(230.0));
        assert_eq!(view.observed_at.as_deref(), Some("2024-05-01T03:10:00+00:00"));
        assert_eq!(view.location.as_deref(), Some("Osaka, Japan"));
        assert_eq!(view.nowcast_summary.as_deref(), Some("Dry for the next hour"));
        assert_eq!(view.alert_title.as_deref(), Some("Heavy rain advisory"));
        assert_eq!(view.uv, Some(5.0));
        assert_eq!(view.uv_desc.as_deref(), Some("Moderate"));
        assert_eq!(view.unit_labels, UnitLabels::new("°C", "m/s"));
    }

    #[test]
    fn pick_current_does_not_coerce_numeric_text() {
        let payload = json!({
            "responses": { "weather": { "current": { "temp": "21", "rh": null, "windSpd": "fast" } } }
        });

        let view = pick_current(Some(&payload), UnitSystem::Metric);
        assert_eq!(view.temperature, None);
        assert_eq!(view.humidity, None);
        assert_eq!(view.wind_speed, None);
    }

    #[test]
    fn pick_current_fallbacks() {
        let payload = json!({
            "units": { "temperature": 1, "speed": "kn" },
            "responses": {
                "weather": {
                    "current": { "capAbbr": "Cloudy" },
                    "nowcasting": { "summary": "Rain later" },
                    "alerts": []
                }
            }
        });

        let view = pick_current(Some(&payload), UnitSystem::Imperial);
        assert_eq!(view.condition.as_deref(), Some("Cloudy"));
        assert_eq!(view.nowcast_summary.as_deref(), Some("Rain later"));
        assert_eq!(view.alert_title, None);
        assert_eq!(view.unit_labels, UnitLabels::new("°F", "kn"));
    }

    #[test]
    fn pick_today_is_none_without_daily_or_almanac() {
        assert_eq!(pick_today(None), None);
        assert_eq!(pick_today(Some(&json!({}))), None);
        assert_eq!(pick_today(Some(&json!({ "responses": { "source": { "utcOffset": "09:00:00" } } }))), None);
        assert_eq!(pick_today(Some(&json!({ "responses": { "daily": null } }))), None);

        assert!(pick_today(Some(&json!({ "responses": { "daily": {} } }))).is_some());
        assert!(pick_today(Some(&json!({ "responses": { "almanac": {} } }))).is_some());
    }

    #[test]
    fn pick_today_reads_full_payload() {
        let payload = json!({
            "responses": {
                "source": { "utcOffset": "09:00:00" },
                "daily": {
                    "tempHi": "28", "tempLo": 19.5,
                    "day": { "precip": 30, "cap": "Sunny" },
                    "night": { "precip": "70", "cap": "Showers" },
                    "precip": 50,
                    "valid": "2024-05-01T00:00:00+09:00",
                    "uv": "7", "uvDesc": "High"
                },
                "almanac": { "sunrise": "2024-04-30T20:00:00Z", "sunset": "2024-05-01T09:45:00Z" }
            }
        });

        let view = pick_today(Some(&payload)).expect("daily data present");

        assert_eq!(view.high, Some(28.0));
        assert_eq!(view.low, Some(19.5));
        assert_eq!(view.precip, Some(70.0));
        assert_eq!(view.day_caption.as_deref(), Some("Sunny"));
        assert_eq!(view.night_caption.as_deref(), Some("Showers"));
        assert_eq!(view.valid.as_deref(), Some("2024-05-01T00:00:00+09:00"));
        assert_eq!(view.uv, Some(7.0));
        assert_eq!(view.uv_desc.as_deref(), Some("High"));
        assert_eq!(view.sunrise.as_deref(), Some("2024-04-30T20:00:00Z"));
        assert_eq!(view.sunset.as_deref(), Some("2024-05-01T09:45:00Z"));
        assert_eq!(view.utc_offset.as_deref(), Some("09:00:00"));
    }

    #[test]
    fn precip_takes_max_of_present_candidates() {
        let payload = json!({ "responses": { "daily": { "day": { "precip": 30 }, "night": { "precip": 70 }, "precip": 50 } } });
        assert_eq!(pick_today(Some(&payload)).unwrap().precip, Some(70.0));

        let payload = json!({ "responses": { "daily": { "night": { "precip": "n/a" }, "precip": "40" } } });
        assert_eq!(pick_today(Some(&payload)).unwrap().precip, Some(40.0));

        let payload = json!({ "responses": { "daily": { "day": { "precip": "x" }, "night": {} } } });
        assert_eq!(pick_today(Some(&payload)).unwrap().precip, None);
    }

    #[test]
    fn day_caption_falls_back_to_provider_caption() {
        let payload = json!({ "responses": { "daily": { "pvdrCap": "Mostly cloudy", "night": {} } } });
        let view = pick_today(Some(&payload)).unwrap();

        assert_eq!(view.day_caption.as_deref(), Some("Mostly cloudy"));
        assert_eq!(view.night_caption, None);
    }
}
