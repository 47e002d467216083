//! Pure rendering of [`LookupState`] into text.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::{lookup::LookupState, model::WeatherReading};

/// Shown before anything has been looked up.
pub const PROMPT_MESSAGE: &str = "Enter a city name to see current conditions.";

const MISSING: &str = "--";

/// Display strings derived from one reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingView {
    pub description: String,
    pub icon_url: Option<String>,
    pub temperature: String,
    pub location: String,
    pub wind: String,
    pub humidity: String,
    pub sunrise: String,
    pub sunset: String,
    pub feels_like: String,
    pub temp_min: String,
    pub temp_max: String,
    pub pressure: String,
}

impl ReadingView {
    pub fn from_reading(reading: &WeatherReading) -> Self {
        let location = if reading.country.is_empty() {
            reading.location_name.clone()
        } else {
            format!("{}, {}", reading.location_name, reading.country)
        };

        Self {
            description: reading.description.clone(),
            icon_url: reading.icon_url(),
            temperature: format_temperature(reading.temperature_c),
            location,
            wind: format!("{} m/s", reading.wind_speed_mps),
            humidity: format!("{}%", reading.humidity_pct),
            sunrise: format_local_time(reading.sunrise, reading.timezone_offset),
            sunset: format_local_time(reading.sunset, reading.timezone_offset),
            feels_like: format_temperature(reading.feels_like_c),
            temp_min: format_temperature(reading.temp_min_c),
            temp_max: format_temperature(reading.temp_max_c),
            pressure: format!("{} hPa", reading.pressure_hpa),
        }
    }
}

/// Render the whole view.
///
/// A current failure hides any older reading.
pub fn render(state: &LookupState) -> String {
    if let Some(failure) = &state.failure {
        return format!("{failure}\n");
    }

    match &state.reading {
        Some(reading) => render_reading(&ReadingView::from_reading(reading)),
        None => format!("{PROMPT_MESSAGE}\n"),
    }
}

fn render_reading(view: &ReadingView) -> String {
    let mut lines = vec![
        format!("{}  {}", view.temperature, view.description),
        view.location.clone(),
    ];
    lines.extend(view.icon_url.clone());
    lines.push(String::new());

    let rows = [
        ("Wind Speed", &view.wind),
        ("Humidity", &view.humidity),
        ("Sunrise", &view.sunrise),
        ("Sunset", &view.sunset),
        ("Feels Like", &view.feels_like),
        ("Min Temp", &view.temp_min),
        ("Max Temp", &view.temp_max),
        ("Pressure", &view.pressure),
    ];
    lines.extend(rows.iter().map(|(label, value)| format!(" {label:12}{value}")));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Whole degrees, halves rounded up (`-2.5` becomes `-2`).
pub fn format_temperature(celsius: f64) -> String {
    let rounded = (celsius + 0.5).floor();
    // Avoid printing "-0".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.0}°C")
}

/// 12-hour clock in the city's local time, e.g. `05:42 AM`.
pub fn format_local_time(unix_secs: i64, offset_secs: i32) -> String {
    let offset = FixedOffset::east_opt(offset_secs).unwrap_or_else(|| Utc.fix());

    DateTime::from_timestamp(unix_secs, 0)
        .map(|utc| utc.with_timezone(&offset).format("%I:%M %p").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}
