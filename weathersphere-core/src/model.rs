/// Base of the provider's icon CDN; icons are addressed as `<id>@4x.png`.
pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// One outbound lookup, carrying the already-trimmed city name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub city: String,
}

/// Normalized current-conditions snapshot.
///
/// Temperatures are kept exactly as the provider reported them (metric
/// units); rounding happens only in the view.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub location_name: String,
    pub country: String,
    pub description: String,
    pub icon: Option<String>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    /// Unix seconds.
    pub sunrise: i64,
    /// Unix seconds.
    pub sunset: i64,
    /// Offset of the city's local time from UTC, in seconds.
    pub timezone_offset: i32,
}

impl WeatherReading {
    pub fn icon_url(&self) -> Option<String> {
        self.icon
            .as_deref()
            .map(|id| format!("{ICON_BASE_URL}/{id}@4x.png"))
    }
}
