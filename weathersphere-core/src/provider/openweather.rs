use async_trait::async_trait;
use reqwest::{Client, Request, StatusCode};
use serde::Deserialize;

use crate::{
    config::DEFAULT_BASE_URL,
    error::LookupError,
    model::{LookupRequest, WeatherReading},
};

use super::WeatherProvider;

/// Unit system sent with every request; the view assumes metric values.
const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET <base>/weather?q=<city>&appid=<key>&units=metric`
    pub fn build_request(&self, request: &LookupRequest) -> reqwest::Result<Request> {
        self.http
            .get(format!("{}/weather", self.base_url))
            .query(&[
                ("q", request.city.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", UNITS),
            ])
            .build()
    }

    async fn fetch_current(&self, request: &LookupRequest) -> Result<WeatherReading, LookupError> {
        let http_request = self.build_request(request)?;
        log::debug!("requesting current weather for {:?}", request.city);

        let res = self.http.execute(http_request).await.map_err(|err| {
            log::warn!("OpenWeather request for {:?} failed: {err}", request.city);
            LookupError::from(err)
        })?;

        let status = res.status();
        let body = res.text().await?;

        reading_from_response(status, &body)
    }
}

/// Classify and parse one provider response.
///
/// Any non-success status counts as "not found", whatever the body says.
fn reading_from_response(status: StatusCode, body: &str) -> Result<WeatherReading, LookupError> {
    if !status.is_success() {
        log::warn!(
            "OpenWeather rejected request with status {}: {}",
            status,
            truncate_body(body)
        );
        return Err(LookupError::NotFound {
            status: status.as_u16(),
        });
    }

    let parsed: OwCurrentResponse = serde_json::from_str(body)?;
    Ok(parsed.into())
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
    #[serde(default)]
    timezone: i32,
}

impl From<OwCurrentResponse> for WeatherReading {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (description, icon) = match parsed.weather.into_iter().next() {
            Some(w) => (w.description, Some(w.icon)),
            None => ("Unknown".to_string(), None),
        };

        WeatherReading {
            location_name: parsed.name,
            country: parsed.sys.country,
            description,
            icon,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            temp_min_c: parsed.main.temp_min,
            temp_max_c: parsed.main.temp_max,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed_mps: parsed.wind.speed,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
            timezone_offset: parsed.timezone,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(
        &self,
        request: &LookupRequest,
    ) -> Result<WeatherReading, LookupError> {
        self.fetch_current(request).await
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::GENERIC_FAILURE_MESSAGE,
        lookup::{SubmitOutcome, WeatherLookup},
    };

    const DHAKA: &str = r#"{
        "coord": {"lon": 90.4074, "lat": 23.7104},
        "weather": [{"id": 721, "main": "Haze", "description": "haze", "icon": "50d"}],
        "base": "stations",
        "main": {
            "temp": 30.2, "feels_like": 35.4, "temp_min": 29.1, "temp_max": 30.9,
            "pressure": 1008, "humidity": 70
        },
        "visibility": 3000,
        "wind": {"speed": 3.09, "deg": 160},
        "dt": 1700000000,
        "sys": {"type": 1, "id": 9145, "country": "BD", "sunrise": 1699920000, "sunset": 1699960000},
        "timezone": 21600,
        "id": 1185241,
        "name": "Dhaka",
        "cod": 200
    }"#;

    fn lookup(city: &str) -> LookupRequest {
        LookupRequest { city: city.into() }
    }

    #[test]
    fn request_carries_city_key_and_metric_units() {
        let provider = OpenWeatherProvider::new("SECRET".into());
        let req = provider.build_request(&lookup("New York")).unwrap();

        assert_eq!(req.method(), reqwest::Method::GET);
        assert_eq!(req.url().path(), "/data/2.5/weather");

        let pairs: Vec<(String, String)> = req
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("q".into(), "New York".into())));
        assert!(pairs.contains(&("appid".into(), "SECRET".into())));
        assert!(pairs.contains(&("units".into(), "metric".into())));
    }

    #[test]
    fn request_url_encodes_city() {
        let provider = OpenWeatherProvider::new("K".into());
        let req = provider.build_request(&lookup("São Paulo&x=1")).unwrap();

        let query = req.url().query().unwrap_or_default();
        assert!(!query.contains("&x=1"));
        assert_eq!(
            req.url().query_pairs().find(|(k, _)| k == "q").map(|(_, v)| v.into_owned()),
            Some("São Paulo&x=1".to_string())
        );
    }

    #[test]
    fn custom_base_url_drops_trailing_slash() {
        let provider = OpenWeatherProvider::new("K".into()).with_base_url("http://127.0.0.1:1/api/");
        let req = provider.build_request(&lookup("Oslo")).unwrap();

        assert_eq!(req.url().host_str(), Some("127.0.0.1"));
        assert_eq!(req.url().path(), "/api/weather");
    }

    #[test]
    fn parses_success_payload() {
        let reading = reading_from_response(StatusCode::OK, DHAKA).unwrap();

        assert_eq!(reading.location_name, "Dhaka");
        assert_eq!(reading.country, "BD");
        assert_eq!(reading.description, "haze");
        assert_eq!(reading.icon.as_deref(), Some("50d"));
        assert_eq!(reading.temperature_c, 30.2);
        assert_eq!(reading.feels_like_c, 35.4);
        assert_eq!(reading.temp_min_c, 29.1);
        assert_eq!(reading.temp_max_c, 30.9);
        assert_eq!(reading.humidity_pct, 70);
        assert_eq!(reading.pressure_hpa, 1008);
        assert_eq!(reading.wind_speed_mps, 3.09);
        assert_eq!(reading.sunrise, 1699920000);
        assert_eq!(reading.sunset, 1699960000);
        assert_eq!(reading.timezone_offset, 21600);
    }

    #[test]
    fn non_success_status_is_not_found_regardless_of_body() {
        let err = reading_from_response(StatusCode::NOT_FOUND, r#"{"cod":"404","message":"city not found"}"#)
            .unwrap_err();
        assert!(matches!(err, LookupError::NotFound { status: 404 }));

        // Even a body that would parse as a reading is ignored.
        let err = reading_from_response(StatusCode::UNAUTHORIZED, DHAKA).unwrap_err();
        assert!(matches!(err, LookupError::NotFound { status: 401 }));
    }

    #[test]
    fn malformed_body_is_rejected() {
        let err = reading_from_response(StatusCode::OK, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)));

        let err = reading_from_response(StatusCode::OK, r#"{"name":"Dhaka"}"#).unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)));
    }

    #[test]
    fn empty_weather_list_falls_back_to_unknown() {
        let body = DHAKA.replace(
            r#"[{"id": 721, "main": "Haze", "description": "haze", "icon": "50d"}]"#,
            "[]",
        );
        let reading = reading_from_response(StatusCode::OK, &body).unwrap();

        assert_eq!(reading.description, "Unknown");
        assert!(reading.icon.is_none());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        assert_eq!(truncate_body(&long).chars().count(), 200);
        assert_eq!(truncate_body("short"), "short");
    }

    /// Nothing listens on port 1, so the connection is refused.
    fn unreachable_provider() -> OpenWeatherProvider {
        OpenWeatherProvider::new("K".into()).with_base_url("http://127.0.0.1:1")
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_failure() {
        let err = unreachable_provider()
            .current_weather(&lookup("Dhaka"))
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::Transport(_)), "got {err:?}");
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn unreachable_endpoint_keeps_previous_reading() {
        let mut lookup = WeatherLookup::new(unreachable_provider());
        lookup.update_query("Dhaka");

        let previous = reading_from_response(StatusCode::OK, DHAKA).unwrap();
        lookup.begin_submit().expect("query is not blank");
        lookup.finish_submit(Ok(previous.clone()));

        assert_eq!(lookup.submit_query().await, SubmitOutcome::Failed);
        assert_eq!(lookup.state().failure.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
        assert_eq!(lookup.state().reading.as_ref(), Some(&previous));
        assert!(!lookup.state().in_flight);
    }
}
