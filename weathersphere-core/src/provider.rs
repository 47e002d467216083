use crate::{
    Config, LookupError, LookupRequest, WeatherReading,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(
        &self,
        request: &LookupRequest,
    ) -> Result<WeatherReading, LookupError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.resolve_api_key()?;

    Ok(OpenWeatherProvider::new(api_key).with_base_url(config.base_url()))
}
