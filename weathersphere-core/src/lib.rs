//! Core library for the `weathersphere` city weather lookup.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - The weather provider abstraction and its OpenWeather client
//! - The lookup component (query, reading and failure state)
//! - A pure text view of that state
//!
//! It is used by `weathersphere-cli`, but can also be driven by other front ends.

pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod view;

pub use config::Config;
pub use error::LookupError;
pub use lookup::{LookupState, SubmitOutcome, WeatherLookup};
pub use model::{LookupRequest, WeatherReading};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
