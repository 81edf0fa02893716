//! Core library for the `weathernow` dashboard.
//!
//! This crate defines:
//! - Configuration & the local preference store
//! - Abstraction over weather providers and the OpenWeather client
//! - Forecast aggregation, unit mapping and activity suggestions
//! - Favorites, search history and weather alerts
//!
//! It is used by `weathernow-cli`, but can also be reused by other front ends.

pub mod alerts;
pub mod client;
pub mod collections;
pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod store;
pub mod suggest;
pub mod units;

pub use alerts::{Alert, AlertSettings};
pub use client::WeatherClient;
pub use collections::{CityRecord, Favorites, History, SortOrder, normalize};
pub use config::Config;
pub use error::WeatherError;
pub use forecast::ForecastOptions;
pub use model::{DailySummary, HourlyEntry, Locator, RawSample, WeatherView};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use store::Store;
pub use suggest::suggest;
pub use units::{IconCategory, TemperatureUnit};
