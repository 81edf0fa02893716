use std::fmt::Debug;

use async_trait::async_trait;

use crate::{
    error::WeatherError,
    model::{CurrentObservation, ForecastSeries, Locator},
};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// A source of current conditions and 3-hour forecasts.
///
/// Implementations map a "place does not exist" answer to
/// [`WeatherError::LocationNotFound`] and every other failure to
/// [`WeatherError::UpstreamUnavailable`] or [`WeatherError::MalformedResponse`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, locator: &Locator) -> Result<CurrentObservation, WeatherError>;

    async fn forecast(&self, locator: &Locator) -> Result<ForecastSeries, WeatherError>;
}
