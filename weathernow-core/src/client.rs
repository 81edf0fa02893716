//! Orchestrates the two provider calls behind one query.

use std::time::Duration;

use crate::{
    config::Config,
    error::WeatherError,
    forecast::{ForecastOptions, daily_summary, hourly_slice},
    model::{CurrentObservation, ForecastSeries, Locator, WeatherView},
    provider::{OpenWeatherProvider, WeatherProvider},
    units::{IconCategory, format_local_time, to_km, to_kmh},
};

#[derive(Debug)]
pub struct WeatherClient {
    provider: Box<dyn WeatherProvider>,
    options: ForecastOptions,
}

impl WeatherClient {
    pub fn new(provider: Box<dyn WeatherProvider>, options: ForecastOptions) -> Self {
        Self { provider, options }
    }

    /// Build an OpenWeather-backed client from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?;
        let provider = OpenWeatherProvider::with_base_url(
            api_key.to_owned(),
            config.base_url(),
            Duration::from_secs(config.timeout_secs()),
        )?;

        Ok(Self::new(Box::new(provider), config.forecast))
    }

    pub fn options(&self) -> &ForecastOptions {
        &self.options
    }

    /// Replace the forecast options for subsequent queries.
    pub fn with_options(mut self, options: ForecastOptions) -> Self {
        self.options = options;
        self
    }

    /// Current conditions plus hourly and daily forecast views.
    ///
    /// A failing current-conditions call fails the query. A failing forecast
    /// call only leaves `hourly` and `daily` empty.
    pub async fn fetch(&self, locator: &Locator) -> Result<WeatherView, WeatherError> {
        let (current, forecast) = tokio::join!(
            self.provider.current(locator),
            self.provider.forecast(locator)
        );

        let mut view = map_current(current?);

        match forecast {
            Ok(series) => self.apply_forecast(&mut view, &series),
            Err(err) => {
                tracing::warn!(%locator, error = %err, "forecast unavailable, showing current conditions only");
            }
        }

        tracing::info!(
            city = %view.city,
            hourly = view.hourly.len(),
            daily = view.daily.len(),
            "fetched weather"
        );
        Ok(view)
    }

    /// Current conditions only; `hourly` and `daily` are left empty.
    pub async fn fetch_current(&self, locator: &Locator) -> Result<WeatherView, WeatherError> {
        let current = self.provider.current(locator).await?;
        Ok(map_current(current))
    }

    fn apply_forecast(&self, view: &mut WeatherView, series: &ForecastSeries) {
        view.hourly = hourly_slice(
            &series.samples,
            self.options.hourly_count,
            series.timezone_offset,
        );
        view.daily = daily_summary(&series.samples, &self.options);
    }
}

/// Map provider units onto the display model.
pub fn map_current(obs: CurrentObservation) -> WeatherView {
    WeatherView {
        icon: IconCategory::from_code(&obs.icon_code),
        wind_kmh: to_kmh(obs.wind_mps),
        visibility_km: obs.visibility_m.map(to_km),
        sunrise_local: format_local_time(obs.sunrise, obs.timezone_offset),
        sunset_local: format_local_time(obs.sunset, obs.timezone_offset),
        city: obs.city,
        country: obs.country,
        temp_c: obs.temp_c,
        feels_like_c: obs.feels_like_c,
        condition: obs.condition,
        description: obs.description,
        icon_code: obs.icon_code,
        humidity_pct: obs.humidity_pct,
        pressure_hpa: obs.pressure_hpa,
        hourly: Vec::new(),
        daily: Vec::new(),
    }
}
