use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::WeatherError,
    model::{CurrentObservation, ForecastSeries, Locator, RawSample},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// OpenWeather 2.5 `weather` + `forecast` endpoints, metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Point the provider at another host, e.g. a proxy or a mock server.
    pub fn with_base_url(
        api_key: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        locator: &Locator,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let mut query = locator.query_params();
        query.push(("appid", self.api_key.clone()));
        query.push(("units", "metric".to_string()));

        tracing::debug!(%endpoint, %locator, "requesting OpenWeather");

        let res = self.http.get(&url).query(&query).send().await.map_err(|e| {
            WeatherError::UpstreamUnavailable(format!(
                "failed to send request to OpenWeather ({endpoint}): {e}"
            ))
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            WeatherError::UpstreamUnavailable(format!(
                "failed to read OpenWeather {endpoint} response body: {e}"
            ))
        })?;

        if status == StatusCode::NOT_FOUND {
            return Err(WeatherError::LocationNotFound(locator.to_string()));
        }

        if !status.is_success() {
            return Err(WeatherError::UpstreamUnavailable(format!(
                "OpenWeather {endpoint} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            WeatherError::MalformedResponse(format!("OpenWeather {endpoint} JSON: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: Option<String>,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize, Default)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    visibility: Option<f64>,
    #[serde(default)]
    timezone: i32,
}

impl From<OwCurrentResponse> for CurrentObservation {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (condition, description, icon_code) = match parsed.weather.into_iter().next() {
            Some(w) => (w.main, w.description, w.icon),
            None => ("Unknown".to_string(), "unknown".to_string(), String::new()),
        };

        CurrentObservation {
            city: parsed.name,
            country: parsed.sys.country.unwrap_or_default(),
            temp_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            condition,
            description,
            icon_code,
            wind_mps: parsed.wind.speed,
            visibility_m: parsed.visibility,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
            timezone_offset: parsed.timezone,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: Option<i64>,
    dt_txt: Option<String>,
    main: Option<OwForecastMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
}

impl OwForecastEntry {
    /// `None` when a field the aggregation relies on is missing.
    fn into_sample(self) -> Option<RawSample> {
        let timestamp = self.dt?;
        let date_text = self.dt_txt?;
        let main = self.main?;
        let temp_c = main.temp?;
        let weather = self.weather.into_iter().next();

        Some(RawSample {
            timestamp,
            date_text,
            temp_c,
            temp_min_c: main.temp_min,
            temp_max_c: main.temp_max,
            condition_code: weather.as_ref().map(|w| w.icon.clone()).unwrap_or_default(),
            condition_label: weather
                .map(|w| w.description)
                .unwrap_or_else(|| "unknown".to_string()),
            wind_mps: self.wind.speed,
        })
    }
}

#[derive(Debug, Deserialize, Default)]
struct OwCity {
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    city: OwCity,
    /// Decoded entry by entry so one bad entry does not sink the rest.
    list: Vec<serde_json::Value>,
}

impl From<OwForecastResponse> for ForecastSeries {
    fn from(parsed: OwForecastResponse) -> Self {
        let total = parsed.list.len();
        let samples: Vec<RawSample> = parsed
            .list
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<OwForecastEntry>(entry) {
                Ok(entry) => entry.into_sample(),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping undecodable forecast entry");
                    None
                }
            })
            .collect();

        if samples.len() < total {
            tracing::debug!(
                skipped = total - samples.len(),
                "dropped incomplete forecast entries"
            );
        }

        ForecastSeries {
            timezone_offset: parsed.city.timezone,
            samples,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, locator: &Locator) -> Result<CurrentObservation, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json("weather", locator).await?;
        Ok(parsed.into())
    }

    async fn forecast(&self, locator: &Locator) -> Result<ForecastSeries, WeatherError> {
        let parsed: OwForecastResponse = self.get_json("forecast", locator).await?;
        Ok(parsed.into())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
