use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::units::IconCategory;

/// What to query the provider for.
#[derive(Debug, Clone, PartialEq)]
pub enum Locator {
    /// Free-text place name, e.g. "London" or "Paris,FR".
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

impl Locator {
    pub fn city(name: impl Into<String>) -> Self {
        Locator::City(name.into())
    }

    /// Query parameters identifying this locator on the provider.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Locator::City(name) => vec![("q", name.trim().to_string())],
            Locator::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::City(name) => f.write_str(name.trim()),
            Locator::Coordinates { lat, lon } => write!(f, "{lat:.4},{lon:.4}"),
        }
    }
}

/// One 3-hour forecast entry as received from the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Epoch seconds.
    pub timestamp: i64,
    /// Provider date-time text, `YYYY-MM-DD HH:MM:SS`.
    pub date_text: String,
    pub temp_c: f64,
    /// Per-sample bounds; when absent `temp_c` stands in for both.
    pub temp_min_c: Option<f64>,
    pub temp_max_c: Option<f64>,
    /// Provider icon code, e.g. `"10d"`.
    pub condition_code: String,
    pub condition_label: String,
    pub wind_mps: f64,
}

impl RawSample {
    /// Calendar date portion of the date-time text.
    pub fn date(&self) -> Option<NaiveDate> {
        let date_part = self.date_text.split_whitespace().next()?;
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }

    pub fn low_c(&self) -> f64 {
        self.temp_min_c.unwrap_or(self.temp_c)
    }

    pub fn high_c(&self) -> f64 {
        self.temp_max_c.unwrap_or(self.temp_c)
    }
}

/// Forecast series for one location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSeries {
    /// Location's UTC offset in seconds.
    pub timezone_offset: i32,
    pub samples: Vec<RawSample>,
}

/// Current conditions as reported by the provider, before unit mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentObservation {
    pub city: String,
    pub country: String,
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    /// Short label, e.g. "Rain".
    pub condition: String,
    /// Long label, e.g. "light rain".
    pub description: String,
    pub icon_code: String,
    pub wind_mps: f64,
    pub visibility_m: Option<f64>,
    pub sunrise: i64,
    pub sunset: i64,
    pub timezone_offset: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub timestamp: i64,
    /// `HH:MM` on the location's clock.
    pub local_time: String,
    pub temp_c: f64,
    pub condition_code: String,
    pub icon: IconCategory,
    pub wind_kmh: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub condition_code: String,
    pub condition_label: String,
    pub icon: IconCategory,
}

/// Unified view model for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherView {
    pub city: String,
    pub country: String,
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub condition: String,
    pub description: String,
    pub icon_code: String,
    pub icon: IconCategory,
    pub humidity_pct: u8,
    pub wind_kmh: i64,
    pub pressure_hpa: f64,
    pub visibility_km: Option<f64>,
    pub sunrise_local: String,
    pub sunset_local: String,
    /// Empty when the forecast half of the query failed.
    pub hourly: Vec<HourlyEntry>,
    pub daily: Vec<DailySummary>,
}

impl WeatherView {
    /// `"City, CC"`, or just the city when the country is unknown.
    pub fn location_label(&self) -> String {
        if self.country.is_empty() {
            self.city.clone()
        } else {
            format!("{}, {}", self.city, self.country)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(date_text: &str) -> RawSample {
        RawSample {
            timestamp: 0,
            date_text: date_text.to_string(),
            temp_c: 12.0,
            temp_min_c: None,
            temp_max_c: Some(14.0),
            condition_code: "01d".into(),
            condition_label: "clear sky".into(),
            wind_mps: 1.0,
        }
    }

    #[test]
    fn sample_date_comes_from_text() {
        let s = sample("2024-07-15 12:00:00");
        assert_eq!(s.date(), NaiveDate::from_ymd_opt(2024, 7, 15));
        assert!(sample("garbage").date().is_none());
        assert!(sample("").date().is_none());
    }

    #[test]
    fn sample_bounds_fall_back_to_temp() {
        let s = sample("2024-07-15 12:00:00");
        assert_eq!(s.low_c(), 12.0);
        assert_eq!(s.high_c(), 14.0);
    }

    #[test]
    fn locator_query_params() {
        assert_eq!(
            Locator::city(" London ").query_params(),
            vec![("q", "London".to_string())]
        );
        assert_eq!(
            Locator::Coordinates { lat: 51.5, lon: -0.12 }.query_params(),
            vec![("lat", "51.5".to_string()), ("lon", "-0.12".to_string())]
        );
    }
}
