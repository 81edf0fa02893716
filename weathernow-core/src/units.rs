//! Unit conversions and icon classification for provider values.
//!
//! The provider is always queried with metric units, so temperatures arrive in
//! °C, wind in m/s, pressure in hPa and visibility in meters.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Convert m/s to whole km/h.
pub fn to_kmh(meters_per_second: f64) -> i64 {
    (meters_per_second * 3.6).round() as i64
}

/// Convert meters to kilometers. Rounding is left to the display layer.
pub fn to_km(meters: f64) -> f64 {
    meters / 1000.0
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Render a UTC epoch as `HH:MM` on the queried location's clock.
///
/// `offset_secs` is the location's UTC offset as reported by the provider.
/// The viewer's own time zone never enters the calculation.
pub fn format_local_time(epoch_secs: i64, offset_secs: i32) -> String {
    let Some(offset) = FixedOffset::east_opt(offset_secs) else {
        return "--:--".to_string();
    };

    DateTime::from_timestamp(epoch_secs, 0)
        .map(|utc| utc.with_timezone(&offset).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Display unit chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a °C value into this unit.
    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

/// Closed set of icon categories a provider condition code maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconCategory {
    Clear,
    Clouds,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
    #[default]
    Unknown,
}

impl IconCategory {
    /// Map a provider icon code such as `"01d"` or `"10n"`.
    ///
    /// Codes are two digits followed by a `d`/`n` day-night suffix; anything
    /// else is `Unknown`.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        let (Some(digits), Some(suffix)) = (code.get(..2), code.get(2..)) else {
            return IconCategory::Unknown;
        };
        if suffix != "d" && suffix != "n" {
            return IconCategory::Unknown;
        }

        match digits {
            "01" => IconCategory::Clear,
            "02" | "03" | "04" => IconCategory::Clouds,
            "09" | "10" => IconCategory::Rain,
            "11" => IconCategory::Thunderstorm,
            "13" => IconCategory::Snow,
            "50" => IconCategory::Mist,
            _ => IconCategory::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IconCategory::Clear => "clear",
            IconCategory::Clouds => "clouds",
            IconCategory::Rain => "rain",
            IconCategory::Thunderstorm => "thunderstorm",
            IconCategory::Snow => "snow",
            IconCategory::Mist => "mist",
            IconCategory::Unknown => "unknown",
        }
    }

    /// Short terminal glyph for the category.
    pub fn glyph(&self) -> &'static str {
        match self {
            IconCategory::Clear => "☀",
            IconCategory::Clouds => "☁",
            IconCategory::Rain => "☂",
            IconCategory::Thunderstorm => "⚡",
            IconCategory::Snow => "❄",
            IconCategory::Mist => "≈",
            IconCategory::Unknown => "?",
        }
    }
}

impl std::fmt::Display for IconCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
