//! User-defined weather alert thresholds.

use serde::{Deserialize, Serialize};

use crate::{
    model::WeatherView,
    store::{ALERT_SETTINGS_KEY, Store},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureAlert {
    pub enabled: bool,
    /// °C
    pub min: Option<f64>,
    /// °C
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindAlert {
    pub enabled: bool,
    /// km/h
    pub speed: Option<f64>,
}

/// Persisted alert settings. Everything is disabled by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    pub rain: bool,
    pub temperature: TemperatureAlert,
    pub wind: WindAlert,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Rain,
    BelowMinimum { threshold_c: f64 },
    AboveMaximum { threshold_c: f64 },
    HighWind { speed_kmh: i64 },
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alert::Rain => f.write_str("Rain is expected in your area"),
            Alert::BelowMinimum { threshold_c } => {
                write!(f, "Temperature is below your minimum threshold ({threshold_c}°C)")
            }
            Alert::AboveMaximum { threshold_c } => {
                write!(f, "Temperature is above your maximum threshold ({threshold_c}°C)")
            }
            Alert::HighWind { speed_kmh } => write!(f, "High wind speed alert: {speed_kmh} km/h"),
        }
    }
}

impl AlertSettings {
    pub fn load(store: &Store) -> Self {
        store.load_or_default(ALERT_SETTINGS_KEY)
    }

    pub fn save(&self, store: &Store) -> anyhow::Result<()> {
        store.save(ALERT_SETTINGS_KEY, self)
    }

    pub fn any_enabled(&self) -> bool {
        self.rain || self.temperature.enabled || self.wind.enabled
    }

    /// Alerts triggered by the given conditions.
    pub fn check(&self, view: &WeatherView) -> Vec<Alert> {
        let mut alerts = Vec::new();

        if self.rain && view.condition.to_lowercase().contains("rain") {
            alerts.push(Alert::Rain);
        }

        if self.temperature.enabled {
            if let Some(min) = self.temperature.min.filter(|&min| view.temp_c < min) {
                alerts.push(Alert::BelowMinimum { threshold_c: min });
            }
            if let Some(max) = self.temperature.max.filter(|&max| view.temp_c > max) {
                alerts.push(Alert::AboveMaximum { threshold_c: max });
            }
        }

        if self.wind.enabled
            && self.wind.speed.is_some_and(|limit| view.wind_kmh as f64 > limit)
        {
            alerts.push(Alert::HighWind { speed_kmh: view.wind_kmh });
        }

        alerts
    }
}
