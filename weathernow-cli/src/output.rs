//! Human-readable rendering of core results.

use weathernow_core::{
    Alert, CityRecord, TemperatureUnit, WeatherView,
    collections::{RefreshReport, extremes},
};

/// Rounded temperature with unit symbol, e.g. `-3°C`.
pub fn temp(celsius: f64, unit: TemperatureUnit) -> String {
    let value = unit.from_celsius(celsius).round();
    // avoid printing "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.0}{}", unit.symbol())
}

pub fn view_lines(view: &WeatherView, unit: TemperatureUnit, favorite: bool) -> Vec<String> {
    let mut lines = Vec::new();

    let star = if favorite { " ★" } else { "" };
    lines.push(format!("{}{star}", view.location_label()));
    lines.push(format!(
        "{} {}  {}  (feels like {})",
        view.icon.glyph(),
        temp(view.temp_c, unit),
        view.description,
        temp(view.feels_like_c, unit),
    ));

    let visibility = view
        .visibility_km
        .map(|km| format!("{} km", km.round()))
        .unwrap_or_else(|| "--".to_string());
    lines.push(format!(
        "Humidity {}%  Wind {} km/h  Pressure {} hPa  Visibility {visibility}",
        view.humidity_pct,
        view.wind_kmh,
        view.pressure_hpa.round(),
    ));
    lines.push(format!(
        "Sunrise {}  Sunset {}",
        view.sunrise_local, view.sunset_local
    ));

    if !view.hourly.is_empty() {
        lines.push(String::new());
        lines.push("Next hours".to_string());
        for hour in &view.hourly {
            lines.push(format!(
                "  {}  {} {:>5}  {:>3} km/h",
                hour.local_time,
                hour.icon.glyph(),
                temp(hour.temp_c, unit),
                hour.wind_kmh,
            ));
        }
    }

    if !view.daily.is_empty() {
        lines.push(String::new());
        lines.push("Daily".to_string());
        for day in &view.daily {
            lines.push(format!(
                "  {}  {} {:>5} / {:<5}  {}",
                day.date.format("%a %d %b"),
                day.icon.glyph(),
                temp(day.temp_min_c, unit),
                temp(day.temp_max_c, unit),
                day.condition_label,
            ));
        }
    }

    if view.hourly.is_empty() && view.daily.is_empty() {
        lines.push(String::new());
        lines.push("Forecast unavailable.".to_string());
    }

    lines
}

pub fn print_view(view: &WeatherView, unit: TemperatureUnit, favorite: bool) {
    for line in view_lines(view, unit, favorite) {
        println!("{line}");
    }
}

pub fn print_suggestion(text: &str) {
    println!();
    println!("\u{201c}{text}\u{201d}");
}

pub fn print_alerts(alerts: &[Alert]) {
    for alert in alerts {
        eprintln!("! {alert}");
    }
}

pub fn record_line(record: &CityRecord, unit: TemperatureUnit) -> String {
    format!(
        "{:<24} {:>6}  {:<16} {}",
        record.name,
        temp(record.temp_c, unit),
        record.condition,
        record
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M"),
    )
}

/// Print records followed by a warmest/coldest summary over `all`.
pub fn print_records(records: &[&CityRecord], all: &[CityRecord], unit: TemperatureUnit) {
    if records.is_empty() {
        println!("Nothing here yet.");
        return;
    }

    for record in records {
        println!("{}", record_line(record, unit));
    }

    if let Some(ex) = extremes(all) {
        println!();
        println!(
            "Total {}  Warmest {} ({})  Coldest {} ({})",
            all.len(),
            ex.warmest.name,
            temp(ex.warmest.temp_c, unit),
            ex.coldest.name,
            temp(ex.coldest.temp_c, unit),
        );
    }
}

pub fn print_refresh_report(report: &RefreshReport) {
    println!("Refreshed {} favorite(s).", report.updated.len());
    for (city, err) in &report.failed {
        eprintln!("Could not refresh {city}: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weathernow_core::IconCategory;

    fn view() -> WeatherView {
        WeatherView {
            city: "London".into(),
            country: "GB".into(),
            temp_c: 11.6,
            feels_like_c: -0.3,
            condition: "Clouds".into(),
            description: "broken clouds".into(),
            icon_code: "04d".into(),
            icon: IconCategory::Clouds,
            humidity_pct: 81,
            wind_kmh: 15,
            pressure_hpa: 1012.0,
            visibility_km: Some(10.0),
            sunrise_local: "07:01".into(),
            sunset_local: "16:30".into(),
            hourly: Vec::new(),
            daily: Vec::new(),
        }
    }

    #[test]
    fn temperature_rounds_and_converts() {
        assert_eq!(temp(11.6, TemperatureUnit::Celsius), "12°C");
        assert_eq!(temp(-0.3, TemperatureUnit::Celsius), "0°C");
        assert_eq!(temp(100.0, TemperatureUnit::Fahrenheit), "212°F");
    }

    #[test]
    fn view_without_forecast_says_so() {
        let lines = view_lines(&view(), TemperatureUnit::Celsius, true);

        assert_eq!(lines[0], "London, GB ★");
        assert!(lines[1].contains("12°C"));
        assert!(lines[1].contains("feels like 0°C"));
        assert!(lines[2].contains("Visibility 10 km"));
        assert_eq!(lines.last().map(String::as_str), Some("Forecast unavailable."));
    }

    #[test]
    fn record_line_contains_fields() {
        let record = CityRecord::new("Paris", 20.4, "Clear");
        let line = record_line(&record, TemperatureUnit::Celsius);
        assert!(line.starts_with("Paris"));
        assert!(line.contains("20°C"));
        assert!(line.contains("Clear"));
    }
}
