use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode};
use weathernow_core::{
    AlertSettings, CityRecord, Config, Favorites, ForecastOptions, History, Locator, SortOrder,
    Store, TemperatureUnit, WeatherClient,
    collections::{filter, sorted},
    suggest,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weathernow",
    version,
    about = "Current conditions, forecasts, favorites and alerts from OpenWeather"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and forecast preferences.
    Configure {
        /// Key to save; prompts interactively when absent.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show current weather and forecast for a place.
    Show(ShowArgs),

    /// Manage favorite cities.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Browse or clear past searches.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Configure rain, temperature and wind alerts.
    Alerts {
        #[command(subcommand)]
        action: AlertsAction,
    },
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// City name, e.g. "London" or "Paris,FR".
    #[arg(
        required_unless_present_any = ["lat", "lon"],
        conflicts_with_all = ["lat", "lon"]
    )]
    city: Option<String>,

    /// Latitude in degrees.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude in degrees.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    #[command(flatten)]
    display: DisplayArgs,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Number of 3-hour steps in the hourly forecast.
    #[arg(long)]
    hours: Option<usize>,

    /// Number of days in the daily forecast (at most 5).
    #[arg(long)]
    days: Option<usize>,

    /// Leave today out of the daily forecast.
    #[arg(long)]
    skip_today: bool,
}

#[derive(Debug, Args)]
pub struct DisplayArgs {
    /// Show temperatures in °F.
    #[arg(long)]
    fahrenheit: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Order: name, temp or recent.
    #[arg(long)]
    sort: Option<SortOrder>,

    /// Only names containing this text.
    #[arg(long)]
    filter: Option<String>,

    #[command(flatten)]
    display: DisplayArgs,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    /// List saved favorites.
    List(ListArgs),
    /// Look up a city and save it.
    Add { city: String },
    /// Forget a city.
    Remove { city: String },
    /// Update every favorite with current conditions.
    Refresh,
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// List past searches, newest first.
    List(ListArgs),
    /// Delete all past searches.
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum AlertsAction {
    /// Print the current alert settings.
    Show,
    /// Enable alerts; only the given thresholds change.
    Set {
        /// Alert when rain is reported.
        #[arg(long)]
        rain: Option<bool>,
        /// Alert below this temperature (°C).
        #[arg(long, allow_negative_numbers = true)]
        min: Option<f64>,
        /// Alert above this temperature (°C).
        #[arg(long, allow_negative_numbers = true)]
        max: Option<f64>,
        /// Alert above this wind speed (km/h).
        #[arg(long)]
        wind: Option<f64>,
    },
    /// Disable all alerts.
    Clear,
}

impl DisplayArgs {
    fn unit(&self) -> TemperatureUnit {
        if self.fahrenheit {
            TemperatureUnit::Fahrenheit
        } else {
            TemperatureUnit::Celsius
        }
    }
}

impl ShowArgs {
    fn locator(&self) -> Result<Locator> {
        match (&self.city, self.lat, self.lon) {
            (Some(city), _, _) => {
                if city.trim().is_empty() {
                    bail!("City name must not be empty.");
                }
                Ok(Locator::city(city.trim()))
            }
            (None, Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    bail!("Latitude must be between -90 and 90, got {lat}.");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    bail!("Longitude must be between -180 and 180, got {lon}.");
                }
                Ok(Locator::Coordinates { lat, lon })
            }
            _ => bail!("Provide a city name or both --lat and --lon."),
        }
    }

    fn forecast_options(&self, base: ForecastOptions) -> ForecastOptions {
        ForecastOptions {
            hourly_count: self.hours.unwrap_or(base.hourly_count),
            daily_limit: self.days.unwrap_or(base.daily_limit),
            skip_first_day: base.skip_first_day || self.skip_today,
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { api_key } => configure(api_key),
            Command::Show(args) => show(args).await,
            Command::Favorites { action } => favorites(action).await,
            Command::History { action } => history(action),
            Command::Alerts { action } => alerts(action),
        }
    }
}

fn load_config() -> Result<Config> {
    Ok(Config::load()?.with_env_overrides())
}

fn open_store(config: &Config) -> Result<Store> {
    Ok(Store::new(config.data_dir()?))
}

fn configure(api_key: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let api_key = match api_key {
        Some(key) => key,
        None => {
            let key = Password::new("OpenWeather API key:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .without_confirmation()
                .prompt()
                .context("Failed to read API key")?;

            config.forecast.skip_first_day =
                Confirm::new("Leave today out of the daily forecast?")
                    .with_default(config.forecast.skip_first_day)
                    .prompt()
                    .context("Failed to read forecast preference")?;
            key
        }
    };

    if api_key.trim().is_empty() {
        bail!("API key must not be empty.");
    }

    config.set_api_key(api_key);
    config.save()?;

    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

async fn show(args: ShowArgs) -> Result<()> {
    let locator = args.locator()?;
    let config = load_config()?;
    let client =
        WeatherClient::from_config(&config)?.with_options(args.forecast_options(config.forecast));

    tracing::debug!(%locator, options = ?client.options(), "showing weather");
    let view = client.fetch(&locator).await?;

    let store = open_store(&config)?;
    History::load(store.clone()).add(&view.city, view.temp_c, &view.condition);
    let triggered = AlertSettings::load(&store).check(&view);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        let favorite = Favorites::load(store).is_favorite(&view.location_label());
        output::print_view(&view, args.display.unit(), favorite);
        output::print_suggestion(&suggest(&view.condition, Some(view.temp_c)));
    }
    output::print_alerts(&triggered);

    Ok(())
}

async fn favorites(action: FavoritesAction) -> Result<()> {
    let config = load_config()?;
    let mut favorites = Favorites::load(open_store(&config)?);

    match action {
        FavoritesAction::List(args) => {
            list(favorites.entries(), &args, false);
        }
        FavoritesAction::Add { city } => {
            if city.trim().is_empty() {
                bail!("City name must not be empty.");
            }
            let client = WeatherClient::from_config(&config)?;
            let view = client.fetch_current(&Locator::city(city.trim())).await?;

            let record = CityRecord::from_view(&view);
            let name = record.name.clone();
            if favorites.add(record) {
                println!("Added {name} to favorites.");
            } else {
                println!("{name} is already a favorite.");
            }
        }
        FavoritesAction::Remove { city } => match favorites.remove(&city) {
            0 => println!("{} is not a favorite.", city.trim()),
            _ => println!("Removed {} from favorites.", city.trim()),
        },
        FavoritesAction::Refresh => {
            if favorites.is_empty() {
                println!("No favorites to refresh.");
                return Ok(());
            }
            let client = WeatherClient::from_config(&config)?;
            let report = favorites.refresh_all(&client).await;
            output::print_refresh_report(&report);
        }
    }

    Ok(())
}

fn history(action: HistoryAction) -> Result<()> {
    let config = load_config()?;
    let mut history = History::load(open_store(&config)?);

    match action {
        HistoryAction::List(args) => list(history.entries(), &args, true),
        HistoryAction::Clear => {
            let count = history.len();
            history.clear();
            println!("Cleared {count} search(es).");
        }
    }

    Ok(())
}

/// Stored order is kept when no sort is requested, except that history
/// defaults to newest first.
fn list(entries: &[CityRecord], args: &ListArgs, newest_first: bool) {
    let order = args
        .sort
        .or(newest_first.then_some(SortOrder::Recent));
    let ordered = match order {
        Some(order) => sorted(entries, order),
        None => entries.to_vec(),
    };
    let shown = match args.filter.as_deref() {
        Some(query) => filter(&ordered, query),
        None => ordered.iter().collect(),
    };

    output::print_records(&shown, entries, args.display.unit());
}

fn alerts(action: AlertsAction) -> Result<()> {
    let config = load_config()?;
    let store = open_store(&config)?;
    let mut settings = AlertSettings::load(&store);

    match action {
        AlertsAction::Show => {}
        AlertsAction::Set { rain, min, max, wind } => {
            settings = apply_alert_changes(settings, rain, min, max, wind)?;
            settings.save(&store)?;
        }
        AlertsAction::Clear => {
            settings = AlertSettings::default();
            settings.save(&store)?;
        }
    }

    print_alert_settings(&settings);
    Ok(())
}

/// Merge `alerts set` flags into the stored settings. The merged
/// thresholds are validated, not just the flags given in this call.
fn apply_alert_changes(
    mut settings: AlertSettings,
    rain: Option<bool>,
    min: Option<f64>,
    max: Option<f64>,
    wind: Option<f64>,
) -> Result<AlertSettings> {
    if let Some(rain) = rain {
        settings.rain = rain;
    }
    if min.is_some() || max.is_some() {
        settings.temperature.enabled = true;
        settings.temperature.min = min.or(settings.temperature.min);
        settings.temperature.max = max.or(settings.temperature.max);
    }
    if let Some(speed) = wind {
        if speed < 0.0 {
            bail!("--wind must not be negative.");
        }
        settings.wind.enabled = true;
        settings.wind.speed = Some(speed);
    }

    if let (Some(min), Some(max)) = (settings.temperature.min, settings.temperature.max) {
        if min > max {
            bail!("Minimum temperature ({min}°C) must not exceed maximum ({max}°C).");
        }
    }
    Ok(settings)
}

fn print_alert_settings(settings: &AlertSettings) {
    if !settings.any_enabled() {
        println!("No alerts enabled.");
        return;
    }

    let describe = |value: Option<f64>, unit: &str| {
        value.map_or_else(|| "unset".to_string(), |v| format!("{v}{unit}"))
    };

    println!("Rain:        {}", if settings.rain { "on" } else { "off" });
    if settings.temperature.enabled {
        println!(
            "Temperature: below {} / above {}",
            describe(settings.temperature.min, "°C"),
            describe(settings.temperature.max, "°C"),
        );
    } else {
        println!("Temperature: off");
    }
    if settings.wind.enabled {
        println!("Wind:        above {}", describe(settings.wind.speed, " km/h"));
    } else {
        println!("Wind:        off");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("weathernow").chain(args.iter().copied()))
    }

    fn show_args(args: &[&str]) -> ShowArgs {
        match parse(args).expect("parses").command {
            Command::Show(show) => show,
            other => panic!("expected show, got {other:?}"),
        }
    }

    #[test]
    fn city_locator_is_trimmed() {
        let args = show_args(&["show", "  London "]);
        assert_eq!(args.locator().unwrap(), Locator::city("London"));
    }

    #[test]
    fn coordinates_accept_negative_values() {
        let args = show_args(&["show", "--lat", "-33.87", "--lon", "151.21"]);
        assert_eq!(
            args.locator().unwrap(),
            Locator::Coordinates { lat: -33.87, lon: 151.21 }
        );
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let args = show_args(&["show", "--lat", "91", "--lon", "0"]);
        assert!(args.locator().is_err());
    }

    #[test]
    fn blank_city_is_rejected() {
        let args = show_args(&["show", "   "]);
        assert!(args.locator().is_err());
    }

    #[test]
    fn city_and_coordinates_conflict() {
        assert!(parse(&["show", "London", "--lat", "1", "--lon", "2"]).is_err());
    }

    #[test]
    fn forecast_flags_override_config() {
        let args = show_args(&["show", "Oslo", "--hours", "4", "--skip-today"]);
        let options = args.forecast_options(ForecastOptions::default());
        assert_eq!(options.hourly_count, 4);
        assert_eq!(options.daily_limit, ForecastOptions::default().daily_limit);
        assert!(options.skip_first_day);
    }

    fn stored_max(max: f64) -> AlertSettings {
        let mut settings = AlertSettings::default();
        settings.temperature.enabled = true;
        settings.temperature.max = Some(max);
        settings
    }

    #[test]
    fn min_above_stored_max_is_rejected() {
        let err = apply_alert_changes(stored_max(10.0), None, Some(20.0), None, None).unwrap_err();
        assert!(err.to_string().contains("must not exceed"));
    }

    #[test]
    fn alert_changes_merge_with_stored_settings() {
        let settings =
            apply_alert_changes(stored_max(30.0), Some(true), Some(-5.0), None, Some(50.0))
                .expect("valid");

        assert!(settings.rain);
        assert_eq!(settings.temperature.min, Some(-5.0));
        assert_eq!(settings.temperature.max, Some(30.0));
        assert_eq!(settings.wind.speed, Some(50.0));
        assert!(apply_alert_changes(AlertSettings::default(), None, Some(5.0), Some(1.0), None).is_err());
    }

    #[test]
    fn sort_order_parses_from_flag() {
        let cli = parse(&["history", "list", "--sort", "temp"]).expect("parses");
        match cli.command {
            Command::History { action: HistoryAction::List(args) } => {
                assert_eq!(args.sort, Some(SortOrder::Temperature));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
