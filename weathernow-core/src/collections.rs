//! Favorites (a set keyed by normalized name) and search history (a
//! newest-first log), both persisted on every mutation.

use std::{cmp::Ordering, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    client::WeatherClient,
    error::WeatherError,
    model::{Locator, WeatherView},
    store::{FAVORITES_KEY, HISTORY_KEY, Store},
};

/// Equality key for place names: trimmed and lowercased.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One remembered city and the conditions last seen there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    /// As supplied by the user, trimmed.
    pub name: String,
    pub temp_c: f64,
    pub condition: String,
    pub timestamp: DateTime<Utc>,
}

impl CityRecord {
    pub fn new(name: &str, temp_c: f64, condition: impl Into<String>) -> Self {
        Self {
            name: name.trim().to_string(),
            temp_c,
            condition: condition.into(),
            timestamp: Utc::now(),
        }
    }

    /// Named by the `"City, CC"` label so same-named cities in different
    /// countries stay distinct and refresh queries the same place.
    pub fn from_view(view: &WeatherView) -> Self {
        Self::new(&view.location_label(), view.temp_c, view.condition.clone())
    }

    pub fn key(&self) -> String {
        normalize(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Alphabetical by normalized name.
    Name,
    /// Warmest first.
    Temperature,
    /// Newest first.
    #[default]
    Recent,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown sort order '{0}', expected one of: name, temp, recent")]
pub struct UnknownSortOrder(String);

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortOrder::Name),
            "temp" | "temperature" => Ok(SortOrder::Temperature),
            "recent" | "time" => Ok(SortOrder::Recent),
            _ => Err(UnknownSortOrder(s.to_string())),
        }
    }
}

/// Records in the requested order; equal keys keep their stored order.
pub fn sorted(records: &[CityRecord], order: SortOrder) -> Vec<CityRecord> {
    let mut out = records.to_vec();
    match order {
        SortOrder::Name => out.sort_by_key(CityRecord::key),
        SortOrder::Temperature => out.sort_by(|a, b| b.temp_c.total_cmp(&a.temp_c)),
        SortOrder::Recent => out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
    }
    out
}

/// Records whose name contains `query`, ignoring case.
pub fn filter<'a>(records: &'a [CityRecord], query: &str) -> Vec<&'a CityRecord> {
    let query = normalize(query);
    records
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&query))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extremes<'a> {
    pub warmest: &'a CityRecord,
    pub coldest: &'a CityRecord,
}

/// Warmest and coldest record; the earliest one wins a tie.
pub fn extremes(records: &[CityRecord]) -> Option<Extremes<'_>> {
    let first = records.first()?;
    let (warmest, coldest) = records.iter().skip(1).fold((first, first), |(hi, lo), r| {
        let hi = if r.temp_c.total_cmp(&hi.temp_c) == Ordering::Greater { r } else { hi };
        let lo = if r.temp_c.total_cmp(&lo.temp_c) == Ordering::Less { r } else { lo };
        (hi, lo)
    });
    Some(Extremes { warmest, coldest })
}

/// Outcome of [`Favorites::refresh_all`].
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub updated: Vec<String>,
    pub failed: Vec<(String, WeatherError)>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Favorite cities, unique by normalized name, in insertion order.
#[derive(Debug)]
pub struct Favorites {
    store: Store,
    entries: Vec<CityRecord>,
}

impl Favorites {
    /// Load from the store; an unreadable collection starts empty.
    pub fn load(store: Store) -> Self {
        let entries = store.load_or_default(FAVORITES_KEY);
        Self { store, entries }
    }

    pub fn entries(&self) -> &[CityRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        let key = normalize(name);
        self.entries.iter().any(|r| r.key() == key)
    }

    /// Returns `false` (and changes nothing) if the city is already a favorite.
    pub fn add(&mut self, record: CityRecord) -> bool {
        if self.is_favorite(&record.name) {
            return false;
        }
        tracing::debug!(city = %record.name, "adding favorite");
        self.entries.push(record);
        self.persist();
        true
    }

    /// Remove every entry matching `name`; returns how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let key = normalize(name);
        let before = self.entries.len();
        self.entries.retain(|r| r.key() != key);

        let removed = before - self.entries.len();
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// Re-fetch current conditions for every favorite, one city at a time.
    ///
    /// Entries are updated in place. A city that fails is reported and left
    /// untouched; the remaining cities are still refreshed.
    pub async fn refresh_all(&mut self, client: &WeatherClient) -> RefreshReport {
        let mut report = RefreshReport::default();

        for entry in &mut self.entries {
            match client.fetch_current(&Locator::city(entry.name.clone())).await {
                Ok(view) => {
                    entry.temp_c = view.temp_c;
                    entry.condition = view.condition;
                    entry.timestamp = Utc::now();
                    report.updated.push(entry.name.clone());
                }
                Err(err) => {
                    tracing::warn!(city = %entry.name, error = %err, "failed to refresh favorite");
                    report.failed.push((entry.name.clone(), err));
                }
            }
        }

        if !report.updated.is_empty() {
            self.persist();
        }
        tracing::info!(
            updated = report.updated.len(),
            failed = report.failed.len(),
            "refreshed favorites"
        );
        report
    }

    fn persist(&self) {
        self.store.save_logged(FAVORITES_KEY, &self.entries);
    }
}

/// Search history, newest first. Repeats are kept.
#[derive(Debug)]
pub struct History {
    store: Store,
    entries: Vec<CityRecord>,
}

impl History {
    pub fn load(store: Store) -> Self {
        let entries = store.load_or_default(HISTORY_KEY);
        Self { store, entries }
    }

    pub fn entries(&self) -> &[CityRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepend a search, stamped now.
    pub fn add(&mut self, name: &str, temp_c: f64, condition: &str) {
        self.entries.insert(0, CityRecord::new(name, temp_c, condition));
        self.persist();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    fn persist(&self) {
        self.store.save_logged(HISTORY_KEY, &self.entries);
    }
}
