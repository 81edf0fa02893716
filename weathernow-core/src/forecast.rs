//! Reduction of the provider's 3-hour series into hourly and daily views.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    model::{DailySummary, HourlyEntry, RawSample},
    units::{IconCategory, format_local_time, to_kmh},
};

/// Eight 3-hour steps, i.e. the next 24 hours.
pub const DEFAULT_HOURLY_COUNT: usize = 8;

/// Upper bound on the number of daily entries surfaced to callers.
pub const MAX_DAILY_ENTRIES: usize = 5;

/// Knobs for the two forecast views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastOptions {
    pub hourly_count: usize,
    /// Clamped to [`MAX_DAILY_ENTRIES`].
    pub daily_limit: usize,
    /// Drop the first (partial, already elapsed) day.
    pub skip_first_day: bool,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            hourly_count: DEFAULT_HOURLY_COUNT,
            daily_limit: MAX_DAILY_ENTRIES,
            skip_first_day: false,
        }
    }
}

/// Samples sharing one calendar date, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    pub date: NaiveDate,
    pub samples: Vec<&'a RawSample>,
}

impl DayGroup<'_> {
    /// Positional middle sample (`floor(len / 2)`), not a time-of-day lookup.
    pub fn representative(&self) -> Option<&RawSample> {
        self.samples.get(self.samples.len() / 2).copied()
    }

    fn summarize(&self) -> Option<DailySummary> {
        let middle = self.representative()?;

        let temp_min_c = self
            .samples
            .iter()
            .map(|s| s.low_c())
            .fold(f64::INFINITY, f64::min);
        let temp_max_c = self
            .samples
            .iter()
            .map(|s| s.high_c())
            .fold(f64::NEG_INFINITY, f64::max);

        Some(DailySummary {
            date: self.date,
            // A sample can carry temp_min > temp_max; keep the pair ordered.
            temp_min_c: temp_min_c.min(temp_max_c),
            temp_max_c: temp_max_c.max(temp_min_c),
            condition_code: middle.condition_code.clone(),
            condition_label: middle.condition_label.clone(),
            icon: IconCategory::from_code(&middle.condition_code),
        })
    }
}

/// First `count` samples, mapped for display. No grouping or deduplication.
pub fn hourly_slice(samples: &[RawSample], count: usize, timezone_offset: i32) -> Vec<HourlyEntry> {
    samples
        .iter()
        .take(count)
        .map(|s| HourlyEntry {
            timestamp: s.timestamp,
            local_time: format_local_time(s.timestamp, timezone_offset),
            temp_c: s.temp_c,
            condition_code: s.condition_code.clone(),
            icon: IconCategory::from_code(&s.condition_code),
            wind_kmh: to_kmh(s.wind_mps),
        })
        .collect()
}

/// Group samples by the date portion of their date-time text.
///
/// Groups come out in first-seen order. Samples with an unparseable date or a
/// non-finite temperature are left out of every group.
pub fn group_by_date(samples: &[RawSample]) -> Vec<DayGroup<'_>> {
    let mut groups: Vec<DayGroup<'_>> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for sample in samples {
        let Some(date) = sample.date() else {
            tracing::debug!(date_text = %sample.date_text, "skipping forecast sample with unreadable date");
            continue;
        };
        if !(sample.low_c().is_finite() && sample.high_c().is_finite()) {
            tracing::debug!(%date, "skipping forecast sample without a usable temperature");
            continue;
        }

        match index.get(&date) {
            Some(&i) => groups[i].samples.push(sample),
            None => {
                index.insert(date, groups.len());
                groups.push(DayGroup { date, samples: vec![sample] });
            }
        }
    }

    groups
}

/// Per-day min/max and representative condition.
pub fn daily_summary(samples: &[RawSample], options: &ForecastOptions) -> Vec<DailySummary> {
    let limit = options.daily_limit.min(MAX_DAILY_ENTRIES);
    let skip = usize::from(options.skip_first_day);

    group_by_date(samples)
        .iter()
        .skip(skip)
        .take(limit)
        .filter_map(DayGroup::summarize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: i64 = 3 * 3600;

    /// One inner slice per day, 3-hour steps from midnight, first day 2024-07-15.
    fn series(temps_per_day: &[&[f64]]) -> Vec<RawSample> {
        let start = NaiveDate::from_ymd_opt(2024, 7, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp())
            .unwrap();

        let mut out = Vec::new();
        for (day_index, temps) in temps_per_day.iter().enumerate() {
            let day_start = start + day_index as i64 * 86_400;
            for (i, &t) in temps.iter().enumerate() {
                let ts = day_start + i as i64 * STEP;
                let dt = chrono::DateTime::from_timestamp(ts, 0).unwrap();
                out.push(RawSample {
                    timestamp: ts,
                    date_text: dt.format("%Y-%m-%d %H:%M:%S").to_string(),
                    temp_c: t,
                    temp_min_c: None,
                    temp_max_c: None,
                    condition_code: format!("{:02}d", i + 1),
                    condition_label: format!("condition {i}"),
                    wind_mps: 2.0,
                });
            }
        }
        out
    }

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 14 + n).unwrap()
    }

    #[test]
    fn two_day_scenario() {
        let samples = series(&[
            &[10.0, 12.0, 9.0, 15.0, 11.0, 14.0, 13.0, 10.0],
            &[5.0, 6.0, 4.0, 8.0, 7.0, 9.0, 3.0, 6.0],
        ]);
        assert_eq!(samples.len(), 16);

        let daily = daily_summary(&samples, &ForecastOptions::default());
        assert_eq!(daily.len(), 2);

        assert_eq!(daily[0].date, day(1));
        assert_eq!(daily[0].temp_min_c, 9.0);
        assert_eq!(daily[0].temp_max_c, 15.0);

        assert_eq!(daily[1].date, day(2));
        assert_eq!(daily[1].temp_min_c, 3.0);
        assert_eq!(daily[1].temp_max_c, 9.0);
    }

    #[test]
    fn representative_is_middle_sample() {
        let samples = series(&[&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], &[1.0, 2.0, 3.0]]);
        let daily = daily_summary(&samples, &ForecastOptions::default());

        // index 4 of 8
        assert_eq!(daily[0].condition_code, "05d");
        assert_eq!(daily[0].condition_label, "condition 4");
        // index 1 of 3
        assert_eq!(daily[1].condition_code, "02d");
        assert_eq!(daily[1].icon, IconCategory::Clouds);
    }

    #[test]
    fn per_sample_bounds_are_used_when_present() {
        let mut samples = series(&[&[10.0, 11.0]]);
        samples[0].temp_min_c = Some(7.5);
        samples[0].temp_max_c = Some(10.5);
        samples[1].temp_min_c = Some(9.0);
        samples[1].temp_max_c = Some(13.25);

        let daily = daily_summary(&samples, &ForecastOptions::default());
        assert_eq!(daily[0].temp_min_c, 7.5);
        assert_eq!(daily[0].temp_max_c, 13.25);
    }

    #[test]
    fn single_sample_day_uses_sample_as_is() {
        let samples = series(&[&[17.0]]);
        let daily = daily_summary(&samples, &ForecastOptions::default());

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].temp_min_c, 17.0);
        assert_eq!(daily[0].temp_max_c, 17.0);
        assert_eq!(daily[0].condition_code, "01d");
    }

    #[test]
    fn empty_input_yields_empty_outputs() {
        assert!(hourly_slice(&[], DEFAULT_HOURLY_COUNT, 0).is_empty());
        assert!(group_by_date(&[]).is_empty());
        assert!(daily_summary(&[], &ForecastOptions::default()).is_empty());
    }

    #[test]
    fn daily_is_truncated_to_five_days() {
        let two_samples: &[f64] = &[1.0, 2.0];
        let samples = series(&vec![two_samples; 7]);

        let opts = ForecastOptions { daily_limit: 10, ..ForecastOptions::default() };
        let daily = daily_summary(&samples, &opts);
        assert_eq!(daily.len(), MAX_DAILY_ENTRIES);
        assert_eq!(daily[0].date, day(1));

        let opts = ForecastOptions { daily_limit: 3, ..ForecastOptions::default() };
        assert_eq!(daily_summary(&samples, &opts).len(), 3);
    }

    #[test]
    fn skip_first_day_starts_from_second_group() {
        let two_samples: &[f64] = &[1.0, 2.0];
        let samples = series(&vec![two_samples; 7]);

        let opts = ForecastOptions { skip_first_day: true, ..ForecastOptions::default() };
        let daily = daily_summary(&samples, &opts);

        assert_eq!(daily.len(), 5);
        assert_eq!(daily[0].date, day(2));
        assert_eq!(daily[4].date, day(6));
    }

    #[test]
    fn distinct_dates_match_input() {
        let samples = series(&[&[1.0, 2.0, 3.0], &[4.0], &[5.0, 6.0]]);
        let groups = group_by_date(&samples);
        assert_eq!(groups.len(), 3);
        assert_eq!(daily_summary(&samples, &ForecastOptions::default()).len(), 3);
    }

    #[test]
    fn grouping_preserves_every_sample_once() {
        let samples = series(&[
            &[10.0, 12.0, 9.0, 15.0, 11.0, 14.0, 13.0, 10.0],
            &[5.0, 6.0, 4.0],
            &[1.0, 2.0, 3.0, 4.0, 5.0],
        ]);
        let flattened: Vec<&RawSample> = group_by_date(&samples)
            .into_iter()
            .flat_map(|g| g.samples)
            .collect();

        assert_eq!(flattened.len(), samples.len());
        for (original, regrouped) in samples.iter().zip(flattened) {
            assert_eq!(original, regrouped);
        }
    }

    #[test]
    fn min_never_exceeds_max() {
        let mut samples = series(&[&[3.0, -2.0, 8.0], &[0.0], &[-5.0, -1.0]]);
        // inverted per-sample bounds
        samples[3].temp_min_c = Some(4.0);
        samples[3].temp_max_c = Some(1.0);

        for d in daily_summary(&samples, &ForecastOptions::default()) {
            assert!(d.temp_min_c <= d.temp_max_c, "{d:?}");
        }
    }

    #[test]
    fn malformed_samples_are_skipped_not_fatal() {
        let mut samples = series(&[&[10.0, 12.0, 14.0]]);
        samples[1].date_text = "not a date".into();
        samples.push(RawSample { temp_c: f64::NAN, ..samples[0].clone() });

        let groups = group_by_date(&samples);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].samples.len(), 2);

        let daily = daily_summary(&samples, &ForecastOptions::default());
        assert_eq!(daily[0].temp_min_c, 10.0);
        assert_eq!(daily[0].temp_max_c, 14.0);
    }

    #[test]
    fn non_contiguous_dates_join_their_first_group() {
        let mut samples = series(&[&[1.0], &[2.0]]);
        samples.push(RawSample { temp_c: 9.0, ..samples[0].clone() });

        let groups = group_by_date(&samples);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].samples.len(), 2);
        assert_eq!(groups[1].date, day(2));
    }

    #[test]
    fn hourly_takes_first_n_in_order() {
        let samples = series(&[&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], &[9.0, 10.0]]);
        let hourly = hourly_slice(&samples, DEFAULT_HOURLY_COUNT, 0);

        assert_eq!(hourly.len(), 8);
        assert_eq!(hourly[0].temp_c, 1.0);
        assert_eq!(hourly[7].temp_c, 8.0);
        assert_eq!(hourly[0].local_time, "00:00");
        assert_eq!(hourly[1].local_time, "03:00");
        assert_eq!(hourly[0].wind_kmh, 7);
        assert_eq!(hourly[0].icon, IconCategory::Clear);
        assert!(hourly.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn hourly_is_bounded_by_available_samples() {
        let samples = series(&[&[1.0, 2.0, 3.0]]);
        assert_eq!(hourly_slice(&samples, 8, 0).len(), 3);
        assert_eq!(hourly_slice(&samples, 7, 7200)[0].local_time, "02:00");
    }
}
