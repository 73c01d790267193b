use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::data::model::{Observation, Series};

/// Reduce a series to one point per calendar year.
///
/// Each year's value is the mean of its present observations and is labelled
/// with 31 December of that year. Years without any present value produce no
/// point, so every emitted point has a defined value.
pub fn resample_yearly(series: &Series) -> Series {
    // year -> (sum, count)
    let mut buckets: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for obs in &series.points {
        if let Some(v) = obs.defined() {
            let bucket = buckets.entry(obs.timestamp.year()).or_insert((0.0, 0));
            bucket.0 += v;
            bucket.1 += 1;
        }
    }

    let points = buckets
        .into_iter()
        .filter_map(|(year, (sum, count))| {
            let year_end = NaiveDate::from_ymd_opt(year, 12, 31)?;
            Some(Observation::new(year_end, Some(sum / count as f64)))
        })
        .collect();

    Series::new(series.name.clone(), points)
}
