use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Observation – a single (timestamp, value) cell
// ---------------------------------------------------------------------------

/// One measurement at one timestamp. `None` marks a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub timestamp: NaiveDate,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(timestamp: NaiveDate, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }

    /// The value if present and finite. NaN and infinities count as missing.
    pub fn defined(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }
}

// ---------------------------------------------------------------------------
// Series – one column of a station table
// ---------------------------------------------------------------------------

/// A named, timestamp-ordered sequence of measurements.
///
/// Points are expected to be sorted and free of duplicate timestamps; the
/// loader guarantees this, the analysis code relies on it without checking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Quantity being measured (e.g. `PM2.5`).
    pub name: String,
    pub points: Vec<Observation>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<Observation>) -> Self {
        Series {
            name: name.into(),
            points,
        }
    }

    /// Build a series from `(timestamp, value)` pairs where every value is present.
    pub fn from_values(name: impl Into<String>, values: &[(NaiveDate, f64)]) -> Self {
        let points = values
            .iter()
            .map(|&(timestamp, value)| Observation::new(timestamp, Some(value)))
            .collect();
        Series::new(name, points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last timestamps, if any.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.timestamp, self.points.last()?.timestamp))
    }
}

// ---------------------------------------------------------------------------
// Station – one loaded source table
// ---------------------------------------------------------------------------

/// A monitoring station: every numeric column of its source file becomes a
/// [`Series`]. Columns share the station's timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub name: String,
    pub series: Vec<Series>,
}

impl Station {
    pub fn new(name: impl Into<String>, series: Vec<Series>) -> Self {
        Station {
            name: name.into(),
            series,
        }
    }

    /// Ordered column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    /// Look up one column by name.
    pub fn series(&self, name: &str) -> Result<&Series, AnalysisError> {
        self.series
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| AnalysisError::CategoryNotFound(format!("{}/{name}", self.name)))
    }

    /// Number of rows (the longest column).
    pub fn row_count(&self) -> usize {
        self.series.iter().map(Series::len).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Dataset – every configured station
// ---------------------------------------------------------------------------

/// All stations loaded at startup, in configuration order.
///
/// Built once and never mutated; reports are derived from it on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub stations: Vec<Station>,
}

impl Dataset {
    /// Build a dataset, keeping the first station for any repeated name.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        let mut unique: Vec<Station> = Vec::with_capacity(stations.len());
        for station in stations {
            if unique.iter().any(|s| s.name == station.name) {
                log::warn!("duplicate station '{}' ignored", station.name);
                continue;
            }
            unique.push(station);
        }
        Dataset { stations: unique }
    }

    /// Select a station by name.
    pub fn station(&self, name: &str) -> Result<&Station, AnalysisError> {
        self.stations
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| AnalysisError::CategoryNotFound(name.to_string()))
    }

    /// Station names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.stations.iter().map(|s| s.name.as_str()).collect()
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    fn station(name: &str) -> Station {
        Station::new(
            name,
            vec![Series::from_values("PM2.5", &[(ym(2013, 3), 1.0)])],
        )
    }

    #[test]
    fn test_station_lookup_preserves_insertion_order() {
        let ds = Dataset::from_stations(vec![station("Shunyi"), station("Changping")]);
        assert_eq!(ds.names(), vec!["Shunyi", "Changping"]);
        assert_eq!(ds.station("Changping").unwrap().name, "Changping");
    }

    #[test]
    fn test_unknown_station_is_category_not_found() {
        let ds = Dataset::from_stations(vec![station("Shunyi")]);
        assert_eq!(
            ds.station("Atlantis"),
            Err(AnalysisError::CategoryNotFound("Atlantis".to_string()))
        );
    }

    #[test]
    fn test_duplicate_station_keeps_first() {
        let mut second = station("Shunyi");
        second.series.clear();
        let ds = Dataset::from_stations(vec![station("Shunyi"), second]);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.stations[0].series.len(), 1);
    }

    #[test]
    fn test_non_finite_values_are_not_defined() {
        assert_eq!(Observation::new(ym(2013, 3), Some(f64::NAN)).defined(), None);
        assert_eq!(Observation::new(ym(2013, 3), None).defined(), None);
        assert_eq!(Observation::new(ym(2013, 3), Some(2.5)).defined(), Some(2.5));
    }

    #[test]
    fn test_series_span() {
        let s = Series::from_values("CO", &[(ym(2013, 3), 1.0), (ym(2014, 1), 2.0)]);
        assert_eq!(s.span(), Some((ym(2013, 3), ym(2014, 1))));
        assert_eq!(Series::new("CO", Vec::new()).span(), None);
    }
}
