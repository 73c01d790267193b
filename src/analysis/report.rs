use chrono::NaiveDate;
use serde::Serialize;

use super::growth::{compute_monthly_growth, compute_yearly_growth, GrowthPoint};
use super::summary::{mean_growth, summarize, GrowthSummary};
use crate::data::model::{Dataset, Series, Station};
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// GrowthReport – one series
// ---------------------------------------------------------------------------

/// Monthly and yearly growth of a single series with their summaries.
///
/// A summary is `None` when its sequence has no defined entry; callers show a
/// "no data" state for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthReport {
    pub series: String,
    pub monthly_growth: Vec<GrowthPoint<NaiveDate>>,
    pub yearly_growth: Vec<GrowthPoint<NaiveDate>>,
    pub monthly_summary: Option<GrowthSummary<NaiveDate>>,
    pub yearly_summary: Option<GrowthSummary<NaiveDate>>,
}

impl GrowthReport {
    pub fn compute(series: &Series) -> Self {
        let monthly_growth = compute_monthly_growth(series);
        let yearly_growth = compute_yearly_growth(series);
        GrowthReport {
            series: series.name.clone(),
            monthly_summary: summary_or_none(&series.name, "monthly", &monthly_growth),
            yearly_summary: summary_or_none(&series.name, "yearly", &yearly_growth),
            monthly_growth,
            yearly_growth,
        }
    }

    /// Mean monthly growth, `None` when no entry is defined.
    pub fn mean_monthly(&self) -> Option<f64> {
        mean_growth(&self.monthly_growth)
    }

    /// Mean yearly growth, `None` when no entry is defined.
    pub fn mean_yearly(&self) -> Option<f64> {
        mean_growth(&self.yearly_growth)
    }
}

fn summary_or_none<L: Clone>(
    name: &str,
    period: &str,
    points: &[GrowthPoint<L>],
) -> Option<GrowthSummary<L>> {
    match summarize(points) {
        Ok(summary) => Some(summary),
        Err(e) => {
            log::debug!("{name}: {period} summary unavailable: {e}");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// StationReport – every series of a station, plus cross-series overview
// ---------------------------------------------------------------------------

/// Growth of every series of a station.
///
/// `monthly_by_series` holds one entry per series: its mean monthly growth,
/// labelled by series name. `monthly_overview` summarizes those means, so
/// `max_at` names the series that grew fastest on average. Same for yearly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    pub station: String,
    pub series: Vec<GrowthReport>,
    pub monthly_by_series: Vec<GrowthPoint<String>>,
    pub yearly_by_series: Vec<GrowthPoint<String>>,
    pub monthly_overview: Option<GrowthSummary<String>>,
    pub yearly_overview: Option<GrowthSummary<String>>,
}

impl StationReport {
    pub fn compute(station: &Station) -> Self {
        let series: Vec<GrowthReport> = station.series.iter().map(GrowthReport::compute).collect();

        let monthly_by_series: Vec<GrowthPoint<String>> = series
            .iter()
            .map(|r| GrowthPoint::new(r.series.clone(), r.mean_monthly()))
            .collect();
        let yearly_by_series: Vec<GrowthPoint<String>> = series
            .iter()
            .map(|r| GrowthPoint::new(r.series.clone(), r.mean_yearly()))
            .collect();

        StationReport {
            station: station.name.clone(),
            monthly_overview: summary_or_none(&station.name, "monthly", &monthly_by_series),
            yearly_overview: summary_or_none(&station.name, "yearly", &yearly_by_series),
            series,
            monthly_by_series,
            yearly_by_series,
        }
    }

    /// Report for one series of the station.
    pub fn series(&self, name: &str) -> Result<&GrowthReport, AnalysisError> {
        self.series
            .iter()
            .find(|r| r.series == name)
            .ok_or_else(|| AnalysisError::CategoryNotFound(format!("{}/{name}", self.station)))
    }
}

/// Select a station by name and compute its report.
pub fn report_for(dataset: &Dataset, station: &str) -> Result<StationReport, AnalysisError> {
    let station = dataset.station(station)?;
    Ok(StationReport::compute(station))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;

    fn ym(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    fn dongsi() -> Station {
        Station::new(
            "Dongsi",
            vec![
                // +100, -25  → mean 37.5
                Series::from_values(
                    "PM2.5",
                    &[(ym(2013, 1), 10.0), (ym(2013, 2), 20.0), (ym(2013, 3), 15.0)],
                ),
                // +50, -50 → mean 0
                Series::from_values(
                    "SO2",
                    &[(ym(2013, 1), 4.0), (ym(2013, 2), 6.0), (ym(2013, 3), 3.0)],
                ),
                // no defined growth at all
                Series::new(
                    "O3",
                    vec![
                        Observation::new(ym(2013, 1), Some(0.0)),
                        Observation::new(ym(2013, 2), None),
                        Observation::new(ym(2013, 3), Some(1.0)),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_series_report() {
        let station = dongsi();
        let report = GrowthReport::compute(station.series("PM2.5").unwrap());
        assert_eq!(report.monthly_growth.len(), 2);
        let summary = report.monthly_summary.unwrap();
        assert_eq!(summary.mean, 37.5);
        assert_eq!(summary.max_at, ym(2013, 2));
        // Single calendar year: nothing to diff against.
        assert!(report.yearly_growth.is_empty());
        assert!(report.yearly_summary.is_none());
    }

    #[test]
    fn test_station_overview_across_series() {
        let report = StationReport::compute(&dongsi());
        assert_eq!(report.station, "Dongsi");
        assert_eq!(
            report.monthly_by_series,
            vec![
                GrowthPoint::new("PM2.5".to_string(), Some(37.5)),
                GrowthPoint::new("SO2".to_string(), Some(0.0)),
                GrowthPoint::new("O3".to_string(), None),
            ]
        );

        let overview = report.monthly_overview.unwrap();
        assert_eq!(overview.mean, 18.75);
        assert_eq!(overview.max_at, "PM2.5");
        assert_eq!(overview.min_at, "SO2");
        assert_eq!(overview.defined, 2);
        assert!(report.yearly_overview.is_none());
    }

    #[test]
    fn test_series_lookup_in_report() {
        let report = StationReport::compute(&dongsi());
        assert!(report.series("SO2").is_ok());
        assert_eq!(
            report.series("CO"),
            Err(AnalysisError::CategoryNotFound("Dongsi/CO".to_string()))
        );
    }

    #[test]
    fn test_report_for_unknown_station() {
        let ds = Dataset::from_stations(vec![dongsi()]);
        assert!(report_for(&ds, "Dongsi").is_ok());
        assert_eq!(
            report_for(&ds, "Gucheng"),
            Err(AnalysisError::CategoryNotFound("Gucheng".to_string()))
        );
    }
}
