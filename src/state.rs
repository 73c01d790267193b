use crate::analysis::report::StationReport;
use crate::data::filter::select_columns;
use crate::data::model::Dataset;
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Selection state
// ---------------------------------------------------------------------------

/// What the presentation layer has selected, independent of rendering.
///
/// The dataset is fixed at construction. The report is rebuilt from the
/// dataset on every selection and never reused for a different one.
pub struct DashboardState {
    /// Stations loaded at startup.
    pub dataset: Dataset,

    /// Currently selected station, if any.
    pub selected: Option<String>,

    /// Pollutant columns to analyse; empty means all.
    pub columns: Vec<String>,

    /// Report for the current selection.
    pub report: Option<StationReport>,

    /// Status / error message for the last selection.
    pub status_message: Option<String>,
}

impl DashboardState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            selected: None,
            columns: Vec::new(),
            report: None,
            status_message: None,
        }
    }

    /// Restrict future reports to the given columns.
    pub fn set_columns(&mut self, columns: Vec<String>) {
        self.columns = columns;
    }

    /// Select a station and compute its report.
    ///
    /// On failure the previous report is dropped and the error is kept in
    /// `status_message` as well as returned.
    pub fn select(&mut self, station: &str) -> Result<&StationReport, AnalysisError> {
        self.report = None;
        self.selected = None;

        let result = self
            .dataset
            .station(station)
            .and_then(|s| select_columns(s, &self.columns));

        match result {
            Ok(filtered) => {
                log::debug!(
                    "selected '{}' ({} series)",
                    filtered.name,
                    filtered.series.len()
                );
                self.selected = Some(filtered.name.clone());
                self.status_message = None;
                let report: &StationReport = self.report.insert(StationReport::compute(&filtered));
                Ok(report)
            }
            Err(e) => {
                log::warn!("selection failed: {e}");
                self.status_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Select the first station of the dataset, if there is one.
    pub fn select_first(&mut self) -> Option<Result<&StationReport, AnalysisError>> {
        let first = self.dataset.names().first()?.to_string();
        Some(self.select(&first))
    }
}
