use chrono::NaiveDate;
use serde::Serialize;

use super::resample::resample_yearly;
use crate::data::model::Series;

// ---------------------------------------------------------------------------
// GrowthPoint – one period-over-period change
// ---------------------------------------------------------------------------

/// Percentage change attributed to `label`.
///
/// For time series the label is the timestamp of the *later* period. For
/// cross-series summaries it is the series name. `percent == None` is an
/// undefined entry (missing input or zero denominator).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPoint<L> {
    pub label: L,
    pub percent: Option<f64>,
}

impl<L> GrowthPoint<L> {
    pub fn new(label: L, percent: Option<f64>) -> Self {
        Self { label, percent }
    }
}

/// `(current - previous) / previous * 100`.
///
/// Undefined when either side is missing or non-finite, when `previous`
/// is zero, or when the result overflows.
pub fn percent_change(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    let prev = previous.filter(|v| v.is_finite() && *v != 0.0)?;
    let cur = current.filter(|v| v.is_finite())?;
    Some((cur - prev) / prev * 100.0).filter(|v| v.is_finite())
}

/// Pairwise percentage change between consecutive points.
///
/// The series is taken as already aggregated to one point per month; no
/// resampling happens here. Output length is `len - 1`, or empty for fewer
/// than two points.
pub fn compute_monthly_growth(series: &Series) -> Vec<GrowthPoint<NaiveDate>> {
    series
        .points
        .windows(2)
        .map(|pair| {
            GrowthPoint::new(
                pair[1].timestamp,
                percent_change(pair[0].defined(), pair[1].defined()),
            )
        })
        .collect()
}

/// Resample to yearly means (year-end labels), then apply the same
/// pairwise rule as [`compute_monthly_growth`].
pub fn compute_yearly_growth(series: &Series) -> Vec<GrowthPoint<NaiveDate>> {
    compute_monthly_growth(&resample_yearly(series))
}
