use serde::Serialize;

use super::growth::GrowthPoint;
use crate::error::AnalysisError;

/// Aggregate statistics over the defined entries of a growth sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthSummary<L> {
    pub mean: f64,
    pub max: f64,
    /// Label of the first entry holding `max`.
    pub max_at: L,
    pub min: f64,
    /// Label of the first entry holding `min`.
    pub min_at: L,
    /// Number of defined entries that went into the statistics.
    pub defined: usize,
}

/// Mean, maximum (with location) and minimum of a growth sequence.
///
/// Undefined entries are skipped. Ties resolve to the earliest entry.
/// Fails with [`AnalysisError::EmptyInput`] when the sequence is empty or has
/// no defined entry, so "no data" never reads as a zero.
pub fn summarize<L: Clone>(points: &[GrowthPoint<L>]) -> Result<GrowthSummary<L>, AnalysisError> {
    let mut defined = points
        .iter()
        .filter_map(|p| p.percent.filter(|v| v.is_finite()).map(|v| (&p.label, v)));

    let (first_label, first) = defined.next().ok_or(AnalysisError::EmptyInput)?;

    let mut mean = first;
    let mut count = 1usize;
    let (mut max, mut max_at) = (first, first_label);
    let (mut min, mut min_at) = (first, first_label);

    for (label, v) in defined {
        count += 1;
        mean = running_mean(mean, v, count);
        if v > max {
            max = v;
            max_at = label;
        }
        if v < min {
            min = v;
            min_at = label;
        }
    }

    Ok(GrowthSummary {
        mean,
        max,
        max_at: max_at.clone(),
        min,
        min_at: min_at.clone(),
        defined: count,
    })
}

/// Mean of the defined entries, `None` when there are none.
pub fn mean_growth<L>(points: &[GrowthPoint<L>]) -> Option<f64> {
    let (mean, count) = points
        .iter()
        .filter_map(|p| p.percent.filter(|v| v.is_finite()))
        .fold((0.0, 0usize), |(mean, count), v| {
            (running_mean(mean, v, count + 1), count + 1)
        });
    (count > 0).then_some(mean)
}

/// Fold `v` into the mean of the previous `count - 1` values.
/// Both terms are bounded by the largest input, so this stays finite where
/// a plain sum of large percentages would overflow.
fn running_mean(mean: f64, v: f64, count: usize) -> f64 {
    let n = count as f64;
    (mean - mean / n) + v / n
}
