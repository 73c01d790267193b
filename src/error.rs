use thiserror::Error;

/// Failures surfaced by the growth engine and dataset lookups.
///
/// Both are deterministic: retrying with the same input fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// `summarize` was given no entries, or only undefined ones.
    #[error("no growth data to summarize")]
    EmptyInput,

    /// A station or column name that is not in the dataset.
    #[error("category not found: {0}")]
    CategoryNotFound(String),
}
