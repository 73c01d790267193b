//! airtrend: growth analysis for air-pollution monitoring stations.
//!
//! # Module structure
//!
//! ```text
//! airtrend
//! ├── config      — station registry (stations.toml)
//! ├── error       — AnalysisError (EmptyInput, CategoryNotFound)
//! ├── data
//! │   ├── model   — Observation, Series, Station, Dataset
//! │   ├── loader  — CSV / JSON station tables, sorted and de-duplicated
//! │   └── filter  — restrict a station to selected pollutant columns
//! ├── analysis
//! │   ├── growth   — pairwise percentage change (monthly / yearly)
//! │   ├── resample — yearly means, year-end labelled
//! │   ├── summary  — mean / max (with location) / min
//! │   └── report   — GrowthReport per series, StationReport per station
//! └── state       — current selection; recomputes the report per selection
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod state;

pub use error::AnalysisError;
