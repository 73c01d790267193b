//! Growth analysis over station time series.
//!
//! Pipeline:
//! ```text
//!   Series ──(yearly only)──▶ resample ──▶ growth ──▶ summary
//!                                                        │
//!                                   report ◀─────────────┘
//! ```
//!
//! Every function here is pure: inputs are borrowed, nothing is cached, and a
//! report is recomputed from its series whenever it is requested.

pub mod growth;
pub mod report;
pub mod resample;
pub mod summary;
