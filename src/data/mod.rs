/// Data layer: core types, loading, and column selection.
///
/// Architecture:
/// ```text
///  data/<station>.csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Station (sorted, de-duplicated)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Station>, lookup by name
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  keep only the requested pollutant columns
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
