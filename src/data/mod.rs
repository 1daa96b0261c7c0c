/// Data layer: table types, loading, header normalization, coercion, caching.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .xlsx / .ods / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (raw headers, text cells)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  " Revenue (INR) " → revenue_inr
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  coerce   │  all-or-nothing numeric parse per column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  Arc<DatasetBundle>, reloaded on mtime change
///   └──────────┘
/// ```

pub mod cache;
pub mod coerce;
pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
