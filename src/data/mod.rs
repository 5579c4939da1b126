/// Data layer: core types, loading, persistence, cleaning and statistics.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐        ┌──────────┐
///   │  loader   │ ─────▶ │  store    │  snapshot / restore last session
///   └──────────┘        └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  columns + Vec<Record>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  drop disqualified / incomplete records
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  mean / median / mode, frequency counts
///   └──────────┘
/// ```

pub mod clean;
pub mod loader;
pub mod model;
pub mod stats;
pub mod store;
