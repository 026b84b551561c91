/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  matches.csv / deliveries.csv (.json / .parquet)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse files → CricketDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ CricketDataset │  match + delivery tables, selector index
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  season/team/city/venue predicates → row indices
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ aggregate  │  totals, top batters/bowlers, run rate
///   └────────────┘
/// ```
pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
