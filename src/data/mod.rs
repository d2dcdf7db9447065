/// Data layer: core types, CSV I/O, statistics, filtering, transforms.
///
/// Architecture:
/// ```text
///      .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table / serialize Table → CSV
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   Table   │  column names, row-major cells, inferred kinds
///   └──────────┘
///     │      │
///     ▼      ▼
///  ┌───────┐ ┌───────────┐
///  │ stats  │ │ filter /   │  describe, missing counts, correlation;
///  │        │ │ transform  │  equality subsets; cleaning policies
///  └───────┘ └───────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
pub mod transform;
