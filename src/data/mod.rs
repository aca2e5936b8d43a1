//! Data layer: record types and the per-record pipeline stages.
//!
//! Architecture:
//! ```text
//!  data/*.parquet (.csv / .json)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  discover + parse files → RawTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  clean    │  lower-case names, type fields, duration → TripRecord
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  validity constraints → ValidTrip
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  metrics  │  cost per minute / mile → PricedTrip
//!   └──────────┘
//! ```

pub mod clean;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
