//! Data layer: core types, loading, derivation, filtering and aggregates.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse rows → JobRecord, load once per DatasetStore
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  derive   │  buckets, location type, state, classify (title → category)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ JobDataset │  Vec<JobEntry>, filter option indices
//!   └────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterCriteria → JobView (borrowed subsequence)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────────┐
//!   │ stats / summary │  aggregates per dashboard section
//!   └─────────────────┘
//! ```

pub mod classify;
pub mod derive;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
pub mod summary;
