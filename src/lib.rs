//! Job postings analytics: load a postings table, derive categorical fields,
//! filter it interactively and summarise the result for the dashboard.

pub mod config;
pub mod data;

pub use data::error::LoadError;
pub use data::filter::{filter, FilterCriteria, JobView};
pub use data::loader::{load_file, DatasetStore};
pub use data::model::{
    DerivedFields, ExperienceLevel, JobCategory, JobDataset, JobEntry, JobRecord, LocationType,
    SalaryRange,
};
