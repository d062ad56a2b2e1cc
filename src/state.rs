use std::path::Path;
use std::sync::Arc;

use jobs_dashboard::config::{DashboardConfig, SummaryThresholds};
use jobs_dashboard::data::filter::filtered_indices;
use jobs_dashboard::data::summary::{ColorBy, ExplorerX, ExplorerY};
use jobs_dashboard::{DatasetStore, FilterCriteria, JobCategory, JobDataset, LocationType};

// ---------------------------------------------------------------------------
// Filter widget values
// ---------------------------------------------------------------------------

/// Raw values of the sidebar widgets. Turned into [`FilterCriteria`] on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControls {
    pub experience: (i64, i64),
    pub salary: (f64, f64),
    pub location_type: Option<LocationType>,
    pub company: Option<String>,
    pub category: Option<JobCategory>,
}

impl FilterControls {
    /// Controls spanning the whole dataset, every selector at "All".
    pub fn full_range(dataset: &JobDataset) -> Self {
        FilterControls {
            experience: dataset.experience_extent.unwrap_or((0, 0)),
            salary: dataset.salary_extent.unwrap_or((0.0, 0.0)),
            location_type: None,
            company: None,
            category: None,
        }
    }

    /// Range bounds equal to the dataset extent impose no constraint.
    pub fn to_criteria(&self, dataset: &JobDataset) -> FilterCriteria {
        let (exp_lo, exp_hi) = dataset.experience_extent.unwrap_or(self.experience);
        let (sal_lo, sal_hi) = dataset.salary_extent.unwrap_or(self.salary);
        FilterCriteria {
            experience_min: (self.experience.0 > exp_lo).then_some(self.experience.0),
            experience_max: (self.experience.1 < exp_hi).then_some(self.experience.1),
            salary_min: (self.salary.0 > sal_lo).then_some(self.salary.0),
            salary_max: (self.salary.1 < sal_hi).then_some(self.salary.1),
            location_type: self.location_type,
            company: self.company.clone(),
            category: self.category,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Load-once owner of the current source file.
    store: Option<DatasetStore>,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<JobDataset>>,

    /// Current sidebar selections.
    pub controls: Option<FilterControls>,

    /// Criteria behind `visible_indices`.
    applied: Option<FilterCriteria>,

    /// Indices of postings passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub thresholds: SummaryThresholds,

    /// Companies offered in the company selector.
    pub company_choices: usize,

    /// Category inspected in the drill-down section.
    pub drilldown_category: Option<JobCategory>,

    pub explorer_x: ExplorerX,
    pub explorer_y: ExplorerY,
    pub color_by: ColorBy,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            store: None,
            dataset: None,
            controls: None,
            applied: None,
            visible_indices: Vec::new(),
            thresholds: config.thresholds(),
            company_choices: config.company_choices,
            drilldown_category: None,
            explorer_x: ExplorerX::Years,
            explorer_y: ExplorerY::Salary,
            color_by: ColorBy::ExperienceLevel,
            status_message: None,
        }
    }

    /// Adopt a store whose dataset already loaded.
    pub fn set_store(&mut self, store: DatasetStore, dataset: Arc<JobDataset>) {
        self.controls = Some(FilterControls::full_range(&dataset));
        self.visible_indices = (0..dataset.len()).collect();
        self.applied = Some(FilterCriteria::all());
        self.drilldown_category = dataset.categories.first().copied();
        self.dataset = Some(dataset);
        self.store = Some(store);
        self.status_message = None;
    }

    /// Load another file; on failure the current dataset stays in place.
    pub fn open_file(&mut self, path: &Path) {
        if self.store.as_ref().is_some_and(|s| s.path() == path) {
            return;
        }
        let store = DatasetStore::new(path);
        match store.get() {
            Ok(dataset) => self.set_store(store, dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Reset every filter to "All".
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.controls = Some(FilterControls::full_range(ds));
            self.refilter();
        }
    }

    /// Recompute `visible_indices` if the controls changed since the last pass.
    pub fn refilter(&mut self) {
        let (Some(ds), Some(controls)) = (&self.dataset, &self.controls) else {
            return;
        };
        let criteria = controls.to_criteria(ds);
        if self.applied.as_ref() == Some(&criteria) {
            return;
        }
        self.visible_indices = filtered_indices(ds, &criteria);
        log::debug!(
            "Filter {:?} keeps {} of {} postings",
            criteria,
            self.visible_indices.len(),
            ds.len()
        );
        self.applied = Some(criteria);
    }
}
