use super::model::{JobCategory, JobDataset, JobEntry, LocationType};

// ---------------------------------------------------------------------------
// Filter predicate: the active constraints of one interaction
// ---------------------------------------------------------------------------

/// Conjunction of optional constraints. `None` means "All" for that clause.
///
/// Range bounds are inclusive on both ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub experience_min: Option<i64>,
    pub experience_max: Option<i64>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub location_type: Option<LocationType>,
    pub company: Option<String>,
    pub category: Option<JobCategory>,
}

impl FilterCriteria {
    /// Criteria that keep every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Whether no clause is active.
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `entry` satisfies every active clause.
    pub fn matches(&self, entry: &JobEntry) -> bool {
        let rec = &entry.record;
        let years = rec.years_of_experience;

        if self.experience_min.is_some_and(|min| years < min) {
            return false;
        }
        if self.experience_max.is_some_and(|max| years > max) {
            return false;
        }
        // NaN salaries fail any active salary bound.
        if self.salary_min.is_some_and(|min| !(rec.salary >= min)) {
            return false;
        }
        if self.salary_max.is_some_and(|max| !(rec.salary <= max)) {
            return false;
        }
        if self.location_type.is_some_and(|loc| entry.derived.location_type != loc) {
            return false;
        }
        if let Some(company) = &self.company {
            if rec.company_name != *company {
                return false;
            }
        }
        if self.category.is_some_and(|cat| entry.derived.job_category != cat) {
            return false;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// A filtered, borrowed subsequence of a [`JobDataset`], in dataset order.
#[derive(Debug, Clone, Default)]
pub struct JobView<'a> {
    entries: Vec<&'a JobEntry>,
}

impl<'a> JobView<'a> {
    /// View over every entry of the dataset.
    pub fn full(dataset: &'a JobDataset) -> Self {
        JobView {
            entries: dataset.entries.iter().collect(),
        }
    }

    /// View over the given row indices; out-of-range indices are ignored.
    pub fn from_indices(dataset: &'a JobDataset, indices: &[usize]) -> Self {
        JobView {
            entries: indices
                .iter()
                .filter_map(|&i| dataset.entries.get(i))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a JobEntry> + '_ {
        self.entries.iter().copied()
    }

    pub fn entries(&self) -> &[&'a JobEntry] {
        &self.entries
    }

    /// Narrow this view further; used for per-category drill-downs.
    pub fn refine(&self, criteria: &FilterCriteria) -> JobView<'a> {
        JobView {
            entries: self
                .entries
                .iter()
                .copied()
                .filter(|e| criteria.matches(e))
                .collect(),
        }
    }

    pub fn salaries(&self) -> Vec<f64> {
        self.iter().map(|e| e.record.salary).collect()
    }

    pub fn years(&self) -> Vec<f64> {
        self.iter()
            .map(|e| e.record.years_of_experience as f64)
            .collect()
    }
}

/// Return the entries that pass all active filters.
pub fn filter<'a>(dataset: &'a JobDataset, criteria: &FilterCriteria) -> JobView<'a> {
    JobView {
        entries: dataset
            .entries
            .iter()
            .filter(|e| criteria.matches(e))
            .collect(),
    }
}

/// Return indices of entries that pass all active filters.
pub fn filtered_indices(dataset: &JobDataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .entries
        .iter()
        .enumerate()
        .filter(|(_, e)| criteria.matches(e))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn dataset() -> JobDataset {
        JobDataset::from_records(vec![
            record("Data Analyst", "Acme", "Remote", 0, 70_000.0),
            record("Data Scientist", "Acme", "Austin, TX (Hybrid)", 3, 130_000.0),
            record("Data Engineer", "Globex", "Boston, MA (On-site)", 0, 110_000.0),
            record("Director of Analytics", "Globex", "Remote", 12, 260_000.0),
            record("Researcher", "Initech", "Denver, CO", 5, 150_000.0),
        ])
    }

    #[test]
    fn unconstrained_filter_is_identity() {
        let ds = dataset();
        let criteria = FilterCriteria::all();
        assert!(criteria.is_unconstrained());

        let view = filter(&ds, &criteria);
        assert_eq!(view.len(), ds.len());
        for (a, b) in view.iter().zip(ds.entries.iter()) {
            assert!(std::ptr::eq(a, b));
        }
    }

    #[test]
    fn zero_experience_range() {
        let ds = dataset();
        let criteria = FilterCriteria {
            experience_min: Some(0),
            experience_max: Some(0),
            salary_min: Some(0.0),
            salary_max: Some(f64::MAX),
            ..FilterCriteria::default()
        };
        let view = filter(&ds, &criteria);
        assert_eq!(view.len(), 2);
        assert!(view.iter().all(|e| e.record.years_of_experience == 0));
        assert_eq!(filtered_indices(&ds, &criteria), vec![0, 2]);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let ds = dataset();
        let criteria = FilterCriteria {
            salary_min: Some(110_000.0),
            salary_max: Some(150_000.0),
            ..FilterCriteria::default()
        };
        assert_eq!(filtered_indices(&ds, &criteria), vec![1, 2, 4]);
    }

    #[test]
    fn equality_clauses_combine() {
        let ds = dataset();
        let criteria = FilterCriteria {
            location_type: Some(LocationType::Remote),
            company: Some("Globex".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(filtered_indices(&ds, &criteria), vec![3]);

        let by_category = FilterCriteria {
            category: Some(JobCategory::DataAnalyst),
            ..FilterCriteria::default()
        };
        // "Director of Analytics" matches the analyst rule before the manager rule.
        assert_eq!(filtered_indices(&ds, &by_category), vec![0, 3]);
    }

    #[test]
    fn impossible_criteria_give_empty_view() {
        let ds = dataset();
        let criteria = FilterCriteria {
            company: Some("Nobody".to_string()),
            ..FilterCriteria::default()
        };
        let view = filter(&ds, &criteria);
        assert!(view.is_empty());
        assert!(view.salaries().is_empty());
    }

    #[test]
    fn refine_narrows_existing_view() {
        let ds = dataset();
        let acme = filter(
            &ds,
            &FilterCriteria {
                company: Some("Acme".to_string()),
                ..FilterCriteria::default()
            },
        );
        let hybrid = acme.refine(&FilterCriteria {
            location_type: Some(LocationType::Hybrid),
            ..FilterCriteria::default()
        });
        assert_eq!(hybrid.len(), 1);
        assert_eq!(hybrid.entries()[0].record.salary, 130_000.0);
    }

    #[test]
    fn view_from_indices_skips_out_of_range() {
        let ds = dataset();
        let view = JobView::from_indices(&ds, &[4, 1, 99]);
        assert_eq!(view.len(), 2);
        assert_eq!(view.years(), vec![5.0, 3.0]);
    }
}
