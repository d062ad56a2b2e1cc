use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use super::derive::derive_fields;

// ---------------------------------------------------------------------------
// Derived categorical fields
// ---------------------------------------------------------------------------

/// Career level bucket derived from years of experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Expert,
}

impl ExperienceLevel {
    /// All levels in ascending order.
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Entry,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::Expert,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry (0-2)",
            ExperienceLevel::Mid => "Mid (3-5)",
            ExperienceLevel::Senior => "Senior (6-10)",
            ExperienceLevel::Expert => "Expert (10+)",
        }
    }
}

/// Salary band derived from the posted salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SalaryRange {
    Under100k,
    From100kTo150k,
    From150kTo200k,
    From200kTo250k,
    Over250k,
}

impl SalaryRange {
    /// All ranges in ascending order.
    pub const ALL: [SalaryRange; 5] = [
        SalaryRange::Under100k,
        SalaryRange::From100kTo150k,
        SalaryRange::From150kTo200k,
        SalaryRange::From200kTo250k,
        SalaryRange::Over250k,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SalaryRange::Under100k => "<$100k",
            SalaryRange::From100kTo150k => "$100k-$150k",
            SalaryRange::From150kTo200k => "$150k-$200k",
            SalaryRange::From200kTo250k => "$200k-$250k",
            SalaryRange::Over250k => ">$250k",
        }
    }
}

/// Work arrangement parsed from the location text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocationType {
    Remote,
    Hybrid,
    OnSite,
    Unknown,
}

impl LocationType {
    pub const ALL: [LocationType; 4] = [
        LocationType::Remote,
        LocationType::Hybrid,
        LocationType::OnSite,
        LocationType::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LocationType::Remote => "Remote",
            LocationType::Hybrid => "Hybrid",
            LocationType::OnSite => "On-site",
            LocationType::Unknown => "Unknown",
        }
    }
}

/// Canonical role family assigned by the title classifier.
///
/// Variant order is the classifier's rule order, with `Other` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobCategory {
    DataScientist,
    MlAiEngineer,
    DataEngineer,
    DataAnalyst,
    ResearchScientist,
    ProductDecisionScientist,
    Statistician,
    ManagerLead,
    Other,
}

impl JobCategory {
    pub const ALL: [JobCategory; 9] = [
        JobCategory::DataScientist,
        JobCategory::MlAiEngineer,
        JobCategory::DataEngineer,
        JobCategory::DataAnalyst,
        JobCategory::ResearchScientist,
        JobCategory::ProductDecisionScientist,
        JobCategory::Statistician,
        JobCategory::ManagerLead,
        JobCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            JobCategory::DataScientist => "Data Scientist",
            JobCategory::MlAiEngineer => "ML/AI Engineer",
            JobCategory::DataEngineer => "Data Engineer",
            JobCategory::DataAnalyst => "Data Analyst",
            JobCategory::ResearchScientist => "Research Scientist",
            JobCategory::ProductDecisionScientist => "Product/Decision Scientist",
            JobCategory::Statistician => "Statistician",
            JobCategory::ManagerLead => "Manager/Lead",
            JobCategory::Other => "Other",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

display_via_label!(ExperienceLevel, SalaryRange, LocationType, JobCategory);

// ---------------------------------------------------------------------------
// JobRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single job posting exactly as read from the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    /// `None` when the cell was empty.
    pub job_title: Option<String>,
    pub company_name: String,
    /// Free-form, e.g. `"Austin, TX (Hybrid)"` or `"Remote"`.
    pub location: Option<String>,
    pub years_of_experience: i64,
    /// USD per year.
    pub salary: f64,
    /// Every other column of the row, keyed by header.
    pub extra: BTreeMap<String, String>,
}

/// Categorical columns computed from a [`JobRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivedFields {
    /// `None` when the experience value falls outside every bucket.
    pub experience_level: Option<ExperienceLevel>,
    /// `None` when the salary falls outside every bucket.
    pub salary_range: Option<SalaryRange>,
    pub location_type: LocationType,
    pub state: Option<String>,
    pub job_category: JobCategory,
}

/// A record together with its derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct JobEntry {
    pub record: JobRecord,
    pub derived: DerivedFields,
}

impl JobEntry {
    pub fn new(record: JobRecord) -> Self {
        let derived = derive_fields(&record);
        JobEntry { record, derived }
    }
}

// ---------------------------------------------------------------------------
// JobDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter options.
#[derive(Debug, Clone)]
pub struct JobDataset {
    /// All postings in source order.
    pub entries: Vec<JobEntry>,
    /// Location types present in the data, in first-seen order.
    pub location_types: Vec<LocationType>,
    /// Companies ordered by descending posting count (ties by first appearance).
    pub companies_by_count: Vec<(String, usize)>,
    /// Categories present in the data, sorted by label.
    pub categories: Vec<JobCategory>,
    pub experience_extent: Option<(i64, i64)>,
    pub salary_extent: Option<(f64, f64)>,
}

impl JobDataset {
    /// Derive every record and build the filter option indices.
    pub fn from_records(records: Vec<JobRecord>) -> Self {
        let entries: Vec<JobEntry> = records.into_iter().map(JobEntry::new).collect();

        let mut location_types = Vec::new();
        let mut categories: BTreeSet<JobCategory> = BTreeSet::new();
        let mut company_counts: HashMap<&str, (usize, usize)> = HashMap::new();
        let mut experience_extent: Option<(i64, i64)> = None;
        let mut salary_extent: Option<(f64, f64)> = None;

        for (row, entry) in entries.iter().enumerate() {
            let loc = entry.derived.location_type;
            if !location_types.contains(&loc) {
                location_types.push(loc);
            }

            categories.insert(entry.derived.job_category);

            company_counts
                .entry(entry.record.company_name.as_str())
                .or_insert((0, row))
                .0 += 1;

            let years = entry.record.years_of_experience;
            experience_extent = Some(match experience_extent {
                Some((lo, hi)) => (lo.min(years), hi.max(years)),
                None => (years, years),
            });

            let salary = entry.record.salary;
            if salary.is_finite() {
                salary_extent = Some(match salary_extent {
                    Some((lo, hi)) => (lo.min(salary), hi.max(salary)),
                    None => (salary, salary),
                });
            }
        }

        let mut ranked: Vec<(&str, usize, usize)> = company_counts
            .into_iter()
            .map(|(name, (count, first))| (name, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        let companies_by_count = ranked
            .into_iter()
            .map(|(name, count, _)| (name.to_string(), count))
            .collect();

        let mut categories: Vec<JobCategory> = categories.into_iter().collect();
        categories.sort_by_key(|c| c.label());

        JobDataset {
            entries,
            location_types,
            companies_by_count,
            categories,
            experience_extent,
            salary_extent,
        }
    }

    /// Number of postings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` most frequent companies, for the company selector.
    pub fn top_companies(&self, n: usize) -> impl Iterator<Item = &str> {
        self.companies_by_count
            .iter()
            .take(n)
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(title: &str, company: &str, location: &str, years: i64, salary: f64) -> JobRecord {
        JobRecord {
            job_title: (!title.is_empty()).then(|| title.to_string()),
            company_name: company.to_string(),
            location: (!location.is_empty()).then(|| location.to_string()),
            years_of_experience: years,
            salary,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn dataset_indexes_filter_options() {
        let ds = JobDataset::from_records(vec![
            record("Data Analyst", "Acme", "Remote", 1, 80_000.0),
            record("Data Engineer", "Globex", "Austin, TX (Hybrid)", 4, 140_000.0),
            record("Chief Data Officer", "Globex", "Boston, MA (On-site)", 15, 300_000.0),
            record("Data Scientist", "Initech", "Remote", 3, 120_000.0),
        ]);

        assert_eq!(ds.len(), 4);
        assert_eq!(
            ds.location_types,
            vec![LocationType::Remote, LocationType::Hybrid, LocationType::OnSite]
        );
        assert_eq!(ds.companies_by_count[0], ("Globex".to_string(), 2));
        assert_eq!(ds.companies_by_count[1].0, "Acme");
        assert_eq!(
            ds.categories,
            vec![
                JobCategory::DataAnalyst,
                JobCategory::DataEngineer,
                JobCategory::DataScientist,
                JobCategory::ManagerLead,
            ]
        );
        assert_eq!(ds.experience_extent, Some((1, 15)));
        assert_eq!(ds.salary_extent, Some((80_000.0, 300_000.0)));
        assert_eq!(ds.top_companies(1).collect::<Vec<_>>(), vec!["Globex"]);
    }

    #[test]
    fn empty_dataset_has_no_extents() {
        let ds = JobDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.experience_extent, None);
        assert_eq!(ds.salary_extent, None);
    }

    #[test]
    fn labels_match_dashboard_text() {
        assert_eq!(ExperienceLevel::Expert.to_string(), "Expert (10+)");
        assert_eq!(SalaryRange::From100kTo150k.to_string(), "$100k-$150k");
        assert_eq!(LocationType::OnSite.to_string(), "On-site");
        assert_eq!(JobCategory::MlAiEngineer.to_string(), "ML/AI Engineer");
    }
}
