use std::sync::LazyLock;

use regex::Regex;

use super::classify::classify_title;
use super::model::{DerivedFields, ExperienceLevel, JobRecord, LocationType, SalaryRange};

// ---------------------------------------------------------------------------
// Bucket tables
// ---------------------------------------------------------------------------

// Buckets are right-closed: (lower, upper]. A boundary value belongs to the
// lower-named bucket. `None` as upper bound means unbounded.

const EXPERIENCE_BUCKETS: &[(i64, Option<i64>, ExperienceLevel)] = &[
    (-1, Some(2), ExperienceLevel::Entry),
    (2, Some(5), ExperienceLevel::Mid),
    (5, Some(10), ExperienceLevel::Senior),
    (10, None, ExperienceLevel::Expert),
];

const SALARY_BUCKETS: &[(f64, Option<f64>, SalaryRange)] = &[
    (0.0, Some(100_000.0), SalaryRange::Under100k),
    (100_000.0, Some(150_000.0), SalaryRange::From100kTo150k),
    (150_000.0, Some(200_000.0), SalaryRange::From150kTo200k),
    (200_000.0, Some(250_000.0), SalaryRange::From200kTo250k),
    (250_000.0, None, SalaryRange::Over250k),
];

static STATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r", ([A-Z]{2})").expect("state pattern is valid"));

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Compute every derived column for a record. Never fails.
pub fn derive_fields(record: &JobRecord) -> DerivedFields {
    let location = record.location.as_deref();
    DerivedFields {
        experience_level: bucket_experience(record.years_of_experience),
        salary_range: bucket_salary(record.salary),
        location_type: classify_location(location),
        state: extract_state(location),
        job_category: classify_title(record.job_title.as_deref()),
    }
}

/// Experience bucket, or `None` for negative years.
pub fn bucket_experience(years: i64) -> Option<ExperienceLevel> {
    EXPERIENCE_BUCKETS
        .iter()
        .find(|(lo, hi, _)| years > *lo && hi.map_or(true, |hi| years <= hi))
        .map(|(_, _, level)| *level)
}

/// Salary bucket, or `None` for zero, negative or non-finite amounts.
pub fn bucket_salary(amount: f64) -> Option<SalaryRange> {
    if !amount.is_finite() {
        return None;
    }
    SALARY_BUCKETS
        .iter()
        .find(|(lo, hi, _)| amount > *lo && hi.map_or(true, |hi| amount <= hi))
        .map(|(_, _, range)| *range)
}

/// Work arrangement by case-sensitive substring, Remote before Hybrid before On-site.
pub fn classify_location(text: Option<&str>) -> LocationType {
    match text {
        Some(t) if t.contains("Remote") => LocationType::Remote,
        Some(t) if t.contains("Hybrid") => LocationType::Hybrid,
        Some(t) if t.contains("On-site") => LocationType::OnSite,
        _ => LocationType::Unknown,
    }
}

/// Two-letter state code following the first `", "` in the location.
pub fn extract_state(text: Option<&str>) -> Option<String> {
    let caps = STATE_PATTERN.captures(text?)?;
    caps.get(1).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::JobCategory;

    #[test]
    fn experience_boundaries_are_right_closed() {
        assert_eq!(bucket_experience(0), Some(ExperienceLevel::Entry));
        assert_eq!(bucket_experience(2), Some(ExperienceLevel::Entry));
        assert_eq!(bucket_experience(3), Some(ExperienceLevel::Mid));
        assert_eq!(bucket_experience(5), Some(ExperienceLevel::Mid));
        assert_eq!(bucket_experience(6), Some(ExperienceLevel::Senior));
        assert_eq!(bucket_experience(10), Some(ExperienceLevel::Senior));
        assert_eq!(bucket_experience(11), Some(ExperienceLevel::Expert));
        assert_eq!(bucket_experience(60), Some(ExperienceLevel::Expert));
    }

    #[test]
    fn negative_experience_is_unbucketed() {
        assert_eq!(bucket_experience(-1), None);
    }

    #[test]
    fn salary_boundaries_belong_to_lower_bucket() {
        assert_eq!(bucket_salary(1.0), Some(SalaryRange::Under100k));
        assert_eq!(bucket_salary(100_000.0), Some(SalaryRange::Under100k));
        assert_eq!(bucket_salary(100_001.0), Some(SalaryRange::From100kTo150k));
        assert_eq!(bucket_salary(150_000.0), Some(SalaryRange::From100kTo150k));
        assert_eq!(bucket_salary(200_000.0), Some(SalaryRange::From150kTo200k));
        assert_eq!(bucket_salary(250_000.0), Some(SalaryRange::From200kTo250k));
        assert_eq!(bucket_salary(250_000.5), Some(SalaryRange::Over250k));
        assert_eq!(bucket_salary(5_000_000.0), Some(SalaryRange::Over250k));
    }

    #[test]
    fn out_of_domain_salary_is_unbucketed() {
        assert_eq!(bucket_salary(0.0), None);
        assert_eq!(bucket_salary(-10.0), None);
        assert_eq!(bucket_salary(f64::NAN), None);
    }

    #[test]
    fn location_priority_order() {
        assert_eq!(classify_location(Some("Remote")), LocationType::Remote);
        assert_eq!(
            classify_location(Some("Remote or Hybrid, Denver, CO")),
            LocationType::Remote
        );
        assert_eq!(
            classify_location(Some("Seattle, WA (Hybrid)")),
            LocationType::Hybrid
        );
        assert_eq!(
            classify_location(Some("Austin, TX (On-site)")),
            LocationType::OnSite
        );
        assert_eq!(classify_location(Some("remote")), LocationType::Unknown);
        assert_eq!(classify_location(None), LocationType::Unknown);
    }

    #[test]
    fn state_extraction() {
        assert_eq!(extract_state(Some("New York, NY")), Some("NY".to_string()));
        assert_eq!(
            extract_state(Some("San Francisco, CA, US (Hybrid)")),
            Some("CA".to_string())
        );
        assert_eq!(extract_state(Some("Remote")), None);
        assert_eq!(extract_state(Some("Austin,TX")), None);
        assert_eq!(extract_state(Some("Austin, tx")), None);
        assert_eq!(extract_state(None), None);
    }

    #[test]
    fn derivation_is_deterministic() {
        let rec = record(
            "Lead Data Scientist",
            "Acme",
            "Chicago, IL (Hybrid)",
            7,
            185_000.0,
        );
        let first = derive_fields(&rec);
        let second = derive_fields(&rec);
        assert_eq!(first, second);
        assert_eq!(first.experience_level, Some(ExperienceLevel::Senior));
        assert_eq!(first.salary_range, Some(SalaryRange::From150kTo200k));
        assert_eq!(first.location_type, LocationType::Hybrid);
        assert_eq!(first.state.as_deref(), Some("IL"));
        assert_eq!(first.job_category, JobCategory::DataScientist);
    }
}
