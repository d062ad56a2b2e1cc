use super::model::JobCategory;

// ---------------------------------------------------------------------------
// Title classifier
// ---------------------------------------------------------------------------

/// Ordered keyword rules. The first rule with a matching keyword wins, so a
/// "Data Science Manager" is a data scientist, not a manager.
const RULES: &[(JobCategory, &[&str])] = &[
    (JobCategory::DataScientist, &["data scientist", "data science"]),
    (
        JobCategory::MlAiEngineer,
        &[
            "machine learning",
            "ml engineer",
            "ai engineer",
            "ai architect",
            "ml scientist",
            "applied scientist",
        ],
    ),
    (
        JobCategory::DataEngineer,
        &["data engineer", "data infrastructure", "data platform"],
    ),
    (
        JobCategory::DataAnalyst,
        &["data analyst", "business analyst", "analytics"],
    ),
    (
        JobCategory::ResearchScientist,
        &["research scientist", "researcher"],
    ),
    (
        JobCategory::ProductDecisionScientist,
        &["product scientist", "decision scientist"],
    ),
    (
        JobCategory::Statistician,
        &["statistician", "biostatistician"],
    ),
    (
        JobCategory::ManagerLead,
        &["manager", "director", "head of", "vp", "chief"],
    ),
];

/// Map a free-text job title onto its canonical [`JobCategory`].
///
/// Matching is plain case-insensitive substring containment; absent or
/// unmatched titles fall back to [`JobCategory::Other`].
pub fn classify_title(title: Option<&str>) -> JobCategory {
    let Some(title) = title else {
        return JobCategory::Other;
    };
    let lower = title.to_lowercase();

    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map(|(category, _)| *category)
        .unwrap_or(JobCategory::Other)
}
