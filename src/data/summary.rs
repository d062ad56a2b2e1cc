//! Per-section tables behind the dashboard charts.
//!
//! Each function takes a filtered [`JobView`] and returns plain data; the UI
//! only decides how to draw it. Sections that lack enough rows come back
//! empty or `None`.

use std::collections::HashMap;
use std::hash::Hash;

use crate::config::SummaryThresholds;

use super::filter::{FilterCriteria, JobView};
use super::model::{ExperienceLevel, JobCategory, JobEntry, LocationType, SalaryRange};
use super::stats::{self, BoxStats, Describe, HistogramBin, LinearTrend};

/// Percentiles listed next to the salary histogram.
pub const SALARY_PERCENTILES: [u8; 6] = [10, 25, 50, 75, 90, 95];

/// Jobs above this many years count as "experienced" for the salary jump.
const SALARY_JUMP_YEARS: i64 = 5;

// ---------------------------------------------------------------------------
// Shared shapes
// ---------------------------------------------------------------------------

/// Count and percentage of the view for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct Share<K> {
    pub key: K,
    pub count: usize,
    pub percent: f64,
}

/// Salary statistics for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSalary<K> {
    pub key: K,
    pub salary: Describe,
}

fn shares<K, I>(items: I, total: usize) -> Vec<Share<K>>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    stats::value_counts(items)
        .into_iter()
        .map(|(key, count)| Share {
            key,
            count,
            percent: if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            },
        })
        .collect()
}

/// Group values by key, keeping groups in first-appearance order.
fn group_values<'a, K, F, V>(view: &JobView<'a>, key: F, value: V) -> Vec<(K, Vec<f64>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&'a JobEntry) -> Option<K>,
    V: Fn(&'a JobEntry) -> f64,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<f64>)> = Vec::new();
    for entry in view.iter() {
        let Some(k) = key(entry) else { continue };
        match index.get(&k) {
            Some(&slot) => groups[slot].1.push(value(entry)),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![value(entry)]));
            }
        }
    }
    groups
}

fn salary(entry: &JobEntry) -> f64 {
    entry.record.salary
}

fn years(entry: &JobEntry) -> f64 {
    entry.record.years_of_experience as f64
}

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct KeyMetrics {
    pub total_jobs: usize,
    pub median_salary: Option<f64>,
    pub mean_salary: Option<f64>,
    pub mean_experience: Option<f64>,
    pub top_company: Option<String>,
}

pub fn key_metrics(view: &JobView<'_>) -> KeyMetrics {
    let salaries = view.salaries();
    KeyMetrics {
        total_jobs: view.len(),
        median_salary: stats::median(&salaries),
        mean_salary: stats::mean(&salaries),
        mean_experience: stats::mean(&view.years()),
        top_company: stats::top_n(view.iter().map(|e| e.record.company_name.as_str()), 1)
            .first()
            .map(|(name, _)| name.to_string()),
    }
}

// ---------------------------------------------------------------------------
// 1. Salary vs experience
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SalaryVsExperience {
    /// `[years, salary]` per job.
    pub points: Vec<[f64; 2]>,
    pub correlation: Option<f64>,
    pub trend: Option<LinearTrend>,
    /// Smallest and largest years in the view, for drawing the trend line.
    pub years_extent: Option<(f64, f64)>,
    /// Mean salary above five years minus mean salary at five or fewer.
    pub salary_jump: Option<f64>,
}

pub fn salary_vs_experience(view: &JobView<'_>) -> SalaryVsExperience {
    let xs = view.years();
    let ys = view.salaries();

    let years_extent = xs.iter().copied().fold(None, |acc, x| match acc {
        None => Some((x, x)),
        Some((lo, hi)) => Some((f64::min(lo, x), f64::max(hi, x))),
    });

    let (senior, junior): (Vec<&JobEntry>, Vec<&JobEntry>) = view
        .iter()
        .partition(|e| e.record.years_of_experience > SALARY_JUMP_YEARS);
    let senior_mean = stats::mean(&senior.iter().map(|e| salary(e)).collect::<Vec<_>>());
    let junior_mean = stats::mean(&junior.iter().map(|e| salary(e)).collect::<Vec<_>>());

    SalaryVsExperience {
        correlation: stats::correlation(&xs, &ys),
        trend: stats::linear_trend(&xs, &ys),
        points: xs.iter().zip(&ys).map(|(&x, &y)| [x, y]).collect(),
        years_extent,
        salary_jump: senior_mean.zip(junior_mean).map(|(s, j)| s - j),
    }
}

// ---------------------------------------------------------------------------
// 2. Career levels
// ---------------------------------------------------------------------------

/// Salary statistics per experience level, in level order.
///
/// Every level is listed; levels without jobs carry `None`.
pub fn career_level_salaries(view: &JobView<'_>) -> Vec<(ExperienceLevel, Option<Describe>)> {
    let groups = group_values(view, |e| e.derived.experience_level, salary);
    ExperienceLevel::ALL
        .iter()
        .map(|&level| {
            let described = groups
                .iter()
                .find(|(k, _)| *k == level)
                .and_then(|(_, v)| stats::describe(v));
            (level, described)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// 3. Companies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRow {
    pub company: String,
    pub job_count: usize,
    pub mean_salary: f64,
}

fn company_rows(view: &JobView<'_>) -> Vec<CompanyRow> {
    group_values(view, |e| Some(e.record.company_name.as_str()), salary)
        .into_iter()
        .filter_map(|(company, salaries)| {
            Some(CompanyRow {
                company: company.to_string(),
                job_count: salaries.len(),
                mean_salary: stats::mean(&salaries)?,
            })
        })
        .collect()
}

/// Companies with the most postings, with their mean salary.
pub fn top_companies_by_count(view: &JobView<'_>, limits: &SummaryThresholds) -> Vec<CompanyRow> {
    let mut rows = company_rows(view);
    rows.sort_by(|a, b| b.job_count.cmp(&a.job_count));
    rows.truncate(limits.top_companies);
    rows
}

/// Highest mean salary among companies with enough postings.
pub fn top_paying_companies(view: &JobView<'_>, limits: &SummaryThresholds) -> Vec<CompanyRow> {
    let mut rows: Vec<CompanyRow> = company_rows(view)
        .into_iter()
        .filter(|r| r.job_count >= limits.min_company_jobs)
        .collect();
    rows.sort_by(|a, b| b.mean_salary.total_cmp(&a.mean_salary));
    rows.truncate(limits.top_companies);
    rows
}

// ---------------------------------------------------------------------------
// 4. Salary distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SalaryDistribution {
    pub histogram: Vec<HistogramBin>,
    pub mean: f64,
    pub median: f64,
    pub percentiles: Vec<(u8, f64)>,
    /// Salary bands in ascending order; bands without jobs are omitted.
    pub ranges: Vec<Share<SalaryRange>>,
}

pub fn salary_distribution(view: &JobView<'_>, limits: &SummaryThresholds) -> Option<SalaryDistribution> {
    let salaries = view.salaries();
    let mean = stats::mean(&salaries)?;
    let median = stats::median(&salaries)?;

    let percentiles = SALARY_PERCENTILES
        .iter()
        .filter_map(|&p| Some((p, stats::quantile(&salaries, f64::from(p) / 100.0)?)))
        .collect();

    let mut ranges = shares(
        view.iter().filter_map(|e| e.derived.salary_range),
        view.len(),
    );
    ranges.sort_by_key(|s| s.key);

    Some(SalaryDistribution {
        histogram: stats::histogram(&salaries, limits.histogram_bins),
        mean,
        median,
        percentiles,
        ranges,
    })
}

// ---------------------------------------------------------------------------
// 5. Geography
// ---------------------------------------------------------------------------

/// States with enough postings, highest mean salary first.
pub fn state_salaries(view: &JobView<'_>, limits: &SummaryThresholds) -> Vec<GroupSalary<String>> {
    let mut rows: Vec<GroupSalary<String>> = group_values(view, |e| e.derived.state.clone(), salary)
        .into_iter()
        .filter(|(_, v)| v.len() >= limits.min_state_jobs)
        .filter_map(|(key, v)| Some(GroupSalary { key, salary: stats::describe(&v)? }))
        .collect();
    rows.sort_by(|a, b| b.salary.mean.total_cmp(&a.salary.mean));
    rows.truncate(limits.top_states);
    rows
}

// ---------------------------------------------------------------------------
// 6. Location type
// ---------------------------------------------------------------------------

/// Salary statistics per location type present in the view, sorted by label.
pub fn location_salaries(view: &JobView<'_>) -> Vec<GroupSalary<LocationType>> {
    let mut rows: Vec<GroupSalary<LocationType>> =
        group_values(view, |e| Some(e.derived.location_type), salary)
            .into_iter()
            .filter_map(|(key, v)| Some(GroupSalary { key, salary: stats::describe(&v)? }))
            .collect();
    rows.sort_by_key(|r| r.key.label());
    rows
}

pub fn location_shares(view: &JobView<'_>) -> Vec<Share<LocationType>> {
    shares(view.iter().map(|e| e.derived.location_type), view.len())
}

// ---------------------------------------------------------------------------
// 7-8. Experience levels and requirements
// ---------------------------------------------------------------------------

/// Box statistics of salary per experience level present in the view.
pub fn career_level_boxes(view: &JobView<'_>) -> Vec<(ExperienceLevel, BoxStats)> {
    let groups = group_values(view, |e| e.derived.experience_level, salary);
    ExperienceLevel::ALL
        .iter()
        .filter_map(|&level| {
            let (_, values) = groups.iter().find(|(k, _)| *k == level)?;
            Some((level, stats::box_stats(values)?))
        })
        .collect()
}

/// Job counts for the smallest distinct experience values, ascending.
pub fn experience_counts(view: &JobView<'_>, limits: &SummaryThresholds) -> Vec<(i64, usize)> {
    let mut counts = stats::value_counts(view.iter().map(|e| e.record.years_of_experience));
    counts.sort_by_key(|(years, _)| *years);
    counts.truncate(limits.experience_values);
    counts
}

pub fn level_shares(view: &JobView<'_>) -> Vec<Share<ExperienceLevel>> {
    shares(
        view.iter().filter_map(|e| e.derived.experience_level),
        view.len(),
    )
}

// ---------------------------------------------------------------------------
// 9. Salary trajectory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub years: i64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub mean: f64,
    pub count: usize,
}

/// Salary quartiles for each year from 0 up to the trajectory horizon,
/// skipping years with too few postings.
pub fn salary_trajectory(view: &JobView<'_>, limits: &SummaryThresholds) -> Vec<TrajectoryPoint> {
    let mut by_year: HashMap<i64, Vec<f64>> = HashMap::new();
    for entry in view.iter() {
        by_year
            .entry(entry.record.years_of_experience)
            .or_default()
            .push(salary(entry));
    }

    (0..=limits.trajectory_years)
        .filter_map(|year| {
            let values = by_year.get(&year)?;
            if values.len() < limits.min_trajectory_jobs {
                return None;
            }
            Some(TrajectoryPoint {
                years: year,
                q25: stats::quantile(values, 0.25)?,
                median: stats::median(values)?,
                q75: stats::quantile(values, 0.75)?,
                mean: stats::mean(values)?,
                count: values.len(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// 10-13. Job categories
// ---------------------------------------------------------------------------

pub fn category_shares(view: &JobView<'_>) -> Vec<Share<JobCategory>> {
    shares(view.iter().map(|e| e.derived.job_category), view.len())
}

/// Salary statistics for categories with enough postings, highest median first.
pub fn category_salaries(view: &JobView<'_>, limits: &SummaryThresholds) -> Vec<GroupSalary<JobCategory>> {
    let mut rows: Vec<GroupSalary<JobCategory>> =
        group_values(view, |e| Some(e.derived.job_category), salary)
            .into_iter()
            .filter(|(_, v)| v.len() >= limits.min_category_jobs)
            .filter_map(|(key, v)| Some(GroupSalary { key, salary: stats::describe(&v)? }))
            .collect();
    rows.sort_by(|a, b| b.salary.median.total_cmp(&a.salary.median));
    rows
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryExperience {
    pub category: JobCategory,
    pub mean_years: f64,
    pub median_years: f64,
    pub count: usize,
}

/// Experience requirements for categories with enough postings, highest median first.
pub fn category_experience(view: &JobView<'_>, limits: &SummaryThresholds) -> Vec<CategoryExperience> {
    let mut rows: Vec<CategoryExperience> =
        group_values(view, |e| Some(e.derived.job_category), years)
            .into_iter()
            .filter(|(_, v)| v.len() >= limits.min_category_jobs)
            .filter_map(|(category, v)| {
                Some(CategoryExperience {
                    category,
                    mean_years: stats::mean(&v)?,
                    median_years: stats::median(&v)?,
                    count: v.len(),
                })
            })
            .collect();
    rows.sort_by(|a, b| b.median_years.total_cmp(&a.median_years));
    rows
}

/// Mean salary per (category, experience level).
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryHeatmap {
    /// Row keys, sorted by label; categories with no salaries are dropped.
    pub categories: Vec<JobCategory>,
    /// Column keys, always every level in order.
    pub levels: Vec<ExperienceLevel>,
    /// `cells[row][col]`, `None` where the pair has no jobs.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl SalaryHeatmap {
    /// Smallest and largest populated cell, for colour scaling.
    pub fn value_extent(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }
}

pub fn salary_heatmap(view: &JobView<'_>) -> SalaryHeatmap {
    let groups = group_values(
        view,
        |e| Some((e.derived.job_category, e.derived.experience_level?)),
        salary,
    );
    let levels = ExperienceLevel::ALL.to_vec();

    let mut categories: Vec<JobCategory> = Vec::new();
    for ((category, _), _) in &groups {
        if !categories.contains(category) {
            categories.push(*category);
        }
    }
    categories.sort_by_key(|c| c.label());

    let cells = categories
        .iter()
        .map(|&category| {
            levels
                .iter()
                .map(|&level| {
                    groups
                        .iter()
                        .find(|(k, _)| *k == (category, level))
                        .and_then(|(_, v)| stats::mean(v))
                })
                .collect()
        })
        .collect();

    SalaryHeatmap {
        categories,
        levels,
        cells,
    }
}

// ---------------------------------------------------------------------------
// 14. Category drill-down
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDrilldown {
    pub category: JobCategory,
    pub total_jobs: usize,
    pub top_companies: Vec<(String, usize)>,
    pub salary_box: Option<BoxStats>,
    pub median_salary: Option<f64>,
    pub mean_salary: Option<f64>,
}

pub fn category_drilldown(
    view: &JobView<'_>,
    category: JobCategory,
    limits: &SummaryThresholds,
) -> CategoryDrilldown {
    let subset = view.refine(&FilterCriteria {
        category: Some(category),
        ..FilterCriteria::default()
    });
    let salaries = subset.salaries();

    CategoryDrilldown {
        category,
        total_jobs: subset.len(),
        top_companies: stats::top_n(
            subset.iter().map(|e| e.record.company_name.as_str()),
            limits.top_category_companies,
        )
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect(),
        salary_box: stats::box_stats(&salaries),
        median_salary: stats::median(&salaries),
        mean_salary: stats::mean(&salaries),
    }
}

// ---------------------------------------------------------------------------
// 15. Data explorer
// ---------------------------------------------------------------------------

/// Field plotted on the explorer's horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerX {
    Years,
    Salary,
    ExperienceLevel,
    LocationType,
    JobCategory,
    Company,
}

impl ExplorerX {
    pub const ALL: [ExplorerX; 6] = [
        ExplorerX::Years,
        ExplorerX::Salary,
        ExplorerX::ExperienceLevel,
        ExplorerX::LocationType,
        ExplorerX::JobCategory,
        ExplorerX::Company,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExplorerX::Years => "years_of_experience",
            ExplorerX::Salary => "salary",
            ExplorerX::ExperienceLevel => "experience_level",
            ExplorerX::LocationType => "location_type",
            ExplorerX::JobCategory => "job_category",
            ExplorerX::Company => "company_name",
        }
    }

    /// Categorical value for non-numeric axes.
    fn category_of(self, entry: &JobEntry) -> Option<String> {
        match self {
            ExplorerX::Years | ExplorerX::Salary => None,
            ExplorerX::ExperienceLevel => entry.derived.experience_level.map(|l| l.label().to_string()),
            ExplorerX::LocationType => Some(entry.derived.location_type.label().to_string()),
            ExplorerX::JobCategory => Some(entry.derived.job_category.label().to_string()),
            ExplorerX::Company => Some(entry.record.company_name.clone()),
        }
    }
}

/// Numeric field plotted on the explorer's vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerY {
    Salary,
    Years,
}

impl ExplorerY {
    pub const ALL: [ExplorerY; 2] = [ExplorerY::Salary, ExplorerY::Years];

    pub fn label(self) -> &'static str {
        match self {
            ExplorerY::Salary => "salary",
            ExplorerY::Years => "years_of_experience",
        }
    }

    fn value(self, entry: &JobEntry) -> f64 {
        match self {
            ExplorerY::Salary => salary(entry),
            ExplorerY::Years => years(entry),
        }
    }
}

/// Derived field used to colour explorer points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBy {
    ExperienceLevel,
    SalaryRange,
    LocationType,
    JobCategory,
    None,
}

impl ColorBy {
    pub const ALL: [ColorBy; 5] = [
        ColorBy::ExperienceLevel,
        ColorBy::SalaryRange,
        ColorBy::LocationType,
        ColorBy::JobCategory,
        ColorBy::None,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ColorBy::ExperienceLevel => "experience_level",
            ColorBy::SalaryRange => "salary_range",
            ColorBy::LocationType => "location_type",
            ColorBy::JobCategory => "job_category",
            ColorBy::None => "None",
        }
    }

    pub fn group_of(self, entry: &JobEntry) -> Option<&'static str> {
        match self {
            ColorBy::ExperienceLevel => entry.derived.experience_level.map(ExperienceLevel::label),
            ColorBy::SalaryRange => entry.derived.salary_range.map(SalaryRange::label),
            ColorBy::LocationType => Some(entry.derived.location_type.label()),
            ColorBy::JobCategory => Some(entry.derived.job_category.label()),
            ColorBy::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerPoint {
    pub x: f64,
    pub y: f64,
    pub group: Option<&'static str>,
    /// Hover text: title, company and location.
    pub hover: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExplorerPlot {
    pub points: Vec<ExplorerPoint>,
    /// Tick labels when the x axis is categorical; point x is the tick index.
    pub x_categories: Option<Vec<String>>,
}

impl ExplorerPlot {
    /// Points split into one series per colour group, sorted by label.
    /// Points without a group form a trailing `None` series so they stay
    /// visible.
    pub fn series(&self) -> Vec<(Option<&'static str>, Vec<[f64; 2]>)> {
        let mut series: Vec<(Option<&'static str>, Vec<[f64; 2]>)> = Vec::new();
        for p in &self.points {
            match series.iter_mut().find(|(g, _)| *g == p.group) {
                Some((_, pts)) => pts.push([p.x, p.y]),
                None => series.push((p.group, vec![[p.x, p.y]])),
            }
        }
        // `None` sorts first, so order by (is-ungrouped, label).
        series.sort_by_key(|(g, _)| (g.is_none(), *g));
        series
    }
}

/// Points for the data explorer, evenly subsampled down to the point cap.
pub fn explorer_plot(
    view: &JobView<'_>,
    x: ExplorerX,
    y: ExplorerY,
    color: ColorBy,
    limits: &SummaryThresholds,
) -> ExplorerPlot {
    let cap = limits.explorer_points.max(1);
    let stride = view.len().div_ceil(cap).max(1);

    let mut ticks: Vec<String> = Vec::new();
    let mut points = Vec::new();
    for entry in view.iter().step_by(stride) {
        let x_value = match x {
            ExplorerX::Years => years(entry),
            ExplorerX::Salary => salary(entry),
            _ => {
                let Some(cat) = x.category_of(entry) else { continue };
                match ticks.iter().position(|t| *t == cat) {
                    Some(i) => i as f64,
                    None => {
                        ticks.push(cat);
                        (ticks.len() - 1) as f64
                    }
                }
            }
        };
        let rec = &entry.record;
        points.push(ExplorerPoint {
            x: x_value,
            y: y.value(entry),
            group: color.group_of(entry),
            hover: format!(
                "{}\n{}\n{}",
                rec.job_title.as_deref().unwrap_or("(untitled)"),
                rec.company_name,
                rec.location.as_deref().unwrap_or(""),
            ),
        });
    }

    let x_categories = match x {
        ExplorerX::Years | ExplorerX::Salary => None,
        _ => Some(ticks),
    };

    ExplorerPlot {
        points,
        x_categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter;
    use crate::data::model::tests::record;
    use crate::data::model::JobDataset;

    fn limits() -> SummaryThresholds {
        SummaryThresholds {
            min_company_jobs: 2,
            min_state_jobs: 2,
            min_category_jobs: 2,
            min_trajectory_jobs: 2,
            ..SummaryThresholds::default()
        }
    }

    fn dataset() -> JobDataset {
        JobDataset::from_records(vec![
            record("Data Scientist", "Acme", "Austin, TX (Hybrid)", 1, 100_000.0),
            record("Data Scientist", "Acme", "Austin, TX (On-site)", 1, 120_000.0),
            record("Senior Data Scientist", "Acme", "Dallas, TX (Hybrid)", 8, 200_000.0),
            record("Data Analyst", "Globex", "Remote", 2, 80_000.0),
            record("Data Analyst", "Globex", "Boston, MA (Hybrid)", 3, 90_000.0),
            record("Director, Engineering", "Initech", "Boston, MA (On-site)", 12, 300_000.0),
        ])
    }

    #[test]
    fn metrics_on_empty_view_are_no_data() {
        let m = key_metrics(&JobView::default());
        assert_eq!(m.total_jobs, 0);
        assert_eq!(m.median_salary, None);
        assert_eq!(m.mean_salary, None);
        assert_eq!(m.mean_experience, None);
        assert_eq!(m.top_company, None);
        assert_eq!(salary_distribution(&JobView::default(), &limits()), None);
        assert!(salary_heatmap(&JobView::default()).categories.is_empty());
    }

    #[test]
    fn metrics_on_full_view() {
        let ds = dataset();
        let view = JobView::full(&ds);
        let m = key_metrics(&view);
        assert_eq!(m.total_jobs, 6);
        assert_eq!(m.median_salary, Some(110_000.0));
        assert_eq!(m.top_company.as_deref(), Some("Acme"));
    }

    #[test]
    fn salary_jump_needs_both_sides() {
        let ds = dataset();
        let view = JobView::full(&ds);
        let s = salary_vs_experience(&view);
        assert_eq!(s.points.len(), 6);
        assert_eq!(s.years_extent, Some((1.0, 12.0)));
        // (200k + 300k) / 2 - (100k + 120k + 80k + 90k) / 4
        assert_eq!(s.salary_jump, Some(250_000.0 - 97_500.0));
        assert!(s.trend.is_some_and(|t| t.slope > 0.0));

        let juniors = filter(
            &ds,
            &FilterCriteria {
                experience_max: Some(3),
                ..FilterCriteria::default()
            },
        );
        assert_eq!(salary_vs_experience(&juniors).salary_jump, None);
    }

    #[test]
    fn career_levels_list_every_level() {
        let ds = dataset();
        let rows = career_level_salaries(&JobView::full(&ds));
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].0, ExperienceLevel::Entry);
        assert_eq!(rows[0].1.map(|d| d.count), Some(3));
        assert_eq!(rows[1].1.map(|d| d.count), Some(1));
        assert_eq!(rows[2].1.map(|d| d.count), Some(1));
        assert_eq!(rows[3].1.map(|d| d.count), Some(1));

        let entry_only = filter(
            &ds,
            &FilterCriteria {
                experience_max: Some(2),
                ..FilterCriteria::default()
            },
        );
        let rows = career_level_salaries(&entry_only);
        assert!(rows[1].1.is_none());
        assert_eq!(career_level_boxes(&entry_only).len(), 1);
    }

    #[test]
    fn company_rankings_respect_minimum() {
        let ds = dataset();
        let view = JobView::full(&ds);
        let by_count = top_companies_by_count(&view, &limits());
        assert_eq!(by_count[0].company, "Acme");
        assert_eq!(by_count[0].job_count, 3);

        let paying = top_paying_companies(&view, &limits());
        assert_eq!(
            paying.iter().map(|r| r.company.as_str()).collect::<Vec<_>>(),
            vec!["Acme", "Globex"]
        );
    }

    #[test]
    fn salary_ranges_are_ordered_with_shares() {
        let ds = dataset();
        let dist = salary_distribution(&JobView::full(&ds), &limits()).unwrap();
        assert_eq!(dist.percentiles.len(), SALARY_PERCENTILES.len());
        assert_eq!(dist.ranges[0].key, SalaryRange::Under100k);
        // 100k sits on the boundary and belongs to <$100k.
        assert_eq!(dist.ranges[0].count, 3);
        assert_eq!(dist.ranges.iter().map(|s| s.count).sum::<usize>(), 6);
        assert!((dist.ranges[0].percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn states_need_minimum_jobs() {
        let ds = dataset();
        let rows = state_salaries(&JobView::full(&ds), &limits());
        assert_eq!(
            rows.iter().map(|r| r.key.as_str()).collect::<Vec<_>>(),
            vec!["MA", "TX"]
        );
        let strict = SummaryThresholds {
            min_state_jobs: 3,
            ..limits()
        };
        assert_eq!(state_salaries(&JobView::full(&ds), &strict).len(), 1);
    }

    #[test]
    fn location_rows_sorted_by_label() {
        let ds = dataset();
        let rows = location_salaries(&JobView::full(&ds));
        assert_eq!(
            rows.iter().map(|r| r.key).collect::<Vec<_>>(),
            vec![LocationType::Hybrid, LocationType::OnSite, LocationType::Remote]
        );
        let shares = location_shares(&JobView::full(&ds));
        assert_eq!(shares[0].key, LocationType::Hybrid);
        assert_eq!(shares[0].count, 3);
    }

    #[test]
    fn experience_counts_ascend() {
        let ds = dataset();
        let counts = experience_counts(&JobView::full(&ds), &limits());
        assert_eq!(counts, vec![(1, 2), (2, 1), (3, 1), (8, 1), (12, 1)]);
        let levels = level_shares(&JobView::full(&ds));
        assert_eq!(levels[0].key, ExperienceLevel::Entry);
    }

    #[test]
    fn trajectory_skips_sparse_years() {
        let ds = dataset();
        let points = salary_trajectory(&JobView::full(&ds), &limits());
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].years, 1);
        assert_eq!(points[0].median, 110_000.0);
        assert_eq!(points[0].count, 2);
    }

    #[test]
    fn category_tables() {
        let ds = dataset();
        let view = JobView::full(&ds);
        let salaries = category_salaries(&view, &limits());
        assert_eq!(
            salaries.iter().map(|r| r.key).collect::<Vec<_>>(),
            vec![JobCategory::DataScientist, JobCategory::DataAnalyst]
        );
        let exp = category_experience(&view, &limits());
        assert_eq!(exp[0].category, JobCategory::DataAnalyst);
        assert_eq!(exp[0].median_years, 2.5);
        assert_eq!(category_shares(&view)[0].key, JobCategory::DataScientist);
    }

    #[test]
    fn heatmap_cells_hold_means() {
        let ds = dataset();
        let map = salary_heatmap(&JobView::full(&ds));
        assert_eq!(
            map.categories,
            vec![
                JobCategory::DataAnalyst,
                JobCategory::DataScientist,
                JobCategory::ManagerLead,
            ]
        );
        let scientist = &map.cells[1];
        assert_eq!(scientist[0], Some(110_000.0));
        assert_eq!(scientist[1], None);
        assert_eq!(scientist[2], Some(200_000.0));
        assert_eq!(map.value_extent(), Some((80_000.0, 300_000.0)));
    }

    #[test]
    fn drilldown_limits_to_category() {
        let ds = dataset();
        let d = category_drilldown(&JobView::full(&ds), JobCategory::DataAnalyst, &limits());
        assert_eq!(d.total_jobs, 2);
        assert_eq!(d.top_companies, vec![("Globex".to_string(), 2)]);
        assert_eq!(d.median_salary, Some(85_000.0));

        let none = category_drilldown(&JobView::full(&ds), JobCategory::Statistician, &limits());
        assert_eq!(none.total_jobs, 0);
        assert_eq!(none.salary_box, None);
    }

    #[test]
    fn explorer_maps_categories_and_caps_points() {
        let ds = dataset();
        let view = JobView::full(&ds);

        let numeric = explorer_plot(&view, ExplorerX::Years, ExplorerY::Salary, ColorBy::None, &limits());
        assert_eq!(numeric.points.len(), 6);
        assert!(numeric.x_categories.is_none());
        assert_eq!(numeric.points[0].group, None);

        let by_company = explorer_plot(
            &view,
            ExplorerX::Company,
            ExplorerY::Years,
            ColorBy::JobCategory,
            &limits(),
        );
        assert_eq!(
            by_company.x_categories,
            Some(vec!["Acme".to_string(), "Globex".to_string(), "Initech".to_string()])
        );
        assert_eq!(by_company.points[3].x, 1.0);
        assert_eq!(by_company.points[3].group, Some("Data Analyst"));

        let capped = SummaryThresholds {
            explorer_points: 4,
            ..limits()
        };
        let sampled = explorer_plot(&view, ExplorerX::Salary, ExplorerY::Years, ColorBy::None, &capped);
        assert_eq!(sampled.points.len(), 3);
    }

    #[test]
    fn explorer_series_keep_ungrouped_points() {
        let ds = JobDataset::from_records(vec![
            record("Data Analyst", "Acme", "Remote", 1, 80_000.0),
            record("Data Analyst", "Acme", "Remote", -3, 85_000.0),
            record("Data Scientist", "Acme", "Remote", 7, 150_000.0),
        ]);
        let plot = explorer_plot(
            &JobView::full(&ds),
            ExplorerX::Years,
            ExplorerY::Salary,
            ColorBy::ExperienceLevel,
            &limits(),
        );
        let series = plot.series();
        let groups: Vec<Option<&str>> = series.iter().map(|(g, _)| *g).collect();
        assert_eq!(
            groups,
            vec![
                Some(ExperienceLevel::Entry.label()),
                Some(ExperienceLevel::Senior.label()),
                None
            ]
        );
        assert_eq!(series[2].1, vec![[-3.0, 85_000.0]]);
        let total: usize = series.iter().map(|(_, pts)| pts.len()).sum();
        assert_eq!(total, 3);

        let plain = explorer_plot(
            &JobView::full(&ds),
            ExplorerX::Years,
            ExplorerY::Salary,
            ColorBy::None,
            &limits(),
        );
        let series = plain.series();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].0, None);
        assert_eq!(series[0].1.len(), 3);
    }
}
