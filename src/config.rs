use std::path::PathBuf;

use clap::Parser;

/// Startup configuration, from command line flags or environment variables.
#[derive(Debug, Clone, Parser)]
#[command(name = "jobs-dashboard", version, about = "Job postings analytics dashboard")]
pub struct DashboardConfig {
    /// Job postings table (.csv, .json or .parquet).
    #[arg(long, env = "JOBS_DATA", default_value = "data/linkedin_jobs.csv")]
    pub data: PathBuf,

    /// Number of companies offered in the company filter.
    #[arg(long, env = "JOBS_COMPANY_CHOICES", default_value_t = 50)]
    pub company_choices: usize,

    /// Maximum number of points drawn by the data explorer.
    #[arg(long, env = "JOBS_EXPLORER_POINTS", default_value_t = 5000)]
    pub explorer_points: usize,

    /// Number of bins in the salary histogram.
    #[arg(long, env = "JOBS_HISTOGRAM_BINS", default_value_t = 50)]
    pub histogram_bins: usize,
}

impl DashboardConfig {
    pub fn thresholds(&self) -> SummaryThresholds {
        SummaryThresholds {
            explorer_points: self.explorer_points,
            histogram_bins: self.histogram_bins,
            ..SummaryThresholds::default()
        }
    }
}

/// Limits and minimum group sizes for the dashboard summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryThresholds {
    /// Companies listed in the job-count and salary rankings.
    pub top_companies: usize,
    /// Minimum postings before a company can appear in the salary ranking.
    pub min_company_jobs: usize,
    /// Minimum postings before a state is reported.
    pub min_state_jobs: usize,
    pub top_states: usize,
    /// Minimum postings before a category gets salary/experience rows.
    pub min_category_jobs: usize,
    /// Distinct experience values shown in the requirements chart.
    pub experience_values: usize,
    /// Last experience year plotted in the salary trajectory.
    pub trajectory_years: i64,
    /// Minimum postings for a trajectory year.
    pub min_trajectory_jobs: usize,
    /// Companies listed in the per-category drill-down.
    pub top_category_companies: usize,
    pub explorer_points: usize,
    pub histogram_bins: usize,
}

impl Default for SummaryThresholds {
    fn default() -> Self {
        Self {
            top_companies: 20,
            min_company_jobs: 5,
            min_state_jobs: 50,
            top_states: 20,
            min_category_jobs: 10,
            experience_values: 15,
            trajectory_years: 15,
            min_trajectory_jobs: 5,
            top_category_companies: 15,
            explorer_points: 5000,
            histogram_bins: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let cfg = DashboardConfig::try_parse_from(["jobs-dashboard"]).expect("parse");
        assert_eq!(cfg.company_choices, 50);
        assert_eq!(cfg.thresholds(), SummaryThresholds::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = DashboardConfig::try_parse_from([
            "jobs-dashboard",
            "--data",
            "other.parquet",
            "--explorer-points",
            "100",
        ])
        .expect("parse");
        assert_eq!(cfg.data, PathBuf::from("other.parquet"));
        assert_eq!(cfg.thresholds().explorer_points, 100);
        assert_eq!(cfg.thresholds().min_state_jobs, 50);
    }
}
