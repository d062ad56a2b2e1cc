use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, LineStyle, Plot,
    PlotPoint, PlotPoints, Points, VLine,
};

use jobs_dashboard::config::SummaryThresholds;
use jobs_dashboard::data::stats::BoxStats;
use jobs_dashboard::data::summary::{self, ColorBy, ExplorerX, ExplorerY, Share};
use jobs_dashboard::{ExperienceLevel, JobCategory, JobView, LocationType};

use crate::color::{diverging, normalize, ColorMap};
use crate::state::AppState;
use crate::ui::{fmt_money, fmt_opt_money};

const PLOT_HEIGHT: f32 = 320.0;
const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render every dashboard section for the current filtered view.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a job postings file to begin  (File → Open…)");
        });
        return;
    };
    let view = JobView::from_indices(&dataset, &state.visible_indices);
    let limits = state.thresholds.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Job Market Analytics Dashboard");
            key_metrics(ui, &view);
            ui.separator();

            if view.is_empty() {
                ui.add_space(24.0);
                ui.label(RichText::new("No jobs match the current filters.").italics());
                return;
            }

            section(ui, "1. Salary vs Experience Analysis", |ui| salary_vs_experience(ui, &view));
            section(ui, "2. Salary by Career Level", |ui| career_levels(ui, &view));
            section(ui, "3. Top Hiring Companies", |ui| companies(ui, &view, &limits));
            section(ui, "4. Salary Distribution Analysis", |ui| salary_distribution(ui, &view, &limits));
            section(ui, "5. Geographic Salary Analysis", |ui| geography(ui, &view, &limits));
            section(ui, "6. Work Location Type Analysis", |ui| location_types(ui, &view));
            section(ui, "7. Salary Distribution by Career Level", |ui| level_boxes(ui, &view));
            section(ui, "8. What Experience Do Jobs Require?", |ui| experience_requirements(ui, &view, &limits));
            section(ui, "9. Career Salary Growth Trajectory", |ui| trajectory(ui, &view, &limits));
            section(ui, "10. Job Category Distribution", |ui| category_distribution(ui, &view));
            section(ui, "11. Salary Analysis by Job Category", |ui| category_salaries(ui, &view, &limits));
            section(ui, "12. Experience Requirements by Job Category", |ui| category_experience(ui, &view, &limits));
            section(ui, "13. Salary Heatmap: Job Category vs Experience Level", |ui| heatmap(ui, &view));
            section(ui, "14. Top Hiring Companies by Job Category", |ui| {
                category_drilldown(ui, &view, &limits, &mut state.drilldown_category)
            });
            section(ui, "15. Interactive Data Explorer", |ui| {
                explorer(ui, &view, &limits, &mut state.explorer_x, &mut state.explorer_y, &mut state.color_by)
            });
        });
}

fn section(ui: &mut Ui, title: &str, body: impl FnOnce(&mut Ui)) {
    ui.add_space(12.0);
    ui.heading(title);
    ui.push_id(title, body);
    ui.separator();
}

fn neutral(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).italics().color(Color32::GRAY));
}

fn metric(ui: &mut Ui, name: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(name);
        ui.label(RichText::new(value).size(20.0).strong());
    });
}

fn key_metrics(ui: &mut Ui, view: &JobView<'_>) {
    let m = summary::key_metrics(view);
    ui.columns(5, |cols| {
        metric(&mut cols[0], "Total Jobs", m.total_jobs.to_string());
        metric(&mut cols[1], "Median Salary", fmt_opt_money(m.median_salary));
        metric(&mut cols[2], "Avg Salary", fmt_opt_money(m.mean_salary));
        metric(
            &mut cols[3],
            "Avg Experience",
            m.mean_experience
                .map_or("N/A".to_string(), |y| format!("{y:.1} yrs")),
        );
        metric(
            &mut cols[4],
            "Top Company",
            m.top_company.unwrap_or_else(|| "N/A".to_string()),
        );
    });
}

// ---------------------------------------------------------------------------
// Chart helpers
// ---------------------------------------------------------------------------

fn plot(id: &str) -> Plot<'static> {
    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false)
}

/// Axis formatter mapping integer ticks onto category labels.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

/// Horizontal bars of counts with their percentage, in place of a pie chart.
fn share_bars<K: Copy>(ui: &mut Ui, id: &str, rows: &[Share<K>], label: impl Fn(K) -> &'static str) {
    let colors = ColorMap::new(&rows.iter().map(|s| label(s.key)).collect::<Vec<_>>());
    let n = rows.len();
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Bar::new((n - 1 - i) as f64, s.count as f64)
                .name(format!("{} ({:.1}%)", label(s.key), s.percent))
                .fill(colors.color_for(Some(label(s.key))))
                .width(0.7)
        })
        .collect();
    let ticks = rows.iter().rev().map(|s| label(s.key).to_string()).collect();
    plot(id)
        .y_axis_formatter(category_axis(ticks))
        .x_axis_label("Number of Jobs")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

fn box_elem(position: f64, name: &str, b: &BoxStats, fill: Color32) -> BoxElem {
    BoxElem::new(
        position,
        BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
    )
    .name(name)
    .fill(fill.gamma_multiply(0.5))
    .box_width(0.6)
}

fn table<R>(
    ui: &mut Ui,
    id: &str,
    headers: &[&str],
    rows: &[R],
    cells: impl Fn(&R) -> Vec<String>,
) {
    ui.push_id(id, |ui: &mut Ui| {
        let mut builder = TableBuilder::new(ui).striped(true).vscroll(false);
        for _ in 1..headers.len() {
            builder = builder.column(Column::auto().at_least(80.0));
        }
        builder
            .column(Column::remainder())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for h in headers {
                    header.col(|ui| {
                        ui.strong(*h);
                    });
                }
            })
            .body(|mut body| {
                for r in rows {
                    body.row(ROW_HEIGHT, |mut row| {
                        for text in cells(r) {
                            row.col(|ui| {
                                ui.label(text);
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn salary_vs_experience(ui: &mut Ui, view: &JobView<'_>) {
    let s = summary::salary_vs_experience(view);
    ui.columns(2, |cols| {
        let extent = s.years_extent;
        plot("salary_vs_experience")
            .x_axis_label("Years of Experience")
            .y_axis_label("Salary (USD)")
            .show(&mut cols[0], |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from(s.points.clone()))
                        .name("Jobs")
                        .radius(2.0)
                        .color(Color32::from_rgb(68, 1, 84)),
                );
                if let (Some(trend), Some((lo, hi))) = (s.trend, extent) {
                    let line: PlotPoints = (0..=100)
                        .map(|i| {
                            let x = lo + (hi - lo) * f64::from(i) / 100.0;
                            [x, trend.at(x)]
                        })
                        .collect();
                    plot_ui.line(
                        Line::new(line)
                            .name("Trend Line")
                            .color(Color32::RED)
                            .style(LineStyle::dashed_loose())
                            .width(2.0),
                    );
                }
            });

        let ui = &mut cols[1];
        ui.strong("Insights");
        metric(
            ui,
            "Correlation",
            s.correlation.map_or("N/A".to_string(), |c| format!("{c:.3}")),
        );
        metric(ui, "Salary Jump (5+ yrs)", fmt_opt_money(s.salary_jump));
        ui.label(format!("{} data points analyzed", s.points.len()));
        match s.trend {
            Some(t) => ui.label(format!("Salary increases ~{} per year", fmt_money(t.slope))),
            None => ui.label("Not enough distinct experience values for a trend"),
        };
    });
}

fn career_levels(ui: &mut Ui, view: &JobView<'_>) {
    let rows = summary::career_level_salaries(view);
    let labels: Vec<String> = rows.iter().map(|(l, _)| l.label().to_string()).collect();
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, (level, d))| {
            let d = d.as_ref()?;
            Some(
                Bar::new(i as f64, d.mean)
                    .name(format!("{}: {} avg, {} jobs", level.label(), fmt_money(d.mean), d.count))
                    .width(0.6),
            )
        })
        .collect();

    ui.columns(2, |cols| {
        plot("career_level_salary")
            .x_axis_formatter(category_axis(labels.clone()))
            .y_axis_label("Average Salary (USD)")
            .show(&mut cols[0], |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Average Salary").color(Color32::LIGHT_BLUE));
            });

        let counts: PlotPoints = rows
            .iter()
            .enumerate()
            .map(|(i, (_, d))| [i as f64, d.map_or(0.0, |d| d.count as f64)])
            .collect();
        plot("career_level_count")
            .x_axis_formatter(category_axis(labels))
            .y_axis_label("Number of Jobs")
            .show(&mut cols[1], |plot_ui| {
                plot_ui.line(Line::new(counts).name("Job Count").color(Color32::RED).width(3.0));
            });
    });
}

fn company_bars(ui: &mut Ui, id: &str, rows: &[summary::CompanyRow], by_salary: bool) {
    let extent = rows.iter().fold(None, |acc: Option<(f64, f64)>, r| {
        let v = if by_salary { r.job_count as f64 } else { r.mean_salary };
        Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
    });
    let n = rows.len();
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let (value, shade) = if by_salary {
                (r.mean_salary, r.job_count as f64)
            } else {
                (r.job_count as f64, r.mean_salary)
            };
            Bar::new((n - 1 - i) as f64, value)
                .name(format!(
                    "{}: {} jobs, {} avg",
                    r.company,
                    r.job_count,
                    fmt_money(r.mean_salary)
                ))
                .fill(extent.map_or(Color32::LIGHT_BLUE, |e| diverging(normalize(shade, e))))
                .width(0.7)
        })
        .collect();
    let ticks = rows.iter().rev().map(|r| r.company.clone()).collect();
    plot(id)
        .height(PLOT_HEIGHT * 1.5)
        .y_axis_formatter(category_axis(ticks))
        .x_axis_label(if by_salary { "Avg Salary" } else { "Job Count" })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

fn companies(ui: &mut Ui, view: &JobView<'_>, limits: &SummaryThresholds) {
    let by_count = summary::top_companies_by_count(view, limits);
    let paying = summary::top_paying_companies(view, limits);
    ui.columns(2, |cols| {
        cols[0].strong(format!("Top {} Companies by Job Postings", limits.top_companies));
        company_bars(&mut cols[0], "companies_by_count", &by_count, false);

        cols[1].strong(format!(
            "Top {} Highest Paying Companies (min {} jobs)",
            limits.top_companies, limits.min_company_jobs
        ));
        if paying.is_empty() {
            neutral(&mut cols[1], "No company has enough postings.");
        } else {
            company_bars(&mut cols[1], "companies_by_salary", &paying, true);
        }
    });
}

fn salary_distribution(ui: &mut Ui, view: &JobView<'_>, limits: &SummaryThresholds) {
    let Some(dist) = summary::salary_distribution(view, limits) else {
        neutral(ui, "No salary data.");
        return;
    };
    ui.columns(2, |cols| {
        let bars: Vec<Bar> = dist
            .histogram
            .iter()
            .map(|b| {
                let width = (b.end - b.start).max(1.0);
                Bar::new(b.start + width / 2.0, b.count as f64)
                    .width(width)
                    .name(format!("{} – {}", fmt_money(b.start), fmt_money(b.end)))
            })
            .collect();
        plot("salary_histogram")
            .x_axis_label("Salary (USD)")
            .y_axis_label("Number of Jobs")
            .show(&mut cols[0], |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Salary Distribution").color(Color32::from_rgb(70, 130, 180)));
                plot_ui.vline(
                    VLine::new(dist.median)
                        .name(format!("Median: {}", fmt_money(dist.median)))
                        .color(Color32::RED)
                        .style(LineStyle::dashed_dense()),
                );
                plot_ui.vline(
                    VLine::new(dist.mean)
                        .name(format!("Mean: {}", fmt_money(dist.mean)))
                        .color(Color32::GREEN)
                        .style(LineStyle::dashed_dense()),
                );
            });

        let ui = &mut cols[1];
        ui.strong("Percentiles");
        table(ui, "percentiles", &["Percentile", "Salary"], &dist.percentiles, |(p, v)| {
            vec![format!("{p}th"), fmt_money(*v)]
        });
        ui.add_space(8.0);
        ui.strong("Salary Ranges");
        for share in &dist.ranges {
            ui.label(format!(
                "{}: {} jobs ({:.1}%)",
                share.key.label(),
                share.count,
                share.percent
            ));
        }
    });
}

fn geography(ui: &mut Ui, view: &JobView<'_>, limits: &SummaryThresholds) {
    let rows = summary::state_salaries(view, limits);
    if rows.is_empty() {
        neutral(
            ui,
            &format!("No state has at least {} jobs in this view.", limits.min_state_jobs),
        );
        return;
    }
    let extent = rows.iter().fold(None, |acc: Option<(f64, f64)>, r| {
        let c = r.salary.count as f64;
        Some(acc.map_or((c, c), |(lo, hi)| (lo.min(c), hi.max(c))))
    });
    ui.columns(2, |cols| {
        let bars: Vec<Bar> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                Bar::new(i as f64, r.salary.mean)
                    .name(format!(
                        "{}: {} avg, {} median, {} jobs",
                        r.key,
                        fmt_money(r.salary.mean),
                        fmt_money(r.salary.median),
                        r.salary.count
                    ))
                    .fill(extent.map_or(Color32::LIGHT_BLUE, |e| {
                        diverging(normalize(r.salary.count as f64, e))
                    }))
                    .width(0.7)
            })
            .collect();
        let ticks = rows.iter().map(|r| r.key.clone()).collect();
        plot("state_salary")
            .x_axis_formatter(category_axis(ticks))
            .y_axis_label("Average Salary (USD)")
            .show(&mut cols[0], |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars));
            });

        cols[1].strong("Top States Table");
        table(&mut cols[1], "states", &["State", "Avg Salary", "Jobs"], &rows, |r| {
            vec![r.key.clone(), fmt_money(r.salary.mean), r.salary.count.to_string()]
        });
    });
}

fn location_types(ui: &mut Ui, view: &JobView<'_>) {
    let rows = summary::location_salaries(view);
    let shares = summary::location_shares(view);
    ui.columns(2, |cols| {
        let mean_bars: Vec<Bar> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                Bar::new(i as f64 - 0.2, r.salary.mean)
                    .width(0.4)
                    .name(format!("{} average: {}", r.key.label(), fmt_money(r.salary.mean)))
            })
            .collect();
        let median_bars: Vec<Bar> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                Bar::new(i as f64 + 0.2, r.salary.median)
                    .width(0.4)
                    .name(format!("{} median: {}", r.key.label(), fmt_money(r.salary.median)))
            })
            .collect();
        let ticks = rows.iter().map(|r| r.key.label().to_string()).collect();
        plot("location_salary")
            .x_axis_formatter(category_axis(ticks))
            .y_axis_label("Salary (USD)")
            .show(&mut cols[0], |plot_ui| {
                plot_ui.bar_chart(BarChart::new(mean_bars).name("Average Salary").color(Color32::LIGHT_BLUE));
                plot_ui.bar_chart(BarChart::new(median_bars).name("Median Salary").color(Color32::from_rgb(255, 165, 0)));
            });

        cols[1].strong("Distribution of Jobs by Location Type");
        share_bars(&mut cols[1], "location_shares", &shares, LocationType::label);
    });
}

fn level_boxes(ui: &mut Ui, view: &JobView<'_>) {
    let boxes = summary::career_level_boxes(view);
    let colors = ColorMap::new(&ExperienceLevel::ALL.map(ExperienceLevel::label));
    let labels: Vec<String> = ExperienceLevel::ALL.iter().map(|l| l.label().to_string()).collect();
    plot("level_boxes")
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("Salary (USD)")
        .show(ui, |plot_ui| {
            for (level, b) in &boxes {
                let Some(pos) = ExperienceLevel::ALL.iter().position(|l| l == level) else {
                    continue;
                };
                let color = colors.color_for(Some(level.label()));
                plot_ui.box_plot(
                    BoxPlot::new(vec![box_elem(pos as f64, level.label(), b, color)])
                        .name(level.label())
                        .color(color),
                );
                if !b.outliers.is_empty() {
                    let pts: PlotPoints = b.outliers.iter().map(|&v| [pos as f64, v]).collect();
                    plot_ui.points(Points::new(pts).color(color).radius(1.5));
                }
            }
        });
    ui.label("Boxes span the 25th to 75th percentile; the line is the median; dots are outliers.");
}

fn experience_requirements(ui: &mut Ui, view: &JobView<'_>, limits: &SummaryThresholds) {
    let counts = summary::experience_counts(view, limits);
    let levels = summary::level_shares(view);
    ui.columns(2, |cols| {
        let bars: Vec<Bar> = counts
            .iter()
            .map(|&(years, n)| {
                Bar::new(years as f64, n as f64)
                    .name(format!("{years} years: {n} jobs"))
                    .width(0.8)
            })
            .collect();
        plot("experience_counts")
            .x_axis_label("Years of Experience")
            .y_axis_label("Number of Jobs")
            .show(&mut cols[0], |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(Color32::from_rgb(0, 128, 128)));
            });

        cols[1].strong("Jobs by Career Level");
        share_bars(&mut cols[1], "level_shares", &levels, ExperienceLevel::label);
    });
}

fn trajectory(ui: &mut Ui, view: &JobView<'_>, limits: &SummaryThresholds) {
    let points = summary::salary_trajectory(view, limits);
    if points.is_empty() {
        neutral(ui, "Not enough data to generate salary trajectory for filtered dataset");
        return;
    }
    let series = |f: fn(&summary::TrajectoryPoint) -> f64| {
        points
            .iter()
            .map(|p| [p.years as f64, f(p)])
            .collect::<PlotPoints>()
    };
    plot("trajectory")
        .x_axis_label("Years of Experience")
        .y_axis_label("Salary (USD)")
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(series(|p| p.q75)).name("75th Percentile").color(Color32::LIGHT_BLUE).width(2.0));
            plot_ui.line(Line::new(series(|p| p.median)).name("Median (50th)").color(Color32::BLUE).width(3.0));
            plot_ui.line(Line::new(series(|p| p.q25)).name("25th Percentile").color(Color32::LIGHT_BLUE).width(2.0));
            plot_ui.line(
                Line::new(series(|p| p.mean))
                    .name("Average")
                    .color(Color32::RED)
                    .style(LineStyle::dashed_loose())
                    .width(2.0),
            );
        });
    ui.label(format!(
        "Years with at least {} postings between 0 and {} years.",
        limits.min_trajectory_jobs, limits.trajectory_years
    ));
}

fn category_distribution(ui: &mut Ui, view: &JobView<'_>) {
    let shares = summary::category_shares(view);
    share_bars(ui, "category_shares", &shares, JobCategory::label);
}

fn category_salaries(ui: &mut Ui, view: &JobView<'_>, limits: &SummaryThresholds) {
    let rows = summary::category_salaries(view, limits);
    if rows.is_empty() {
        neutral(
            ui,
            &format!("No category has at least {} jobs.", limits.min_category_jobs),
        );
        return;
    }
    ui.columns(2, |cols| {
        let n = rows.len();
        let position = |i: usize| (n - 1 - i) as f64;
        let medians: Vec<Bar> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                Bar::new(position(i) + 0.2, r.salary.median)
                    .width(0.4)
                    .name(format!("{} median: {}", r.key.label(), fmt_money(r.salary.median)))
            })
            .collect();
        let means: Vec<Bar> = rows
            .iter()
            .enumerate()
            .map(|(i, r)| {
                Bar::new(position(i) - 0.2, r.salary.mean)
                    .width(0.4)
                    .name(format!("{} average: {}", r.key.label(), fmt_money(r.salary.mean)))
            })
            .collect();
        let ticks = rows.iter().rev().map(|r| r.key.label().to_string()).collect();
        plot("category_salary")
            .y_axis_formatter(category_axis(ticks))
            .x_axis_label("Salary (USD)")
            .show(&mut cols[0], |plot_ui| {
                plot_ui.bar_chart(BarChart::new(medians).horizontal().name("Median Salary").color(Color32::LIGHT_BLUE));
                plot_ui.bar_chart(BarChart::new(means).horizontal().name("Average Salary").color(Color32::from_rgb(255, 165, 0)));
            });

        cols[1].strong("Salary Statistics");
        table(
            &mut cols[1],
            "category_salary_table",
            &["Category", "Median", "Average", "Jobs"],
            &rows,
            |r| {
                vec![
                    r.key.label().to_string(),
                    fmt_money(r.salary.median),
                    fmt_money(r.salary.mean),
                    r.salary.count.to_string(),
                ]
            },
        );
    });
}

fn category_experience(ui: &mut Ui, view: &JobView<'_>, limits: &SummaryThresholds) {
    let rows = summary::category_experience(view, limits);
    if rows.is_empty() {
        neutral(
            ui,
            &format!("No category has at least {} jobs.", limits.min_category_jobs),
        );
        return;
    }
    let colors = ColorMap::new(&rows.iter().map(|r| r.category.label()).collect::<Vec<_>>());
    let max_count = rows.iter().map(|r| r.count).max().unwrap_or(1).max(1) as f32;
    let max_years = rows
        .iter()
        .map(|r| r.mean_years.max(r.median_years))
        .fold(0.0, f64::max);

    plot("category_experience")
        .x_axis_label("Median Years Required")
        .y_axis_label("Average Years Required")
        .data_aspect(1.0)
        .show(ui, |plot_ui| {
            for r in &rows {
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[r.median_years, r.mean_years]]))
                        .name(format!("{} ({} jobs)", r.category.label(), r.count))
                        .color(colors.color_for(Some(r.category.label())))
                        .radius(4.0 + 16.0 * r.count as f32 / max_count),
                );
            }
            plot_ui.line(
                Line::new(PlotPoints::from(vec![[0.0, 0.0], [max_years, max_years]]))
                    .name("Equal Line")
                    .color(Color32::RED)
                    .style(LineStyle::dashed_loose()),
            );
        });
    ui.label(
        "Points above the diagonal are categories whose average experience exceeds the median.",
    );
}

fn heatmap(ui: &mut Ui, view: &JobView<'_>) {
    let map = summary::salary_heatmap(view);
    let Some(extent) = map.value_extent() else {
        neutral(ui, "No salary data to map.");
        return;
    };
    egui::Grid::new("salary_heatmap")
        .striped(false)
        .spacing([4.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for level in &map.levels {
                ui.strong(level.label());
            }
            ui.end_row();

            for (category, row) in map.categories.iter().zip(&map.cells) {
                ui.strong(category.label());
                for cell in row {
                    match cell {
                        Some(v) => {
                            ui.label(
                                RichText::new(format!("  {}  ", fmt_money(*v)))
                                    .color(Color32::BLACK)
                                    .background_color(diverging(normalize(*v, extent))),
                            );
                        }
                        None => {
                            ui.label("  –  ");
                        }
                    }
                }
                ui.end_row();
            }
        });
}

fn category_drilldown(
    ui: &mut Ui,
    view: &JobView<'_>,
    limits: &SummaryThresholds,
    selected: &mut Option<JobCategory>,
) {
    let present: Vec<JobCategory> = {
        let mut cats: Vec<JobCategory> = summary::category_shares(view).into_iter().map(|s| s.key).collect();
        cats.sort_by_key(|c| c.label());
        cats
    };
    if !selected.is_some_and(|c| present.contains(&c)) {
        *selected = present.first().copied();
    }
    let Some(category) = *selected else {
        neutral(ui, "No categories in this view.");
        return;
    };

    egui::ComboBox::from_label("Select a job category to see top hiring companies")
        .selected_text(category.label())
        .show_ui(ui, |ui: &mut Ui| {
            for &cat in &present {
                ui.selectable_value(selected, Some(cat), cat.label());
            }
        });

    let d = summary::category_drilldown(view, category, limits);
    ui.columns(2, |cols| {
        cols[0].strong(format!("Top {} Companies Hiring {}", limits.top_category_companies, category.label()));
        let n = d.top_companies.len();
        let bars: Vec<Bar> = d
            .top_companies
            .iter()
            .enumerate()
            .map(|(i, (name, count))| {
                Bar::new((n - 1 - i) as f64, *count as f64)
                    .name(format!("{name}: {count}"))
                    .width(0.7)
            })
            .collect();
        let ticks = d.top_companies.iter().rev().map(|(name, _)| name.clone()).collect();
        plot("drilldown_companies")
            .y_axis_formatter(category_axis(ticks))
            .x_axis_label("Job Count")
            .show(&mut cols[0], |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal().color(Color32::from_rgb(70, 130, 180)));
            });

        let ui = &mut cols[1];
        ui.strong(format!("{} Salary Distribution", category.label()));
        if let Some(b) = &d.salary_box {
            plot("drilldown_box")
                .height(PLOT_HEIGHT * 0.7)
                .y_axis_label("Salary (USD)")
                .show(ui, |plot_ui| {
                    plot_ui.box_plot(BoxPlot::new(vec![box_elem(0.0, category.label(), b, Color32::LIGHT_BLUE)]));
                });
            if let Some(sd) = b.std_dev {
                ui.label(format!("Mean {} ± {} (1 sd)", fmt_money(b.mean), fmt_money(sd)));
            }
        }
        metric(ui, "Median Salary", fmt_opt_money(d.median_salary));
        metric(ui, "Average Salary", fmt_opt_money(d.mean_salary));
        metric(ui, "Total Jobs", d.total_jobs.to_string());
    });
}

fn explorer(
    ui: &mut Ui,
    view: &JobView<'_>,
    limits: &SummaryThresholds,
    x: &mut ExplorerX,
    y: &mut ExplorerY,
    color: &mut ColorBy,
) {
    ui.horizontal(|ui: &mut Ui| {
        egui::ComboBox::from_label("X-axis")
            .selected_text(x.label())
            .show_ui(ui, |ui: &mut Ui| {
                for option in ExplorerX::ALL {
                    ui.selectable_value(x, option, option.label());
                }
            });
        egui::ComboBox::from_label("Y-axis")
            .selected_text(y.label())
            .show_ui(ui, |ui: &mut Ui| {
                for option in ExplorerY::ALL {
                    ui.selectable_value(y, option, option.label());
                }
            });
        egui::ComboBox::from_label("Color by")
            .selected_text(color.label())
            .show_ui(ui, |ui: &mut Ui| {
                for option in ColorBy::ALL {
                    ui.selectable_value(color, option, option.label());
                }
            });
    });

    let data = summary::explorer_plot(view, *x, *y, *color, limits);
    if view.len() > limits.explorer_points {
        ui.label(format!(
            "Showing {} of {} jobs (evenly sampled).",
            data.points.len(),
            view.len()
        ));
    }

    let series = data.series();
    let groups: Vec<&'static str> = series.iter().filter_map(|(g, _)| *g).collect();
    let colors = ColorMap::new(&groups);

    let hover_points = data.points.clone();
    let mut chart = plot("explorer")
        .height(PLOT_HEIGHT * 1.4)
        .x_axis_label(x.label())
        .y_axis_label(y.label())
        .label_formatter(move |_name: &str, at: &PlotPoint| nearest_hover(&hover_points, at));
    if let Some(ticks) = data.x_categories.clone() {
        chart = chart.x_axis_formatter(category_axis(ticks));
    }
    let title = match color {
        ColorBy::None => format!("{} vs {}", y.label(), x.label()),
        _ => format!("{} vs {} (colored by {})", y.label(), x.label(), color.label()),
    };
    ui.label(title);
    let ungrouped_name = if groups.is_empty() { "Jobs" } else { "No group" };
    chart.show(ui, |plot_ui| {
        for (group, pts) in series {
            let color = if group.is_none() && !groups.is_empty() {
                Color32::GRAY
            } else {
                colors.color_for(group)
            };
            plot_ui.points(
                Points::new(PlotPoints::from(pts))
                    .radius(2.0)
                    .name(group.unwrap_or(ungrouped_name))
                    .color(color),
            );
        }
    });
}

/// Hover text of the explorer point closest to the cursor, with both axes
/// scaled to the data extent.
fn nearest_hover(points: &[summary::ExplorerPoint], at: &PlotPoint) -> String {
    let span = |f: fn(&summary::ExplorerPoint) -> f64| {
        let (lo, hi) = points
            .iter()
            .map(f)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        (hi - lo).max(f64::EPSILON)
    };
    let (sx, sy) = (span(|p| p.x), span(|p| p.y));
    let distance = |p: &summary::ExplorerPoint| ((p.x - at.x) / sx).powi(2) + ((p.y - at.y) / sy).powi(2);
    points
        .iter()
        .min_by(|a, b| distance(a).total_cmp(&distance(b)))
        .map(|p| p.hover.clone())
        .unwrap_or_default()
}
