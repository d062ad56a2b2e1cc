use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::fmt_money;

const SALARY_STEP: f64 = 10_000.0;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };
    let company_choices = state.company_choices;
    let Some(controls) = state.controls.as_mut() else {
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Years of experience ----
            if let Some((lo, hi)) = dataset.experience_extent {
                ui.strong("Years of Experience");
                let (min, max) = &mut controls.experience;
                ui.horizontal(|ui: &mut Ui| {
                    ui.add(egui::DragValue::new(min).range(lo..=*max).prefix("from "));
                    ui.add(egui::DragValue::new(max).range(*min..=hi).prefix("to "));
                });
                ui.separator();
            }

            // ---- Salary ----
            if let Some((lo, hi)) = dataset.salary_extent {
                ui.strong("Salary Range (USD)");
                let (min, max) = &mut controls.salary;
                ui.add(
                    egui::Slider::new(min, lo..=hi)
                        .step_by(SALARY_STEP)
                        .custom_formatter(|v, _| fmt_money(v))
                        .text("min"),
                );
                ui.add(
                    egui::Slider::new(max, lo..=hi)
                        .step_by(SALARY_STEP)
                        .custom_formatter(|v, _| fmt_money(v))
                        .text("max"),
                );
                if *min > *max {
                    std::mem::swap(min, max);
                }
                ui.separator();
            }

            // ---- Location type ----
            ui.strong("Location Type");
            let current = controls
                .location_type
                .map_or("All", |l| l.label());
            egui::ComboBox::from_id_salt("location_type")
                .selected_text(current)
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut controls.location_type, None, "All");
                    for &loc in &dataset.location_types {
                        ui.selectable_value(&mut controls.location_type, Some(loc), loc.label());
                    }
                });

            // ---- Company ----
            ui.strong(format!("Company (Top {company_choices})"));
            let current = controls.company.clone().unwrap_or_else(|| "All".to_string());
            egui::ComboBox::from_id_salt("company")
                .selected_text(current)
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut controls.company, None, "All");
                    for name in dataset.top_companies(company_choices) {
                        ui.selectable_value(
                            &mut controls.company,
                            Some(name.to_string()),
                            name,
                        );
                    }
                });

            // ---- Job category ----
            ui.strong("Job Category");
            let current = controls.category.map_or("All", |c| c.label());
            egui::ComboBox::from_id_salt("job_category")
                .selected_text(current)
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut controls.category, None, "All");
                    for &cat in &dataset.categories {
                        ui.selectable_value(&mut controls.category, Some(cat), cat.label());
                    }
                });

            ui.separator();
        });

    if ui.button("Reset filters").clicked() {
        state.reset_filters();
    }

    // Recompute visible indices after any widget change.
    state.refilter();
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "Analyzing {} jobs from a dataset of {} total positions",
                state.visible_indices.len(),
                ds.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open job postings")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_file(&path);
    }
}
