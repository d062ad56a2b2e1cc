mod app;
mod color;
mod state;
mod ui;

use std::process::ExitCode;

use anyhow::Context;
use app::JobsDashboardApp;
use clap::Parser;
use eframe::egui;
use jobs_dashboard::config::DashboardConfig;
use jobs_dashboard::DatasetStore;
use state::AppState;

fn main() -> ExitCode {
    env_logger::init();

    match run(DashboardConfig::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: DashboardConfig) -> anyhow::Result<()> {
    let store = DatasetStore::new(&config.data);
    let dataset = store
        .get()
        .with_context(|| format!("cannot start without job data from {}", config.data.display()))?;
    log::info!(
        "Loaded {} postings, {} categories, {} location types",
        dataset.len(),
        dataset.categories.len(),
        dataset.location_types.len()
    );

    let mut state = AppState::new(&config);
    state.set_store(store, dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Jobs Market Analytics Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(JobsDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
