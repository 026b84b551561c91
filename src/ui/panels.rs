use std::path::Path;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use serde::Serialize;

use crate::data::aggregate::TotalsSummary;
use crate::data::loader;
use crate::export;
use crate::state::AppState;
use crate::ui::charts;

/// Sentinel entry meaning "no filter" for the team/city/venue selectors.
const ALL_LABEL: &str = "All";

// ---------------------------------------------------------------------------
// Left side panel – filter selectors
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone the option lists so we can mutate state inside the combos.
    let seasons = dataset.seasons.clone();
    let teams = dataset.teams.clone();
    let cities = dataset.cities.clone();
    let venues = dataset.venues.clone();

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Season (required, no "All" entry) ----
            ui.strong("Season");
            let current = state.selection.season.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("season")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for season in &seasons {
                        if ui.selectable_label(current == *season, season).clicked()
                            && current != *season
                        {
                            state.selection.season = Some(season.clone());
                            changed = true;
                        }
                    }
                });
            ui.separator();

            changed |= optional_combo(ui, "team", "Team", &teams, &mut state.selection.team);
            ui.separator();
            changed |= optional_combo(ui, "city", "City", &cities, &mut state.selection.city);
            ui.separator();
            changed |= optional_combo(ui, "venue", "Venue", &venues, &mut state.selection.venue);
        });

    // Selecting a filter triggers a full recompute.
    if changed {
        state.recompute();
    }
}

/// Single-select combo with an [`ALL_LABEL`] (no filter) entry.
/// Returns true when the selection changed.
fn optional_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    options: &[String],
    current: &mut Option<String>,
) -> bool {
    let mut changed = false;

    ui.strong(label);
    let shown = current.clone().unwrap_or_else(|| ALL_LABEL.to_string());
    egui::ComboBox::from_id_salt(id.to_string())
        .selected_text(&shown)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), ALL_LABEL).clicked() && current.is_some() {
                *current = None;
                changed = true;
            }
            for option in options {
                let selected = current.as_deref() == Some(option.as_str());
                if ui.selectable_label(selected, option).clicked() && !selected {
                    *current = Some(option.clone());
                    changed = true;
                }
            }
        });

    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open match table…").clicked() {
                open_matches_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open delivery table…").clicked() {
                open_deliveries_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} matches, {} deliveries loaded — {} matches in view",
                ds.match_count(),
                ds.delivery_count(),
                state.match_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central dashboard
// ---------------------------------------------------------------------------

/// Render the metrics and charts for the current selection.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data folder with matches.csv and deliveries.csv  (File → Open…)");
        });
        return;
    }

    if let Some(warning) = &state.warning {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(RichText::new(warning).color(Color32::from_rgb(222, 165, 0)));
        });
        return;
    }

    // Clone so the download buttons can mutate state below.
    let Some(insights) = state.insights.clone() else {
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Match Summary");
            metrics_row(ui, &insights.totals);
            ui.separator();

            ui.heading("Visual Insights");
            ui.columns(2, |cols: &mut [Ui]| {
                {
                    let ui = &mut cols[0];
                    ui.strong("Top 10 Batsmen");
                    charts::batsmen_chart(ui, &insights.top_batsmen);
                    if !insights.top_batsmen.is_empty() {
                        download_button(ui, state, &insights.top_batsmen, "top_batsmen.csv");
                    }
                }
                {
                    let ui = &mut cols[1];
                    ui.strong("Top 10 Bowlers");
                    charts::bowlers_chart(ui, &insights.top_bowlers);
                    if !insights.top_bowlers.is_empty() {
                        download_button(ui, state, &insights.top_bowlers, "top_bowlers.csv");
                    }
                }
            });
            ui.separator();

            ui.heading("Run Rate Progression");
            charts::run_rate_chart(ui, &insights.run_rate);
            if !insights.run_rate.is_empty() {
                download_button(ui, state, &insights.run_rate, "run_rate.csv");
            }
        });
}

/// Three headline metrics, side by side.
fn metrics_row(ui: &mut Ui, totals: &TotalsSummary) {
    ui.columns(3, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Total Matches", totals.total_matches.to_string());
        metric(&mut cols[1], "Total Runs", totals.total_runs.to_string());
        metric(&mut cols[2], "Total Wickets", totals.total_wickets.to_string());
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).heading().strong());
    });
}

fn download_button<T: Serialize>(ui: &mut Ui, state: &mut AppState, rows: &[T], file_name: &str) {
    if ui.button(format!("⬇ Download {file_name}")).clicked() {
        match export::save_table_dialog(rows, file_name) {
            Ok(Some(path)) => {
                log::info!("Exported {} rows to {}", rows.len(), path.display());
                state.status_message = Some(format!("Saved {}", path.display()));
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("CSV export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn open_matches_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open match table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_matches(&path) {
            Ok(rows) => {
                log::info!("Loaded {} matches from {}", rows.len(), path.display());
                state.set_matches(rows);
            }
            Err(e) => {
                log::error!("Failed to load match table: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn open_deliveries_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open delivery table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_deliveries(&path) {
            Ok(rows) => {
                log::info!("Loaded {} deliveries from {}", rows.len(), path.display());
                state.set_deliveries(rows);
            }
            Err(e) => {
                log::error!("Failed to load delivery table: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn open_folder_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Open data folder")
        .pick_folder();

    if let Some(dir) = dir {
        load_dir_into(state, &dir);
    }
}

/// Load both tables from a directory into the state, reporting failures
/// through the status line.
pub fn load_dir_into(state: &mut AppState, dir: &Path) {
    match loader::load_dir(dir) {
        Ok(dataset) => {
            log::info!(
                "Loaded {} matches and {} deliveries from {}",
                dataset.match_count(),
                dataset.delivery_count(),
                dir.display()
            );
            state.set_dataset(dataset);
        }
        Err(e) => {
            log::error!("Failed to load data folder: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
