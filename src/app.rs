use eframe::egui;

use crate::data::loader;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct WicketLensApp {
    pub state: AppState,
}

impl Default for WicketLensApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl WicketLensApp {
    /// Start up, loading `matches.csv` / `deliveries.csv` from the working
    /// directory when both are present.  The tables are read once and shared
    /// by every recomputation afterwards.
    pub fn startup() -> Self {
        let mut state = AppState::default();
        match loader::try_load_default() {
            Ok(Some(dataset)) => {
                log::info!(
                    "Loaded {} matches and {} deliveries from the working directory",
                    dataset.match_count(),
                    dataset.delivery_count()
                );
                state.set_dataset(dataset);
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("Failed to load default tables: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
        Self { state }
    }
}

impl eframe::App for WicketLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::dashboard(ui, &mut self.state);
        });
    }
}
