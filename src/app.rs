use eframe::egui::{self, Ui};

use crate::config::AppConfig;
use crate::state::{AppState, View};
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DataAnalysisApp {
    pub state: AppState,
}

impl DataAnalysisApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DataAnalysisApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: buttons + status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: chart or tables ----
        egui::CentralPanel::default().show(ctx, |ui| match &self.state.view {
            View::Empty => {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Load a CSV or JSON file, then choose a plot");
                });
            }
            View::Violations { counts, colors } => plot::violation_chart(ui, counts, colors),
            View::Inspections { grouped, overall } => {
                tables::inspection_tables(ui, grouped, overall)
            }
        });
    }
}
