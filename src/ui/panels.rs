use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar – action buttons and status line
// ---------------------------------------------------------------------------

/// Render the toolbar and the status line beneath it.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Load CSV").clicked() {
            if let Some(path) = pick_file("csv") {
                state.load_csv(&path);
            }
        }
        if ui.button("Load JSON").clicked() {
            if let Some(path) = pick_file("json") {
                state.load_json(&path);
            }
        }
        if ui.button("Save As").clicked() {
            if let Some(path) = save_file() {
                state.save_as_json(&path);
            }
        }

        ui.add_space(20.0);
        if ui.button("Clean Data").clicked() {
            state.clean_data();
        }
        ui.add_space(20.0);

        if ui.button("Plot Violation Data").clicked() {
            state.show_violations();
        }
        if ui.button("Plot Inspection Data").clicked() {
            state.show_inspections();
        }

        ui.add_space(20.0);
        if ui.button("Quit").clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.label("STATUS:");
        let text = RichText::new(state.status_text());
        let text = if state.status_message.is_some() {
            text.color(Color32::LIGHT_RED)
        } else {
            text
        };
        ui.label(text);

        if let Some(source) = &state.session.source {
            ui.separator();
            ui.label(format!(
                "{} records from {}",
                state.session.dataset.len(),
                source.display()
            ));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn dialog() -> rfd::FileDialog {
    let dialog = rfd::FileDialog::new().set_title("Select file");
    match std::env::current_dir() {
        Ok(cwd) => dialog.set_directory(cwd),
        Err(_) => dialog,
    }
}

fn pick_file(ext: &str) -> Option<PathBuf> {
    dialog().add_filter(ext, &[ext]).pick_file()
}

fn save_file() -> Option<PathBuf> {
    dialog().add_filter("json", &["json"]).save_file()
}
