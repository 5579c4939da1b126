use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::stats::StatisticsRow;

const HEADERS: [&str; 4] = ["FACILITY CITY", "MEAN", "MEDIAN", "MODE"];
const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Inspection score tables (central panel)
// ---------------------------------------------------------------------------

/// Per-city statistics with the overall row in its own table below.
pub fn inspection_tables(ui: &mut Ui, grouped: &[StatisticsRow], overall: &StatisticsRow) {
    ui.heading("INSPECTION SCORE STATISTICS");
    ui.add_space(6.0);

    let list_height = (ui.available_height() - 4.0 * ROW_HEIGHT).max(ROW_HEIGHT);
    ui.push_id("city_table", |ui: &mut Ui| {
        stats_table(ui, grouped, list_height);
    });

    ui.add_space(30.0);
    ui.push_id("overall_table", |ui: &mut Ui| {
        stats_table(ui, std::slice::from_ref(overall), ROW_HEIGHT);
    });
}

fn stats_table(ui: &mut Ui, rows: &[StatisticsRow], max_height: f32) {
    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::exact(120.0), HEADERS.len())
        .max_scroll_height(max_height)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in rows {
                body.row(ROW_HEIGHT, |mut cells| {
                    cells.col(|ui| {
                        ui.label(row.label.as_str());
                    });
                    for value in [row.mean, row.median, row.mode] {
                        cells.col(|ui| {
                            ui.label(format_stat(value));
                        });
                    }
                });
            }
        });
}

fn format_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "—".to_string(), |v| v.to_string())
}
