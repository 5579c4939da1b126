use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::ColorMap;
use crate::data::stats::FrequencyTable;

// ---------------------------------------------------------------------------
// Violation bar chart (central panel)
// ---------------------------------------------------------------------------

/// One bar per violation code, x positions `0..n` labelled with the code.
pub fn violation_chart(ui: &mut Ui, counts: &FrequencyTable, colors: &ColorMap) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("Number of establishments that have committed each type of violation");
    });

    let labels: Vec<String> = counts.iter().map(|(v, _)| v.to_string()).collect();

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (code, n))| {
            Bar::new(i as f64, *n as f64)
                .name(code.to_string())
                .fill(colors.color_for(code))
                .width(0.8)
        })
        .collect();

    let chart = BarChart::new(bars).name("Violation Count");

    Plot::new("violation_plot")
        .legend(Legend::default())
        .x_axis_label("Violation Type")
        .y_axis_label("Violation Count")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}
