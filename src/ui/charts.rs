use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::aggregate::{BatterTotal, BowlerWickets, OverRuns};

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Bar charts (top batsmen / top bowlers)
// ---------------------------------------------------------------------------

/// Top-10 run scorers as a categorical bar chart.
pub fn batsmen_chart(ui: &mut Ui, rows: &[BatterTotal]) {
    if rows.is_empty() {
        info_label(ui, "No batsman data found.");
        return;
    }
    let bars: Vec<(&str, f64)> = rows
        .iter()
        .map(|r| (r.batter.as_str(), r.batsman_runs as f64))
        .collect();
    categorical_bars(ui, "top_batsmen", "Runs", &bars);
}

/// Top-10 wicket takers as a categorical bar chart.
pub fn bowlers_chart(ui: &mut Ui, rows: &[BowlerWickets]) {
    if rows.is_empty() {
        info_label(ui, "No bowler data found.");
        return;
    }
    let bars: Vec<(&str, f64)> = rows
        .iter()
        .map(|r| (r.bowler.as_str(), r.wickets as f64))
        .collect();
    categorical_bars(ui, "top_bowlers", "Wickets", &bars);
}

/// One single-bar `BarChart` per label so the legend lists every name with
/// its own colour, the way a colour-by-category plot reads.
fn categorical_bars(ui: &mut Ui, id: &str, y_label: &str, bars: &[(&str, f64)]) {
    let colors = ColorMap::new(bars.iter().map(|(label, _)| *label));

    Plot::new(id.to_string())
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .y_axis_label(y_label)
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (label, value)) in bars.iter().enumerate() {
                let bar = Bar::new(i as f64, *value).width(0.7).name(*label);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(*label)
                        .color(colors.color_for(label)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Run-rate line chart
// ---------------------------------------------------------------------------

/// Runs per over as a line with markers.
pub fn run_rate_chart(ui: &mut Ui, rows: &[OverRuns]) {
    if rows.is_empty() {
        info_label(ui, "No run rate data available.");
        return;
    }

    let line_points: PlotPoints = rows
        .iter()
        .map(|r| [r.over as f64, r.total_runs as f64])
        .collect();
    let marker_points: PlotPoints = rows
        .iter()
        .map(|r| [r.over as f64, r.total_runs as f64])
        .collect();

    Plot::new("run_rate")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Over")
        .y_axis_label("Runs")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(line_points)
                    .name("Runs per over")
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
            plot_ui.points(
                Points::new(marker_points)
                    .name("Runs per over")
                    .color(Color32::LIGHT_BLUE)
                    .radius(3.0),
            );
        });
}

fn info_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).weak().italics());
}
