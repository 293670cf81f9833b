use eframe::egui::{self, Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use super::axis::format_thousands;
use super::svg::{BAR_CHART_TITLE, LINE_CHART_TITLE};
use crate::analysis::Aggregates;
use crate::models::{CumulativeSeries, OrbitClass, YearlyOrbitTotals};

const LINE_COLOR: Color32 = Color32::from_rgb(0x1f, 0x77, 0xb4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartTab {
    Bars,
    Cumulative,
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

struct ChartApp {
    aggregates: Aggregates,
    tab: ChartTab,
}

impl eframe::App for ChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("chart_tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, ChartTab::Bars, BAR_CHART_TITLE);
                ui.selectable_value(&mut self.tab, ChartTab::Cumulative, LINE_CHART_TITLE);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            ChartTab::Bars => bar_plot(ui, &self.aggregates.totals),
            ChartTab::Cumulative => cumulative_plot(ui, &self.aggregates.series),
        });
    }
}

fn class_color(class: OrbitClass) -> Color32 {
    let (r, g, b) = class.color();
    Color32::from_rgb(r, g, b)
}

/// Stacked bars, one `BarChart` per orbit class stacked on the previous ones.
fn bar_plot(ui: &mut Ui, totals: &YearlyOrbitTotals) {
    let years = totals.years();

    Plot::new("payload_by_year")
        .legend(Legend::default())
        .y_axis_label("Payload Mass (kg)")
        .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
        .y_axis_formatter(|mark, _range| format_thousands(mark.value.max(0.0) as u64))
        .show(ui, |plot_ui| {
            let mut charts: Vec<BarChart> = Vec::with_capacity(OrbitClass::ALL.len());

            for class in OrbitClass::ALL {
                let bars: Vec<Bar> = years
                    .iter()
                    .map(|year| {
                        let kg = totals.get(*year, class).unwrap_or(0);
                        Bar::new(*year as f64, kg as f64).width(0.5)
                    })
                    .collect();

                let below: Vec<&BarChart> = charts.iter().collect();
                let chart = BarChart::new(bars)
                    .name(class.label())
                    .color(class_color(class))
                    .stack_on(&below);
                charts.push(chart);
            }

            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

fn cumulative_plot(ui: &mut Ui, series: &CumulativeSeries) {
    if series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data");
        });
        return;
    }

    let coords: Vec<[f64; 2]> = series
        .points
        .iter()
        .map(|p| [p.year as f64, p.total_kg as f64])
        .collect();

    Plot::new("cumulative_payload")
        .y_axis_label("Cumulative Payload Mass (kg)")
        .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
        .y_axis_formatter(|mark, _range| format_thousands(mark.value.max(0.0) as u64))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .color(LINE_COLOR)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(coords.clone()))
                    .color(LINE_COLOR)
                    .radius(3.5),
            );
        });
}

/// Open the chart window and block until it is closed.
pub fn run(aggregates: &Aggregates) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let app = ChartApp {
        aggregates: aggregates.clone(),
        tab: ChartTab::Bars,
    };

    eframe::run_native(
        "SpaceX Payload Mass",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("Chart window failed: {}", e))
}
