//! SVG chart generation.
//!
//! Charts are assembled as plain SVG markup. Output is a pure function of
//! the aggregates, so identical input produces byte-identical files.

use super::axis::{format_thousands, nice_ticks};
use crate::models::{CumulativeSeries, OrbitClass, Rgb, YearlyOrbitTotals};

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 700.0;
const MARGIN_LEFT: f64 = 110.0;
const MARGIN_RIGHT: f64 = 190.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 90.0;

const FONT: &str = "DejaVu Sans, Arial, sans-serif";
const GRID_COLOR: &str = "#b0b0b0";
const AXIS_COLOR: &str = "#000000";
const ANNOTATION_COLOR: &str = "#808080";
const LINE_COLOR: &str = "#1f77b4";

/// Fraction of each year's slot covered by its bar.
const BAR_WIDTH: f64 = 0.5;
/// Headroom above the tallest bar for the total annotations.
const HEADROOM: f64 = 1.08;
const TARGET_TICKS: u64 = 6;

pub const BAR_CHART_TITLE: &str = "Payload Mass to Type of Orbit by Year";
pub const LINE_CHART_TITLE: &str = "Cumulative Payload Mass to Orbit By Year";

fn hex(color: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Text placement options.
#[derive(Debug, Clone, Copy)]
struct TextStyle<'a> {
    size: f64,
    anchor: &'a str,
    color: &'a str,
    bold: bool,
    /// Rotation in degrees around the text origin.
    rotate: f64,
}

impl Default for TextStyle<'_> {
    fn default() -> Self {
        Self {
            size: 12.0,
            anchor: "middle",
            color: AXIS_COLOR,
            bold: false,
            rotate: 0.0,
        }
    }
}

/// Minimal SVG document builder.
struct SvgDocument {
    body: String,
}

impl SvgDocument {
    fn new() -> Self {
        let mut body = String::new();
        body.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"{font}\">\n",
            w = WIDTH,
            h = HEIGHT,
            font = FONT
        ));
        body.push_str(&format!(
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#ffffff\"/>\n",
            WIDTH, HEIGHT
        ));
        Self { body }
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str) {
        self.body.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>\n",
            x, y, width, height, fill
        ));
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
        self.body.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"{:.1}\"/>\n",
            x1, y1, x2, y2, stroke, width
        ));
    }

    fn polyline(&mut self, points: &[(f64, f64)], stroke: &str, width: f64) {
        let coords: Vec<String> = points
            .iter()
            .map(|(x, y)| format!("{:.1},{:.1}", x, y))
            .collect();
        self.body.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.1}\"/>\n",
            coords.join(" "),
            stroke,
            width
        ));
    }

    fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str) {
        self.body.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"{}\"/>\n",
            cx, cy, r, fill
        ));
    }

    fn text(&mut self, x: f64, y: f64, content: &str, style: TextStyle<'_>) {
        let transform = if style.rotate != 0.0 {
            format!(" transform=\"rotate({:.0} {:.1} {:.1})\"", style.rotate, x, y)
        } else {
            String::new()
        };
        let weight = if style.bold { " font-weight=\"bold\"" } else { "" };

        self.body.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"{:.0}\" text-anchor=\"{}\" fill=\"{}\"{}{}>{}</text>\n",
            x,
            y,
            style.size,
            style.anchor,
            style.color,
            weight,
            transform,
            escape(content)
        ));
    }

    fn finish(mut self) -> String {
        self.body.push_str("</svg>\n");
        self.body
    }
}

/// Plot rectangle and value scale shared by both charts.
struct Frame {
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    y_max: f64,
}

impl Frame {
    fn new(ticks: &[u64]) -> Self {
        Self {
            left: MARGIN_LEFT,
            right: WIDTH - MARGIN_RIGHT,
            top: MARGIN_TOP,
            bottom: HEIGHT - MARGIN_BOTTOM,
            y_max: ticks.last().copied().unwrap_or(1).max(1) as f64,
        }
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    fn y(&self, value: u64) -> f64 {
        self.bottom - (value as f64 / self.y_max) * (self.bottom - self.top)
    }

    /// Centre of category slot `i` out of `n`.
    fn slot_center(&self, i: usize, n: usize) -> f64 {
        let slot = self.width() / n.max(1) as f64;
        self.left + slot * (i as f64 + 0.5)
    }

    /// Title, y label, gridlines, y tick labels and the axis box.
    fn draw_axes(&self, doc: &mut SvgDocument, title: &str, y_label: &str, ticks: &[u64]) {
        doc.text(
            (self.left + self.right) / 2.0,
            self.top - 25.0,
            title,
            TextStyle {
                size: 16.0,
                ..TextStyle::default()
            },
        );

        for tick in ticks {
            let y = self.y(*tick);
            doc.line(self.left, y, self.right, y, GRID_COLOR, 0.8);
            doc.text(
                self.left - 8.0,
                y + 4.0,
                &format_thousands(*tick),
                TextStyle {
                    size: 11.0,
                    anchor: "end",
                    ..TextStyle::default()
                },
            );
        }

        let label_x = 25.0;
        let label_y = (self.top + self.bottom) / 2.0;
        doc.text(
            label_x,
            label_y,
            y_label,
            TextStyle {
                size: 13.0,
                rotate: -90.0,
                ..TextStyle::default()
            },
        );

        doc.line(self.left, self.top, self.left, self.bottom, AXIS_COLOR, 1.0);
        doc.line(self.left, self.bottom, self.right, self.bottom, AXIS_COLOR, 1.0);
        doc.line(self.right, self.top, self.right, self.bottom, AXIS_COLOR, 1.0);
        doc.line(self.left, self.top, self.right, self.top, AXIS_COLOR, 1.0);
    }

    /// Vertical gridline and rotated year label at `x`.
    fn draw_x_tick(&self, doc: &mut SvgDocument, x: f64, label: &str) {
        doc.line(x, self.top, x, self.bottom, GRID_COLOR, 0.8);
        doc.line(x, self.bottom, x, self.bottom + 5.0, AXIS_COLOR, 1.0);
        doc.text(
            x + 4.0,
            self.bottom + 20.0,
            label,
            TextStyle {
                size: 11.0,
                anchor: "end",
                rotate: -45.0,
                ..TextStyle::default()
            },
        );
    }

    fn draw_no_data(&self, doc: &mut SvgDocument) {
        doc.text(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
            "No data",
            TextStyle {
                size: 14.0,
                color: ANNOTATION_COLOR,
                ..TextStyle::default()
            },
        );
    }
}

/// Stacked bar chart of payload mass per year, one segment per orbit class.
pub fn bar_chart_svg(totals: &YearlyOrbitTotals) -> String {
    let years = totals.years();
    let tallest = years.iter().map(|y| totals.year_total(*y)).max().unwrap_or(0);
    let ticks = nice_ticks((tallest as f64 * HEADROOM).ceil() as u64, TARGET_TICKS);
    let frame = Frame::new(&ticks);

    let mut doc = SvgDocument::new();
    frame.draw_axes(&mut doc, BAR_CHART_TITLE, "Payload Mass (kg)", &ticks);

    if years.is_empty() {
        frame.draw_no_data(&mut doc);
    }

    let bar_width = frame.width() / years.len().max(1) as f64 * BAR_WIDTH;

    for (i, year) in years.iter().enumerate() {
        let center = frame.slot_center(i, years.len());
        frame.draw_x_tick(&mut doc, center, &year.to_string());

        let mut stacked = 0u64;
        for class in OrbitClass::ALL {
            let kg = totals.get(*year, class).unwrap_or(0);
            if kg == 0 {
                continue;
            }
            let y_top = frame.y(stacked.saturating_add(kg));
            let y_bottom = frame.y(stacked);
            doc.rect(
                center - bar_width / 2.0,
                y_top,
                bar_width,
                y_bottom - y_top,
                &hex(class.color()),
            );
            stacked = stacked.saturating_add(kg);
        }

        doc.text(
            center,
            frame.y(stacked) - 4.0,
            &format_thousands(stacked),
            TextStyle {
                size: 9.0,
                color: ANNOTATION_COLOR,
                ..TextStyle::default()
            },
        );
    }

    draw_legend(&mut doc, &frame);
    doc.finish()
}

fn draw_legend(doc: &mut SvgDocument, frame: &Frame) {
    let x = frame.right + 15.0;
    let mut y = frame.top + 10.0;

    doc.text(
        x,
        y,
        "Orbit Type",
        TextStyle {
            size: 12.0,
            anchor: "start",
            bold: true,
            ..TextStyle::default()
        },
    );

    // Top of the stack first, as in the drawn bars
    for class in OrbitClass::ALL.iter().rev() {
        y += 22.0;
        doc.rect(x, y - 11.0, 18.0, 12.0, &hex(class.color()));
        doc.text(
            x + 26.0,
            y,
            class.label(),
            TextStyle {
                size: 11.0,
                anchor: "start",
                ..TextStyle::default()
            },
        );
    }
}

/// Line chart of the cumulative payload mass series.
pub fn line_chart_svg(series: &CumulativeSeries) -> String {
    let ticks = nice_ticks(series.last_total(), TARGET_TICKS);
    let frame = Frame::new(&ticks);

    let mut doc = SvgDocument::new();
    frame.draw_axes(
        &mut doc,
        LINE_CHART_TITLE,
        "Cumulative Payload Mass (kg)",
        &ticks,
    );

    if series.is_empty() {
        frame.draw_no_data(&mut doc);
        return doc.finish();
    }

    let n = series.points.len();
    let coords: Vec<(f64, f64)> = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (frame.slot_center(i, n), frame.y(p.total_kg)))
        .collect();

    for (point, (x, _)) in series.points.iter().zip(&coords) {
        frame.draw_x_tick(&mut doc, *x, &point.year.to_string());
    }

    doc.polyline(&coords, LINE_COLOR, 2.0);
    for (x, y) in &coords {
        doc.circle(*x, *y, 3.5, LINE_COLOR);
    }

    doc.finish()
}
