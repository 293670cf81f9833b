//! Chart rendering.
//!
//! Both charts are drawn from the same [`Aggregates`], either to SVG files
//! or to an interactive window when the `display` feature is enabled.

pub mod axis;
#[cfg(feature = "display")]
mod display;
pub mod svg;

use crate::analysis::Aggregates;
use crate::report::Artifact;

pub const BAR_CHART_FILE: &str = "payload_mass_to_orbit_by_year.svg";
pub const LINE_CHART_FILE: &str = "cumulative_payload_mass_to_orbit.svg";

/// Both charts as SVG files, bar chart first.
pub fn render_svgs(aggregates: &Aggregates) -> Vec<Artifact> {
    vec![
        Artifact::new(BAR_CHART_FILE, svg::bar_chart_svg(&aggregates.totals)),
        Artifact::new(LINE_CHART_FILE, svg::line_chart_svg(&aggregates.series)),
    ]
}

/// Show both charts in a window, blocking until it is closed.
#[cfg(feature = "display")]
pub fn show(aggregates: &Aggregates) -> anyhow::Result<()> {
    display::run(aggregates)
}

#[cfg(not(feature = "display"))]
pub fn show(_aggregates: &Aggregates) -> anyhow::Result<()> {
    anyhow::bail!("built without the `display` feature; rerun with --output to write SVG files")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CumulativePoint, CumulativeSeries, OrbitClass, YearlyOrbitTotals};
    use crate::report::write_artifacts;
    use tempfile::TempDir;

    fn sample() -> Aggregates {
        let mut totals = YearlyOrbitTotals::default();
        totals.add(2020, OrbitClass::LeoOther, 1000);
        Aggregates {
            totals,
            series: CumulativeSeries {
                points: vec![CumulativePoint {
                    year: 2020,
                    total_kg: 1000,
                }],
            },
        }
    }

    #[test]
    fn test_render_svgs() {
        let artifacts = render_svgs(&sample());

        let names: Vec<&str> = artifacts.iter().map(|a| a.name).collect();
        assert_eq!(names, vec![BAR_CHART_FILE, LINE_CHART_FILE]);

        let bars = String::from_utf8(artifacts[0].contents.clone()).unwrap();
        assert!(bars.contains(svg::BAR_CHART_TITLE));
        let line = String::from_utf8(artifacts[1].contents.clone()).unwrap();
        assert!(line.contains(svg::LINE_CHART_TITLE));
    }

    #[test]
    fn test_written_svgs_replace_stale_files() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(LINE_CHART_FILE), "stale").unwrap();

        let written = write_artifacts(&render_svgs(&sample()), temp.path()).unwrap();

        assert_eq!(written.len(), 2);
        assert!(temp.path().join(BAR_CHART_FILE).is_file());
        let line = std::fs::read_to_string(temp.path().join(LINE_CHART_FILE)).unwrap();
        assert!(line.starts_with("<svg"));
    }
}
