//! CSV export of the parsed launches.
//!
//! One row per launch in launch-time order, written next to the charts.

use super::artifacts::Artifact;
use crate::error::{PipelineError, PipelineResult};
use crate::models::LaunchRecord;
use serde::Serialize;
use tracing::debug;

pub const LAUNCHES_CSV_FILE: &str = "spacex_launches.csv";

#[derive(Debug, Serialize)]
struct LaunchRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Time (UTC)")]
    time: String,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Vehicle")]
    vehicle: String,
    #[serde(rename = "Payload")]
    payload: &'a str,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: Option<u64>,
    #[serde(rename = "Orbit")]
    orbit: &'a str,
    #[serde(rename = "Orbit Category")]
    orbit_category: &'static str,
}

impl<'a> From<&'a LaunchRecord> for LaunchRow<'a> {
    fn from(record: &'a LaunchRecord) -> Self {
        Self {
            date: record.launched_at.format("%Y-%m-%d").to_string(),
            time: record.launched_at.format("%H:%M:%S").to_string(),
            year: record.year(),
            vehicle: record.vehicle.to_string(),
            payload: &record.payload,
            payload_mass_kg: record.payload_mass_kg,
            orbit: &record.orbit_text,
            orbit_category: record.orbit_class.label(),
        }
    }
}

/// Render every record as `spacex_launches.csv` in memory.
pub fn render_launches_csv(records: &[LaunchRecord]) -> PipelineResult<Artifact> {
    let mut sorted: Vec<&LaunchRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.launched_at);

    let to_io = |e: csv::Error| PipelineError::io(LAUNCHES_CSV_FILE, e.into());

    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in sorted {
        writer.serialize(LaunchRow::from(record)).map_err(to_io)?;
    }
    let contents = writer
        .into_inner()
        .map_err(|e| PipelineError::io(LAUNCHES_CSV_FILE, e.into_error()))?;

    debug!("Rendered {} launches as CSV", records.len());
    Ok(Artifact::new(LAUNCHES_CSV_FILE, contents))
}
