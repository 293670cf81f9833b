//! Payload mass aggregation.
//!
//! This module groups parsed launches by year and orbit class and builds
//! the running cumulative total used by the line chart.

use crate::models::{CumulativePoint, CumulativeSeries, LaunchRecord, YearlyOrbitTotals};
use std::collections::BTreeMap;

/// Both aggregates of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub totals: YearlyOrbitTotals,
    pub series: CumulativeSeries,
}

/// Compute both aggregates from the same record set.
pub fn aggregate(records: &[LaunchRecord], cutoff_year: i32) -> Aggregates {
    Aggregates {
        totals: yearly_orbit_totals(records),
        series: cumulative_series(records, cutoff_year),
    }
}

/// Sum counted payload mass by (year, orbit class).
///
/// Records without a counted mass are skipped entirely.
pub fn yearly_orbit_totals(records: &[LaunchRecord]) -> YearlyOrbitTotals {
    let mut totals = YearlyOrbitTotals::default();

    for record in records {
        if let Some(kg) = record.counted_mass() {
            totals.add(record.year(), record.orbit_class, kg);
        }
    }

    totals
}

/// Counted payload mass per year, across all orbit classes.
pub fn mass_by_year(records: &[LaunchRecord]) -> BTreeMap<i32, u64> {
    let mut by_year: BTreeMap<i32, u64> = BTreeMap::new();

    for record in records {
        if let Some(kg) = record.counted_mass() {
            let total = by_year.entry(record.year()).or_default();
            *total = total.saturating_add(kg);
        }
    }

    by_year
}

/// Running total of counted mass from `cutoff_year` to the latest launch year.
///
/// Years without launches repeat the previous total. Launches before the
/// cutoff are ignored, and the series is empty when no launch falls on or
/// after it.
pub fn cumulative_series(records: &[LaunchRecord], cutoff_year: i32) -> CumulativeSeries {
    let Some(last_year) = records
        .iter()
        .map(|r| r.year())
        .filter(|year| *year >= cutoff_year)
        .max()
    else {
        return CumulativeSeries::default();
    };

    let by_year = mass_by_year(records);
    let mut running = 0u64;

    let points = (cutoff_year..=last_year)
        .map(|year| {
            running = running.saturating_add(by_year.get(&year).copied().unwrap_or(0));
            CumulativePoint {
                year,
                total_kg: running,
            }
        })
        .collect();

    CumulativeSeries { points }
}

/// Number of launches per year, whether or not their mass is known.
pub fn launch_counts_by_year(records: &[LaunchRecord]) -> BTreeMap<i32, usize> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();

    for record in records {
        *counts.entry(record.year()).or_default() += 1;
    }

    counts
}

/// Records whose mass is missing or not counted.
pub fn uncounted_launches(records: &[LaunchRecord]) -> usize {
    records.iter().filter(|r| r.counted_mass().is_none()).count()
}
