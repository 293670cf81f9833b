//! Data models for the launch pipeline.
//!
//! This module contains the core data structures passed between the
//! fetcher, parser, aggregator and renderer.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An RGB colour used for chart series.
pub type Rgb = (u8, u8, u8);

/// Normalized destination orbit category.
///
/// Declaration order is the legend and stacking order of the charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbitClass {
    LeoStarlink,
    LeoOther,
    SsoStarlink,
    SsoOther,
    Meo,
    GtoGeo,
    /// Ballistic lunar transfer
    Blt,
    Heliocentric,
    Transatmospheric,
    Other,
}

impl OrbitClass {
    /// Every class, in legend order.
    pub const ALL: [OrbitClass; 10] = [
        OrbitClass::LeoStarlink,
        OrbitClass::LeoOther,
        OrbitClass::SsoStarlink,
        OrbitClass::SsoOther,
        OrbitClass::Meo,
        OrbitClass::GtoGeo,
        OrbitClass::Blt,
        OrbitClass::Heliocentric,
        OrbitClass::Transatmospheric,
        OrbitClass::Other,
    ];

    /// Human-readable label used in legends and the CSV export.
    pub fn label(&self) -> &'static str {
        match self {
            OrbitClass::LeoStarlink => "LEO (Starlink)",
            OrbitClass::LeoOther => "LEO (Other)",
            OrbitClass::SsoStarlink => "SSO (Starlink)",
            OrbitClass::SsoOther => "SSO (Other)",
            OrbitClass::Meo => "MEO",
            OrbitClass::GtoGeo => "GTO/GEO",
            OrbitClass::Blt => "BLT",
            OrbitClass::Heliocentric => "Heliocentric",
            OrbitClass::Transatmospheric => "Transatmospheric",
            OrbitClass::Other => "Other",
        }
    }

    /// Fill colour of the class in the stacked bar chart.
    pub fn color(&self) -> Rgb {
        match self {
            OrbitClass::LeoStarlink => (0xD2, 0x69, 0x1E), // chocolate
            OrbitClass::LeoOther => (0xFF, 0x7F, 0x50),    // coral
            OrbitClass::SsoStarlink => (0xB8, 0x86, 0x0B), // darkgoldenrod
            OrbitClass::SsoOther => (0xFF, 0xA5, 0x00),    // orange
            OrbitClass::Meo => (0xDA, 0x70, 0xD6),         // orchid
            OrbitClass::GtoGeo => (0x9A, 0xCD, 0x32),      // yellowgreen
            OrbitClass::Blt => (0xFF, 0xD7, 0x00),         // gold
            OrbitClass::Heliocentric => (0xF5, 0xDE, 0xB3), // wheat
            OrbitClass::Transatmospheric => (0xAD, 0xD8, 0xE6), // lightblue
            OrbitClass::Other => (0xD3, 0xD3, 0xD3),       // lightgray
        }
    }

    /// The constellation variant of this class, if it has one.
    ///
    /// Only LEO and SSO launches are split out by constellation.
    pub fn with_constellation(self) -> Self {
        match self {
            OrbitClass::LeoOther => OrbitClass::LeoStarlink,
            OrbitClass::SsoOther => OrbitClass::SsoStarlink,
            other => other,
        }
    }
}

impl fmt::Display for OrbitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Launch vehicle family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vehicle {
    Falcon9,
    FalconHeavy,
    /// Starship, with the block number when the table names one.
    Starship { block: Option<u32> },
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vehicle::Falcon9 => write!(f, "Falcon 9"),
            Vehicle::FalconHeavy => write!(f, "Falcon Heavy"),
            Vehicle::Starship { block: Some(n) } => write!(f, "Block {} Starship", n),
            Vehicle::Starship { block: None } => write!(f, "Starship"),
        }
    }
}

/// A single launch parsed from a table row.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    /// Launch date and time (UTC); midnight when the table gives no time.
    pub launched_at: NaiveDateTime,
    /// Vehicle that flew the mission.
    pub vehicle: Vehicle,
    /// Payload name as written in the table.
    pub payload: String,
    /// Raw orbit destination text.
    pub orbit_text: String,
    /// Normalized orbit category.
    pub orbit_class: OrbitClass,
    /// Payload mass in kilograms, if the table states one.
    pub payload_mass_kg: Option<u64>,
    /// Whether the launch outcome was a success.
    pub succeeded: bool,
}

impl LaunchRecord {
    /// Calendar year of the launch.
    pub fn year(&self) -> i32 {
        self.launched_at.year()
    }

    /// Mass that counts toward the aggregates.
    ///
    /// Payloads of failed launches never reached orbit and count as absent.
    pub fn counted_mass(&self) -> Option<u64> {
        if self.succeeded {
            self.payload_mass_kg
        } else {
            None
        }
    }
}

/// Summed payload mass keyed by (year, orbit class).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearlyOrbitTotals {
    totals: BTreeMap<(i32, OrbitClass), u64>,
}

impl YearlyOrbitTotals {
    /// Add `kg` to the (year, class) cell, saturating at `u64::MAX`.
    pub fn add(&mut self, year: i32, class: OrbitClass, kg: u64) {
        let cell = self.totals.entry((year, class)).or_insert(0);
        *cell = cell.saturating_add(kg);
    }

    /// Total for one cell, if any record contributed to it.
    pub fn get(&self, year: i32, class: OrbitClass) -> Option<u64> {
        self.totals.get(&(year, class)).copied()
    }

    /// Sum across all classes for a year.
    pub fn year_total(&self, year: i32) -> u64 {
        self.totals
            .range((year, OrbitClass::LeoStarlink)..=(year, OrbitClass::Other))
            .fold(0u64, |acc, (_, kg)| acc.saturating_add(*kg))
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.totals.keys().map(|(year, _)| *year).collect();
        years.dedup();
        years
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// One point of the cumulative series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CumulativePoint {
    pub year: i32,
    /// Running total in kg up to and including `year`.
    pub total_kg: u64,
}

/// Running payload mass total, one point per year from the cutoff year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CumulativeSeries {
    pub points: Vec<CumulativePoint>,
}

impl CumulativeSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Final running total, zero for an empty series.
    pub fn last_total(&self) -> u64 {
        self.points.last().map(|p| p.total_kg).unwrap_or(0)
    }

    /// The series as plain (year, total) pairs.
    pub fn pairs(&self) -> Vec<(i32, u64)> {
        self.points.iter().map(|p| (p.year, p.total_kg)).collect()
    }
}
