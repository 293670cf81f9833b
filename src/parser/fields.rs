//! Field parsers for individual table cells.
//!
//! Every parser returns `None` for text it cannot make sense of; the caller
//! decides whether that drops the row or just the value.

use crate::models::Vehicle;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

static DAY_MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\s+(\w+)\s*(\d{4})").unwrap());
static MONTH_DAY_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s+(\d{1,2}),?\s*(\d{4})").unwrap());
static TIME_OF_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2}):(\d{2})(?::(\d{2}))?").unwrap());
static MASS_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d[\d,]*)\s*(?:-|to)\s*(\d[\d,]*)").unwrap());
static FIRST_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d[\d,]*)").unwrap());
static KG_AMOUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~?([\d,]+)\s*kg").unwrap());
static BLOCK_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Block\s+(\d+)").unwrap());

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Month number from an English month name or abbreviation.
pub fn month_from_name(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u32 + 1)
}

/// Launch date and time from a date cell.
///
/// Accepts `4 June 2010` and `June 4, 2010`; an `HH:MM[:SS]` time is
/// optional and defaults to midnight.
pub fn parse_launch_datetime(text: &str) -> Option<NaiveDateTime> {
    let (day, month, year) = if let Some(caps) = DAY_MONTH_YEAR.captures(text) {
        (caps[1].parse::<u32>().ok()?, month_from_name(&caps[2])?, caps[3].parse::<i32>().ok()?)
    } else {
        let caps = MONTH_DAY_YEAR.captures(text)?;
        (caps[2].parse::<u32>().ok()?, month_from_name(&caps[1])?, caps[3].parse::<i32>().ok()?)
    };

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = TIME_OF_DAY
        .captures(text)
        .and_then(|caps| {
            let hour = caps[1].parse::<u32>().ok()?;
            let minute = caps[2].parse::<u32>().ok()?;
            let second = match caps.get(3) {
                Some(s) => s.as_str().parse::<u32>().ok()?,
                None => 0,
            };
            NaiveTime::from_hms_opt(hour, minute, second)
        })
        .unwrap_or(NaiveTime::MIN);

    Some(date.and_time(time))
}

fn parse_grouped_number(digits: &str) -> Option<u64> {
    digits.replace(',', "").parse().ok()
}

/// Payload mass from a Falcon table cell.
///
/// `5,000 kg` → 5000, `~16,000 kg` → 16000, and a range such as
/// `5,000–6,000 kg` or `5000 to 6000 kg` → the midpoint, ties rounded to even.
pub fn parse_falcon_mass(text: &str) -> Option<u64> {
    let s = text.trim().replace(['\u{2013}', '\u{2014}'], "-");

    if let Some(caps) = MASS_RANGE.captures(&s) {
        let low = parse_grouped_number(&caps[1])?;
        let high = parse_grouped_number(&caps[2])?;
        return midpoint_half_even(low, high);
    }

    FIRST_NUMBER
        .captures(&s)
        .and_then(|caps| parse_grouped_number(&caps[1]))
}

/// `None` when the bounds are too large to add.
fn midpoint_half_even(a: u64, b: u64) -> Option<u64> {
    let sum = a.checked_add(b)?;
    let half = sum / 2;
    if sum % 2 == 1 && half % 2 == 1 {
        Some(half + 1)
    } else {
        Some(half)
    }
}

/// Payload mass from a Starship table cell, e.g. `~16,000 kg (35,000 lb)`.
pub fn parse_starship_mass(text: &str) -> Option<u64> {
    KG_AMOUNT
        .captures(text)
        .and_then(|caps| parse_grouped_number(&caps[1]))
}

/// Whether an outcome cell reports success.
pub fn is_success(outcome: &str) -> bool {
    outcome.to_lowercase().contains("success")
}

/// Vehicle from a Falcon booster/version cell.
pub fn falcon_vehicle(booster: &str) -> Vehicle {
    if booster.contains("Heavy") || booster.contains("FH") {
        Vehicle::FalconHeavy
    } else {
        Vehicle::Falcon9
    }
}

/// Vehicle from a Starship ship cell, e.g. `Block 1 S24`.
pub fn starship_vehicle(ship: &str) -> Vehicle {
    let block = BLOCK_NUMBER
        .captures(ship)
        .and_then(|caps| caps[1].parse().ok());
    Vehicle::Starship { block }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_month_from_name() {
        assert_eq!(month_from_name("June"), Some(6));
        assert_eq!(month_from_name("Sept"), Some(9));
        assert_eq!(month_from_name("DEC"), Some(12));
        assert_eq!(month_from_name("Smarch"), None);
    }

    #[test]
    fn test_parse_day_month_year() {
        let dt = parse_launch_datetime("4 June 2010 18:45").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2010, 6, 4));
        assert_eq!((dt.hour(), dt.minute()), (18, 45));
    }

    #[test]
    fn test_parse_time_with_seconds() {
        let dt = parse_launch_datetime("7 January 2020 02:19:21").unwrap();
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (2, 19, 21));
    }

    #[test]
    fn test_parse_month_day_year_without_time() {
        let dt = parse_launch_datetime("August 26, 2025").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 8, 26));
        assert_eq!((dt.hour(), dt.minute()), (0, 0));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_launch_datetime("NET 2026").is_none());
        assert!(parse_launch_datetime("31 Foo 2020").is_none());
        assert!(parse_launch_datetime("31 February 2020").is_none());
    }

    #[test]
    fn test_invalid_time_falls_back_to_midnight() {
        let dt = parse_launch_datetime("1 March 2021 99:99").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (0, 0));
    }

    #[test]
    fn test_falcon_mass_single_value() {
        assert_eq!(parse_falcon_mass("15,600 kg (34,400 lb)"), Some(15_600));
        assert_eq!(parse_falcon_mass("~16,000 kg"), Some(16_000));
        assert_eq!(parse_falcon_mass("525 kg"), Some(525));
    }

    #[test]
    fn test_falcon_mass_ranges() {
        assert_eq!(parse_falcon_mass("5,000\u{2013}6,000 kg"), Some(5_500));
        assert_eq!(parse_falcon_mass("5000-6000 kg"), Some(5_500));
        assert_eq!(parse_falcon_mass("5000 to 6000 kg"), Some(5_500));
        // Ties go to the even neighbour
        assert_eq!(parse_falcon_mass("1-2 kg"), Some(2));
        assert_eq!(parse_falcon_mass("2-3 kg"), Some(2));
    }

    #[test]
    fn test_falcon_mass_range_too_large() {
        assert_eq!(
            parse_falcon_mass("10000000000000000000-10000000000000000000 kg"),
            None
        );
        assert_eq!(parse_falcon_mass("99999999999999999999 kg"), None);
        assert_eq!(midpoint_half_even(u64::MAX, 1), None);
        assert_eq!(midpoint_half_even(u64::MAX - 1, 1), Some(u64::MAX / 2 + 1));
    }

    #[test]
    fn test_falcon_mass_unknown() {
        assert_eq!(parse_falcon_mass(""), None);
        assert_eq!(parse_falcon_mass("Classified"), None);
        assert_eq!(parse_falcon_mass("Unknown"), None);
    }

    #[test]
    fn test_starship_mass() {
        assert_eq!(parse_starship_mass("~16,000 kg (35,000 lb)"), Some(16_000));
        assert_eq!(parse_starship_mass("—"), None);
        assert_eq!(parse_starship_mass("100 t"), None);
    }

    #[test]
    fn test_is_success() {
        assert!(is_success("Success"));
        assert!(is_success("Partial success"));
        assert!(!is_success("Failure"));
        assert!(!is_success(""));
    }

    #[test]
    fn test_vehicles() {
        assert_eq!(falcon_vehicle("F9 B5 B1060.4"), Vehicle::Falcon9);
        assert_eq!(falcon_vehicle("Falcon Heavy B1052"), Vehicle::FalconHeavy);
        assert_eq!(falcon_vehicle("FH B1064"), Vehicle::FalconHeavy);
        assert_eq!(
            starship_vehicle("Block 2 S33"),
            Vehicle::Starship { block: Some(2) }
        );
        assert_eq!(starship_vehicle("S20"), Vehicle::Starship { block: None });
    }
}
