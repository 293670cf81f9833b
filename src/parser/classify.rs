//! Orbit destination classification.
//!
//! Free-text orbit cells are mapped to an [`OrbitClass`] through an ordered
//! keyword table. The table is heuristic: multi-destination missions and new
//! orbit names can land in the wrong bucket, and anything unmatched becomes
//! `Other`.

use crate::config::ClassificationConfig;
use crate::models::OrbitClass;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static FOOTNOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.*?\]").unwrap());

/// One row of the classification table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitRule {
    /// Text to look for, compared case-insensitively.
    pub keyword: String,
    /// Class assigned on a match.
    pub class: OrbitClass,
    /// Require the whole cleaned cell to equal `keyword` instead of containing it.
    #[serde(default)]
    pub exact: bool,
}

impl OrbitRule {
    pub fn contains(keyword: &str, class: OrbitClass) -> Self {
        Self {
            keyword: keyword.to_string(),
            class,
            exact: false,
        }
    }

    pub fn exact(keyword: &str, class: OrbitClass) -> Self {
        Self {
            keyword: keyword.to_string(),
            class,
            exact: true,
        }
    }
}

/// Remove `[n]` footnote markers and surrounding whitespace.
pub fn clean_orbit_text(text: &str) -> String {
    FOOTNOTE.replace_all(text, "").trim().to_string()
}

/// Classifier built from the configured rule table.
#[derive(Debug, Clone)]
pub struct OrbitClassifier {
    /// (lowercased keyword, class, exact)
    rules: Vec<(String, OrbitClass, bool)>,
    constellation_keyword: String,
}

impl OrbitClassifier {
    pub fn new(config: &ClassificationConfig) -> Self {
        Self {
            rules: config
                .rules
                .iter()
                .map(|r| (r.keyword.to_lowercase(), r.class, r.exact))
                .collect(),
            constellation_keyword: config.constellation_keyword.to_lowercase(),
        }
    }

    /// Class of an orbit cell, given the payload it carried.
    pub fn classify(&self, orbit_text: &str, payload: &str) -> OrbitClass {
        let cleaned = clean_orbit_text(orbit_text).to_lowercase();

        let class = self
            .rules
            .iter()
            .find(|(keyword, _, exact)| {
                if *exact {
                    cleaned == *keyword
                } else {
                    cleaned.contains(keyword.as_str())
                }
            })
            .map(|(_, class, _)| *class)
            .unwrap_or(OrbitClass::Other);

        if self.is_constellation(payload) {
            class.with_constellation()
        } else {
            class
        }
    }

    fn is_constellation(&self, payload: &str) -> bool {
        !self.constellation_keyword.is_empty()
            && payload.to_lowercase().contains(&self.constellation_keyword)
    }
}

impl Default for OrbitClassifier {
    fn default() -> Self {
        Self::new(&ClassificationConfig::default())
    }
}
