//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.spacex-mass.toml` files.

use crate::models::OrbitClass;
use crate::parser::classify::OrbitRule;
use crate::source::{PageLayout, PageSource};
use anyhow::{bail, Context, Result};
use std::ops::RangeInclusive;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".spacex-mass.toml";

/// Accepted `cutoff_year` values, from the first orbital launch on.
pub const CUTOFF_YEARS: RangeInclusive<i32> = 1957..=9999;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Page sources and HTTP settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Orbit classification table.
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Output artifact settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// First year included in the cumulative series.
    #[serde(default = "default_cutoff_year")]
    pub cutoff_year: i32,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cutoff_year: default_cutoff_year(),
            verbose: false,
        }
    }
}

fn default_cutoff_year() -> i32 {
    2017
}

/// Where launch tables come from and how they are requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Pages to fetch, in order.
    #[serde(default = "default_pages")]
    pub pages: Vec<PageSource>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            pages: default_pages(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_pages() -> Vec<PageSource> {
    const WIKI: &str = "https://en.wikipedia.org/wiki/";

    let falcon = [
        "List_of_Falcon_9_and_Falcon_Heavy_launches_(2010%E2%80%932019)",
        "List_of_Falcon_9_and_Falcon_Heavy_launches_(2020%E2%80%932022)",
        "List_of_Falcon_9_and_Falcon_Heavy_launches_(2023)",
        "List_of_Falcon_9_and_Falcon_Heavy_launches",
    ];

    falcon
        .iter()
        .map(|page| PageSource {
            url: format!("{}{}", WIKI, page),
            layout: PageLayout::Falcon,
        })
        .chain(std::iter::once(PageSource {
            url: format!("{}List_of_Starship_launches", WIKI),
            layout: PageLayout::Starship,
        }))
        .collect()
}

/// Orbit classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Payload keyword that moves LEO/SSO launches into their constellation class.
    #[serde(default = "default_constellation_keyword")]
    pub constellation_keyword: String,

    /// Ordered rules; the first match wins, no match means `other`.
    #[serde(default = "default_rules")]
    pub rules: Vec<OrbitRule>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            constellation_keyword: default_constellation_keyword(),
            rules: default_rules(),
        }
    }
}

fn default_constellation_keyword() -> String {
    "Starlink".to_string()
}

fn default_rules() -> Vec<OrbitRule> {
    use OrbitClass::*;

    vec![
        // Multi-destination and exotic orbits first, before the substring rules see them
        OrbitRule::exact("LEO / MEO", Other),
        OrbitRule::exact("HEO for P/2 orbit", Other),
        OrbitRule::exact("—", Transatmospheric),
        OrbitRule::contains("Ballistic lunar", Blt),
        OrbitRule::contains("BLT", Blt),
        OrbitRule::contains("Heliocentric", Heliocentric),
        OrbitRule::contains("Transatmospheric", Transatmospheric),
        OrbitRule::contains("Sun-Earth", Other),
        OrbitRule::contains("GTO", GtoGeo),
        OrbitRule::contains("GEO", GtoGeo),
        OrbitRule::contains("MEO", Meo),
        OrbitRule::contains("SSO", SsoOther),
        OrbitRule::contains("LEO", LeoOther),
    ]
}

/// Output artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the SVG charts (and CSV) are written to.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Also write every parsed launch to `spacex_launches.csv`.
    #[serde(default = "default_true")]
    pub export_csv: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            export_csv: true,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Check values that parse but cannot be used.
    pub fn validate(&self) -> Result<()> {
        let year = self.general.cutoff_year;
        if !CUTOFF_YEARS.contains(&year) {
            bail!(
                "cutoff_year must be between {} and {}, got {}",
                CUTOFF_YEARS.start(),
                CUTOFF_YEARS.end(),
                year
            );
        }

        if self.source.timeout_seconds == 0 {
            bail!("timeout_seconds must be at least 1");
        }

        Ok(())
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.spacex-mass.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI flags take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if args.verbose {
            self.general.verbose = true;
        }
        if args.quiet {
            self.general.verbose = false;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.cutoff_year, 2017);
        assert_eq!(config.source.timeout_seconds, 10);
        assert_eq!(config.source.pages.len(), 5);
        assert_eq!(config.source.pages[4].layout, PageLayout::Starship);
        assert!(config
            .source
            .pages
            .iter()
            .take(4)
            .all(|p| p.layout == PageLayout::Falcon));
        assert_eq!(config.output.dir, PathBuf::from("outputs"));
        assert!(config.output.export_csv);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
cutoff_year = 2020

[source]
timeout_seconds = 30
pages = [
    { url = "https://example.org/launches", layout = "falcon" },
]

[classification]
constellation_keyword = "Kuiper"
rules = [
    { keyword = "LEO", class = "leo_other" },
    { keyword = "Lunar", class = "blt", exact = false },
]

[output]
dir = "charts"
export_csv = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.cutoff_year, 2020);
        assert!(!config.general.verbose);
        assert_eq!(config.source.timeout_seconds, 30);
        assert_eq!(config.source.pages.len(), 1);
        assert_eq!(config.source.pages[0].url, "https://example.org/launches");
        assert_eq!(config.classification.constellation_keyword, "Kuiper");
        assert_eq!(config.classification.rules.len(), 2);
        assert_eq!(config.classification.rules[1].class, OrbitClass::Blt);
        assert!(!config.classification.rules[0].exact);
        assert_eq!(config.output.dir, PathBuf::from("charts"));
        assert!(!config.output.export_csv);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.general.cutoff_year, 2017);
        assert_eq!(config.classification.constellation_keyword, "Starlink");
        assert!(!config.classification.rules.is_empty());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[classification]"));
        assert!(toml_str.contains("[output]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.source.pages.len(), 5);
        assert_eq!(
            reparsed.classification.rules.len(),
            Config::default().classification.rules.len()
        );
    }

    #[test]
    fn test_load_from_dir_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_out_of_range_cutoff_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[general]\ncutoff_year = -2000000000\n",
        )
        .unwrap();

        let err = Config::load_from_dir(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("cutoff_year"));
    }

    #[test]
    fn test_validate_bounds() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.general.cutoff_year = 1957;
        assert!(config.validate().is_ok());

        config.general.cutoff_year = 1956;
        assert!(config.validate().is_err());

        config.general.cutoff_year = 2017;
        config.source.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_dir_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "[general\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }
}
