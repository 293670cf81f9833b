//! Launch list page sources.

pub mod fetcher;

pub use fetcher::{FetchedPage, Fetcher};

use serde::{Deserialize, Serialize};

/// Column arrangement of a page's launch tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLayout {
    /// Falcon 9 / Falcon Heavy lists.
    Falcon,
    /// Starship flight list.
    Starship,
}

/// One wiki page to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSource {
    pub url: String,
    pub layout: PageLayout,
}
