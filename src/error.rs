//! Pipeline error types.
//!
//! Every variant is fatal: the run stops and nothing partial is written.

use std::path::PathBuf;

/// Failure of one pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A page could not be retrieved (connect failure, timeout, non-2xx).
    #[error("failed to fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page has no launch table structure at all.
    #[error("no launch tables found in {url}: {reason}")]
    Parse { url: String, reason: String },

    /// An output artifact could not be written.
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
