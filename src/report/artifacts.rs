//! Output file staging.
//!
//! All payloads are rendered before anything touches the output directory.
//! Each is written to a hidden `.part` file first and only renamed into
//! place once every write succeeded, so a failed run leaves the previous
//! output set untouched.

use crate::error::{PipelineError, PipelineResult};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: &'static str,
    pub contents: Vec<u8>,
}

impl Artifact {
    pub fn new(name: &'static str, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name,
            contents: contents.into(),
        }
    }
}

fn staging_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!(".{}.part", name))
}

fn discard(staged: &[PathBuf]) {
    for path in staged {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

/// Write every artifact into `dir`, creating it if needed.
///
/// Existing files are replaced only after every payload has been written.
pub fn write_artifacts(artifacts: &[Artifact], dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;

    let mut staged = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = staging_path(dir, artifact.name);
        if let Err(e) = std::fs::write(&path, &artifact.contents) {
            discard(&staged);
            return Err(PipelineError::io(path, e));
        }
        staged.push(path);
    }

    let mut written = Vec::with_capacity(artifacts.len());
    for (i, (artifact, part)) in artifacts.iter().zip(&staged).enumerate() {
        let path = dir.join(artifact.name);
        if let Err(e) = std::fs::rename(part, &path) {
            discard(&staged[i..]);
            return Err(PipelineError::io(path, e));
        }
        info!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}
