//! Report generation modules.

pub mod artifacts;
pub mod launches_csv;

pub use artifacts::{write_artifacts, Artifact};
pub use launches_csv::render_launches_csv;
