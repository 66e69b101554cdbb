//! Pipeline orchestration: directory → locate → extract → persist.

pub mod pipeline;

pub use pipeline::{ProgressReporter, RunConfig, SilentProgress, run};
