//! Loader for the RON tuning file.

use ron::Options;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::tuning::MotionTuning;

#[derive(Debug, Error)]
pub enum TuningLoadError {
    #[error("Failed to load {file}: IO error: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load {file}: Parse error: {message}")]
    Parse { file: String, message: String },
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse tuning from RON text. Missing sections and fields keep defaults.
pub fn parse_tuning(contents: &str, file: &str) -> Result<MotionTuning, TuningLoadError> {
    ron_options()
        .from_str(contents)
        .map_err(|e| TuningLoadError::Parse {
            file: file.to_string(),
            message: e.to_string(),
        })
}

/// Load tuning from a RON file on disk.
pub fn load_tuning(path: &Path) -> Result<MotionTuning, TuningLoadError> {
    let file = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|source| TuningLoadError::Io {
        file: file.clone(),
        source,
    })?;
    parse_tuning(&contents, &file)
}
