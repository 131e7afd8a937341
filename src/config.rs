use std::path::PathBuf;

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_edit";
pub const DEFAULT_PROCESSED_SUFFIX: &str = "_edit.pdf";

/// Settings shared by every document in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimConfig {
    /// Directory outputs are written to
    pub output_dir: PathBuf,
    /// Appended to the input file stem to name the output
    pub output_suffix: String,
    /// Batch scans skip files whose name ends with this
    pub processed_suffix: String,
    /// Remove blank pages left after the selection is applied
    pub strip_blanks: bool,
}

impl Default for TrimConfig {
    fn default() -> Self {
        TrimConfig {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            processed_suffix: DEFAULT_PROCESSED_SUFFIX.to_string(),
            strip_blanks: true,
        }
    }
}
