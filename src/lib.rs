pub mod job_helpers;
pub mod scene;
pub mod zone_labeling;

use std::path::PathBuf;

/// A color lookup table offered for selection in the GUI.
#[derive(Debug, Clone)]
pub struct LutInfo {
    /// Name shown in the selector (the file stem).
    pub name: String,
    pub full_filepath: PathBuf,
}
