//! Output file naming.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::paths::safe_dir_name;

/// Prefix of every generated graph file.
pub const OUTPUT_FILE_PREFIX: &str = "ptg_route_structure";

/// `<output_dir>/<safe project dir>/ptg_route_structure_<YYYYmmdd_HHMMSS>.json`
pub fn ptg_output_path(output_dir: &Path, project_name: &str, timestamp: &NaiveDateTime) -> PathBuf {
    output_dir
        .join(safe_dir_name(project_name, "default"))
        .join(format!(
            "{OUTPUT_FILE_PREFIX}_{}.json",
            timestamp.format("%Y%m%d_%H%M%S")
        ))
}
