//! Serialization methods for PtgMemory.

use std::path::{Path, PathBuf};

use super::PtgMemory;
use crate::runtime::Runtime;
use crate::{Error, Result};

impl PtgMemory {
    /// The graph as a JSON value, pages and edges in insertion order.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(&self.ptg)
            .map_err(|e| Error::Serialization(format!("Failed to serialize PTG: {e}")))
    }

    /// Pretty-printed JSON of the graph. Non-ASCII text is kept as is.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.ptg)
            .map_err(|e| Error::Serialization(format!("Failed to serialize PTG: {e}")))
    }

    /// Write the graph to `path`, creating parent directories as needed.
    pub async fn save_json(&self, runtime: &dyn Runtime, path: &Path) -> Result<PathBuf> {
        let json = self.to_json()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !runtime.exists(parent) {
                runtime.create_dir(parent, true).await?;
            }
        }

        runtime.write_file(path, json.as_bytes()).await?;
        Ok(path.to_path_buf())
    }
}
