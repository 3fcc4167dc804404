// ~/src/data_loaders/yaml.rs

use std::{fs, path::Path};

use serde_yaml::Value;

use crate::{warn, DEBUG_NAME};

/// Load a YAML document, or None if the file is missing or malformed.
/// A missing config is normal; a broken one is worth a log line.
pub fn load_yaml(path: &Path) -> Option<Value> {
    let txt = fs::read_to_string(path).ok()?;
    match serde_yaml::from_str(&txt) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("[{}][CONFIG] Failed to parse {}: {e}", DEBUG_NAME, path.display());
            None
        }
    }
}
