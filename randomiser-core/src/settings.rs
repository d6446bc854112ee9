use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::{RandomiserError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomiserSettings {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    #[serde(default)]
    pub randomize: Vec<String>,
    // Drawn at random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub stop_on_error: bool,
    #[serde(default)]
    pub debug: bool,
}

impl RandomiserSettings {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            randomize: Vec::new(),
            seed: None,
            stop_on_error: false,
            debug: false,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| {
            RandomiserError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&data).map_err(|e| {
            RandomiserError::Config(format!("malformed config {}: {e}", path.display()))
        })
    }
}
