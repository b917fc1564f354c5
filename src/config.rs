use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Result;

/// Optional settings read from `campaign-import.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ImportConfig {
    pub log_level: Option<String>,
    pub format: Option<String>,
    pub quiet: Option<bool>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("campaign-import.toml")
}

pub fn load_config(path: Option<&Path>) -> Result<Option<ImportConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: ImportConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}
