use std::fs;
use std::path::Path;

use tracker_types::ProcessorConfig;

use crate::error::{Result, TrackerError};

const APP_NAME: &str = "tracker";
const CONFIG_NAME: &str = "processor";

/// Load processor settings.
///
/// With an explicit path the file must exist and parse. Without one, settings
/// come from the user config directory, falling back to defaults when that
/// file is missing or unreadable.
pub fn load_config(path: Option<&Path>) -> Result<ProcessorConfig> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            parse_config(&content, path)
        }
        None => Ok(confy::load(APP_NAME, CONFIG_NAME).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load user config, using defaults");
            ProcessorConfig::default()
        })),
    }
}

fn parse_config(content: &str, path: &Path) -> Result<ProcessorConfig> {
    toml::from_str(content).map_err(|source| TrackerError::Config {
        path: path.to_path_buf(),
        source,
    })
}
