use std::path::Path;

use crate::foundation::error::{YardError, YardResult};

/// Config file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.json`
    Json,
    /// `.yml` / `.yaml`
    Yaml,
}

impl ConfigFormat {
    /// Format for `path`, or `None` for unsupported extensions.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yml" | "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Parse config text into a dynamic document.
pub fn parse_config(text: &str, format: ConfigFormat) -> Result<serde_json::Value, String> {
    match format {
        ConfigFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
    }
}

/// Read and parse a JSON or YAML config file without interpreting it.
#[tracing::instrument]
pub fn load_config(path: &Path) -> YardResult<serde_json::Value> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| {
        YardError::config(format!(
            "unsupported config file format: {}. Use .json or .yaml.",
            path.display()
        ))
    })?;

    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(YardError::config(format!(
                "config file not found at: {}",
                path.display()
            )));
        }
        Err(e) => {
            return Err(YardError::config(format!(
                "cannot read config file '{}': {e}",
                path.display()
            )));
        }
    };

    parse_config(&text, format).map_err(|e| {
        YardError::config(format!(
            "error parsing config file '{}': {e}",
            path.display()
        ))
    })
}
