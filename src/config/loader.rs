use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::scrape::DEFAULT_MARKER;

/// Configuration for cmtquery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CMT executable (name on PATH or absolute path)
    pub tool: String,

    /// Shell used to run `(cd <dir>; <tool> ...)`
    pub shell: String,

    /// Marker CMT prefixes its warnings with
    pub warning_marker: String,

    /// Report configuration
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: terminal, json
    pub format: String,

    /// Show cmtpath / root paths in terminal output
    pub show_paths: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool: "cmt".to_string(),
            shell: "sh".to_string(),
            warning_marker: DEFAULT_MARKER.to_string(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
            show_paths: true,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations in `dir`
    pub fn from_default_locations(dir: &Path) -> Result<Self> {
        let default_names = [
            ".cmtquery.yml",
            ".cmtquery.yaml",
            ".cmtquery.toml",
            "cmtquery.yml",
            "cmtquery.yaml",
            "cmtquery.toml",
        ];

        for name in &default_names {
            let path = dir.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }
}
