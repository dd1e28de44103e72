//! Configuration for the procedure dashboard

use anyhow::{Context, Result};
use procedure_core::ColumnSchema;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants;

// =============================================================================
// File-based Configuration (dashboard.toml)
// =============================================================================

/// Configuration loaded from dashboard.toml. Every section is optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Column header overrides
    #[serde(default)]
    pub columns: ColumnSchema,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Export settings
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Directory for CSV exports
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| {
            "Invalid dashboard config. Check for:\n\
             - Invalid TOML syntax (missing quotes, brackets, etc.)\n\
             - Column names that are not strings\n\n\
             See dashboard.toml.example for the expected format."
        })
    }

    /// Resolve the config to use.
    ///
    /// An explicit path must exist. Without one, `dashboard.toml` in the
    /// working directory is used when present, defaults otherwise.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!(
                        "Config file '{}' not found.\n\n\
                        Copy dashboard.toml.example to create one, or omit --config\n\
                        to use the default column names.",
                        path.display()
                    );
                }
                Self::load(path)
            }
            None => {
                let default_path = Path::new(constants::CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Export directory: CLI flag, then config, then `./output`
    pub fn output_dir(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.output.dir.clone())
            .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_OUTPUT_DIR))
    }
}
