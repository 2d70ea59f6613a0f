//! `taskline.toml` configuration
//!
//! ```toml
//! data_dir = "data"
//!
//! [geometry]
//! chart_width = 1200
//! row_height = 32
//!
//! [render]
//! label_width = 200
//! viewport_width = 900
//! ```
//!
//! Every key is optional. Command-line flags win over file values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use taskline_core::Geometry;
use tracing::debug;

/// Looked up in the working directory when no config path is given
pub const DEFAULT_CONFIG_FILE: &str = "taskline.toml";

/// Used when neither the flag, the environment nor the file names one
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub geometry: Geometry,
    pub render: RenderConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// SVG label column width in pixels
    pub label_width: u32,
    /// Visible chart width used for the initial scroll offset
    pub viewport_width: Option<f64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            label_width: 180,
            viewport_width: None,
        }
    }
}

impl Config {
    /// Load from `path`, or from `./taskline.toml` if it exists, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Data directory: flag or environment first, then the file, then `data`
    pub fn data_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = Config::from_toml_str(
            r#"
            data_dir = "/srv/tasks"

            [geometry]
            chart_width = 1200.0

            [render]
            viewport_width = 900.0
            "#,
        )
        .unwrap();
        assert_eq!(config.geometry.chart_width, 1200.0);
        assert_eq!(config.geometry.row_height, Geometry::default().row_height);
        assert_eq!(config.render.label_width, 180);
        assert_eq!(config.render.viewport_width, Some(900.0));
        assert_eq!(config.data_dir(None), PathBuf::from("/srv/tasks"));
        assert_eq!(config.data_dir(Some("x".into())), PathBuf::from("x"));
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(Config::from_toml_str("colour = \"red\"").is_err());
    }

    #[test]
    fn load_explicit_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[render]\nlabel_width = 240").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.render.label_width, 240);
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/taskline.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
