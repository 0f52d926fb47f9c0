//! Loader configuration from `sidecar.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                           |
//! |-------------|---------------------------------------------------|
//! | `[source]`  | HTML and data directories, page extension         |
//! | `[data]`    | Key page data is exposed under                    |
//! | `[report]`  | Loaded/Cached reporting and its locale            |
//!
//! # Example
//!
//! ```toml
//! [source]
//! root = "src"
//!
//! [data]
//! entry = "$"
//!
//! [report]
//! enable = true
//! locale = "en-US"
//! ```
//!
//! Without `sidecar.toml`, options are read from `package.json` (see
//! [`PackageOptions`]); otherwise defaults apply.

mod data;
pub mod defaults;
mod error;
mod package;
mod report;
mod source;

pub use data::DataConfig;
pub use error::ConfigError;
pub use package::PackageOptions;
pub use report::ReportConfig;
pub use source::SourceConfig;

use crate::cli::Cli;
use crate::loader::FILENAME_KEY;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Name of the package manifest consulted when no config file exists.
pub const PACKAGE_MANIFEST: &str = "package.json";

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing sidecar.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SidecarConfig {
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Template and data directories
    #[serde(default)]
    pub source: SourceConfig,

    /// Page data exposure
    #[serde(default)]
    pub data: DataConfig,

    /// Cache hit/miss reporting
    #[serde(default)]
    pub report: ReportConfig,
}

impl SidecarConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SidecarConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load defaults overlaid with options from a `package.json`.
    pub fn from_package(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let options = PackageOptions::from_manifest(&content)
            .map_err(|err| ConfigError::Json(path.to_path_buf(), err))?;

        let mut config = Self::default();
        if let Some(options) = options {
            options.apply(&mut config);
            config.config_path = Some(path.to_path_buf());
        }
        Ok(config)
    }

    /// Load configuration for the project at `root`.
    ///
    /// Tries `<root>/<config_name>`, then `<root>/package.json`, then defaults.
    pub fn load(root: &Path, config_name: &Path) -> Result<Self> {
        let config_path = root.join(config_name);
        if config_path.is_file() {
            return Self::from_path(&config_path);
        }

        let manifest = root.join(PACKAGE_MANIFEST);
        if manifest.is_file() {
            return Self::from_package(&manifest);
        }

        Ok(Self::default())
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        Self::update_option(&mut self.source.root, cli.source.as_ref());
        if cli.html.is_some() {
            self.source.html = cli.html.clone();
        }
        if cli.data.is_some() {
            self.source.data = cli.data.clone();
        }
        Self::update_option(&mut self.data.entry, cli.entry.as_ref());
        Self::update_option(&mut self.report.locale, cli.locale.as_ref());
        if cli.quiet {
            self.report.enable = false;
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration values.
    ///
    /// Directory containment is checked when the loader context is built.
    pub fn validate(&self) -> Result<()> {
        let entry = &self.data.entry;
        if entry.is_empty() {
            bail!(ConfigError::Validation("[data.entry] must not be empty".into()));
        }
        if entry == FILENAME_KEY {
            bail!(ConfigError::Validation(format!(
                "[data.entry] must not be `{FILENAME_KEY}`"
            )));
        }

        let extension = &self.source.extension;
        if extension.is_empty() || extension.starts_with('.') {
            bail!(ConfigError::Validation(
                "[source.extension] must be a bare extension like `pug`".into()
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_from_str() {
        let config = SidecarConfig::from_str(
            r#"
            [source]
            root = "site"

            [data]
            entry = "$"
        "#,
        )
        .unwrap();

        assert_eq!(config.source.root, "site");
        assert_eq!(config.data.entry, "$");
        assert!(config.report.enable);
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = SidecarConfig::from_str("[source\nroot = 1");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_top_level_field_rejection() {
        let result = SidecarConfig::from_str("[build]\noutput = \"dist\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_default() {
        let config = SidecarConfig::default();

        assert_eq!(config.config_path, None);
        assert_eq!(config.source.root, "src");
        assert_eq!(config.source.extension, "pug");
        assert_eq!(config.data.entry, "data");
        assert!(config.report.enable);
        assert_eq!(config.report.locale, "en-EN");
    }

    #[test]
    fn test_load_prefers_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sidecar.toml"), "[data]\nentry = \"$\"").unwrap();
        fs::write(
            dir.path().join(PACKAGE_MANIFEST),
            r#"{"name": "site", "site": {"dataEntry": "pkg"}}"#,
        )
        .unwrap();

        let config = SidecarConfig::load(dir.path(), Path::new("sidecar.toml")).unwrap();

        assert_eq!(config.data.entry, "$");
        assert_eq!(config.config_path, Some(dir.path().join("sidecar.toml")));
    }

    #[test]
    fn test_load_falls_back_to_package_json() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PACKAGE_MANIFEST),
            r#"{"name": "site", "site": {"sourcePath": "source", "report": false}}"#,
        )
        .unwrap();

        let config = SidecarConfig::load(dir.path(), Path::new("sidecar.toml")).unwrap();

        assert_eq!(config.source.root, "source");
        assert!(!config.report.enable);
    }

    #[test]
    fn test_load_defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let config = SidecarConfig::load(dir.path(), Path::new("sidecar.toml")).unwrap();
        assert_eq!(config.config_path, None);
        assert_eq!(config.data.entry, "data");
    }

    #[test]
    fn test_load_reports_broken_manifest() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PACKAGE_MANIFEST), "{").unwrap();

        let err = SidecarConfig::load(dir.path(), Path::new("sidecar.toml")).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn test_update_with_cli() {
        let cli = Cli::parse_from([
            "sidecar", "--source", "site", "--data", "/json", "--entry", "$", "--quiet", "check",
        ]);
        let mut config = SidecarConfig::default();
        config.update_with_cli(&cli);

        assert_eq!(config.source.root, "site");
        assert_eq!(config.source.html, None);
        assert_eq!(config.source.data.as_deref(), Some("/json"));
        assert_eq!(config.data.entry, "$");
        assert!(!config.report.enable);
    }

    #[test]
    fn test_validate() {
        let mut config = SidecarConfig::default();
        assert!(config.validate().is_ok());

        config.data.entry = String::new();
        assert!(config.validate().is_err());

        config.data.entry = "filename".into();
        assert!(config.validate().is_err());

        config.data.entry = "data".into();
        config.source.extension = ".pug".into();
        assert!(config.validate().is_err());
    }
}
