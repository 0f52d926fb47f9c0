//! Options embedded in `package.json`.
//!
//! Projects driven by a JavaScript toolchain can keep their options in the
//! package manifest, under a key equal to the package's own name:
//!
//! ```json
//! {
//!   "name": "my-site",
//!   "my-site": { "sourcePath": "src", "dataEntry": "$", "report": false }
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;

use super::SidecarConfig;

/// camelCase options read from the manifest. Unknown keys are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageOptions {
    pub source_path: Option<String>,
    pub path_html: Option<String>,
    pub path_data: Option<String>,
    pub data_entry: Option<String>,
    pub locales: Option<String>,
    pub report: Option<bool>,
}

impl PackageOptions {
    /// Extract options from manifest text.
    ///
    /// Returns `None` when the manifest has no `name` or no section under it.
    pub fn from_manifest(content: &str) -> Result<Option<Self>, serde_json::Error> {
        let manifest: Value = serde_json::from_str(content)?;
        let Some(section) = manifest
            .get("name")
            .and_then(Value::as_str)
            .and_then(|name| manifest.get(name))
        else {
            return Ok(None);
        };
        Self::deserialize(section).map(Some)
    }

    /// Overlay these options onto `config`.
    pub fn apply(self, config: &mut SidecarConfig) {
        let Self {
            source_path,
            path_html,
            path_data,
            data_entry,
            locales,
            report,
        } = self;

        if let Some(root) = source_path {
            config.source.root = root;
        }
        config.source.html = path_html.or(config.source.html.take());
        config.source.data = path_data.or(config.source.data.take());
        if let Some(entry) = data_entry {
            config.data.entry = entry;
        }
        if let Some(locale) = locales {
            config.report.locale = locale;
        }
        if let Some(enable) = report {
            config.report.enable = enable;
        }
    }
}
