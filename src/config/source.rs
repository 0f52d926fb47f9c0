//! `[source]` section configuration.
//!
//! Where page templates and their data live, relative to the project root.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[source]` section in sidecar.toml.
///
/// # Example
/// ```toml
/// [source]
/// root = "src"        # html = <root>/html, data = <root>/data
/// data = "content"    # explicit override
/// extension = "pug"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Common parent of the HTML and data directories.
    /// A leading `/` means the project root.
    #[serde(default = "defaults::source::root")]
    #[educe(Default = defaults::source::root())]
    pub root: String,

    /// Page template directory, overrides `<root>/html`.
    #[serde(default)]
    pub html: Option<String>,

    /// Data directory, overrides `<root>/data`.
    #[serde(default)]
    pub data: Option<String>,

    /// Extension of page templates collected by `build`.
    #[serde(default = "defaults::source::extension")]
    #[educe(Default = defaults::source::extension())]
    pub extension: String,
}
