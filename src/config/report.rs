//! `[report]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[report]` section in sidecar.toml - per-file Loaded/Cached lines.
///
/// # Example
/// ```toml
/// [report]
/// enable = true
/// locale = "en-US"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,

    /// BCP 47 locale used for report timestamps.
    #[serde(default = "defaults::report::locale")]
    #[educe(Default = defaults::report::locale())]
    pub locale: String,
}
