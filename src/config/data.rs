//! `[data]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[data]` section in sidecar.toml.
///
/// # Example
/// ```toml
/// [data]
/// entry = "$"   # templates read page data from `$`
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// Key page data is exposed under on each pocket.
    #[serde(default = "defaults::data::entry")]
    #[educe(Default = defaults::data::entry())]
    pub entry: String,
}

#[cfg(test)]
mod tests {
    use super::super::SidecarConfig;

    #[test]
    fn test_data_config_default() {
        let config: SidecarConfig = toml::from_str("[data]").unwrap();
        assert_eq!(config.data.entry, "data");
    }

    #[test]
    fn test_data_config_custom_entry() {
        let config: SidecarConfig = toml::from_str("[data]\nentry = \"$Data\"").unwrap();
        assert_eq!(config.data.entry, "$Data");
    }
}
