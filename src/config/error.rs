use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading or checking `sidecar.toml` / `package.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid sidecar.toml")]
    Toml(#[from] toml::de::Error),

    #[error("invalid package manifest `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("invalid option: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_messages_name_the_file() {
        let missing = ConfigError::Io(
            PathBuf::from("sidecar.toml"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert_eq!(missing.to_string(), "cannot read `sidecar.toml`");

        let broken = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let manifest = ConfigError::Json(PathBuf::from("package.json"), broken);
        assert_eq!(manifest.to_string(), "invalid package manifest `package.json`");
    }

    #[test]
    fn test_validation_message() {
        let err = ConfigError::Validation("[data.entry] must not be empty".into());
        assert_eq!(err.to_string(), "invalid option: [data.entry] must not be empty");
    }
}
