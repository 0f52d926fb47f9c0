//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [source] Section Defaults
// ============================================================================

pub mod source {
    pub fn root() -> String {
        "src".into()
    }

    pub fn extension() -> String {
        "pug".into()
    }
}

// ============================================================================
// [data] Section Defaults
// ============================================================================

pub mod data {
    pub fn entry() -> String {
        "data".into()
    }
}

// ============================================================================
// [report] Section Defaults
// ============================================================================

pub mod report {
    pub fn locale() -> String {
        "en-EN".into()
    }
}
