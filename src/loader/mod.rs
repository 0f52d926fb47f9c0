//! Page data loading with shared, memoized imports.
//!
//! Each page template may have a JSON sidecar under `<data>/pages/`. A sidecar
//! can pull in named fragments from `<data>/imports/`, which are read once per
//! run and shared by every page that imports them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              load_page()                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  page path ──► Sidecar::locate ──► sandbox check ──► cache hit? ──► ✓   │
//! │                                                        │                │
//! │                                                        ▼ miss           │
//! │                                     read + parse <data>/pages/*.json    │
//! │                                                        │                │
//! │                                                        ▼ "imports"      │
//! │                      resolve_imports ──► per name: sandbox, cache,      │
//! │                                          single-flight read             │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                          Pocket { filename, <entry>: data + imports }   │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                                              ImportCache::set           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Layout
//!
//! | Path                              | Content                              |
//! |-----------------------------------|--------------------------------------|
//! | `<data>/pages/<page>.json`        | `{ "data": {...}, "imports": [...] }`|
//! | `<data>/imports/<name>.json`      | any JSON value                       |

mod cache;
mod context;
mod error;
mod imports;
mod page;
mod pocket;
mod report;
pub mod sandbox;

use std::path::Path;

use serde_json::Value;

pub use cache::{Action, CacheEntry, ImportCache};
pub use context::{Context, IMPORTS_DIR, PAGES_DIR};
pub use error::{ErrorKind, LoadError};
pub use imports::{resolve_imports, resolve_names};
pub use page::{Sidecar, load_page};
pub use pocket::{FILENAME_KEY, IMPORTS_KEY, ImportMap, PageData, Pocket};
pub use report::{ConsoleReporter, Report, Reporter};

/// Read and parse a JSON file.
pub(crate) async fn read_json(path: &Path) -> Result<Value, LoadError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Temporary project trees for loader tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::Context;
    pub use super::report::RecordingReporter;
    use crate::config::SidecarConfig;

    pub const ABOUT: &str = r#"{
        "data": { "name": "About Us", "href": "about-us.html", "visible": true },
        "imports": ["genres"]
    }"#;

    pub const GENRES: &str = r##"[{ "href": "#href1", "name": "Caption1" }]"##;

    pub const MENU: &str = r#"[
        { "href": "index.html", "name": "Home" },
        { "href": "about-us.html", "name": "About Us" }
    ]"#;

    pub const CATALOG: &str = r#"{ "title": "Catalog", "items": [1, 2, 3] }"#;

    /// A project root with `src/html` and `src/data` populated.
    pub struct Project {
        pub dir: TempDir,
        pub ctx: Context,
        pub reporter: Arc<RecordingReporter>,
    }

    impl Project {
        pub fn new() -> Self {
            Self::with_config("")
        }

        pub fn with_config(toml: &str) -> Self {
            let dir = TempDir::new().unwrap();
            let config = SidecarConfig::from_str(toml).unwrap();

            let reporter = Arc::new(RecordingReporter::default());
            let ctx = Context::new(dir.path(), &config)
                .unwrap()
                .with_reporter(reporter.clone());

            fs::create_dir_all(ctx.html_dir()).unwrap();
            let project = Self { dir, ctx, reporter };

            let data = project.ctx.data_dir().to_path_buf();
            for (rel, content) in [
                ("pages/about.json", ABOUT),
                ("imports/genres.json", GENRES),
                ("imports/menu.json", MENU),
                ("imports/catalog/catalog_1.json", CATALOG),
            ] {
                write_file(&data.join(rel), content);
            }
            project
        }

        /// Absolute path of `rel` inside the project root.
        pub fn path(&self, rel: &str) -> PathBuf {
            self.ctx.root().join(rel)
        }

        /// Absolute path of a page template inside the HTML directory.
        pub fn page(&self, rel: &str) -> PathBuf {
            self.ctx.html_dir().join(rel)
        }

        pub fn write(&self, rel: &str, content: &str) {
            write_file(&self.path(rel), content);
        }
    }

    fn write_file(path: &std::path::Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}
