//! Per-run loader state: resolved directories, shared cache and reporter.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::cache::{Action, ImportCache};
use super::error::LoadError;
use super::report::{ConsoleReporter, Report, Reporter};
use super::sandbox::{is_within, normalize, relative_key, resolve};
use crate::config::SidecarConfig;

/// Sub-directory of the data tree holding page sidecars.
pub const PAGES_DIR: &str = "pages";
/// Sub-directory of the data tree holding import fragments.
pub const IMPORTS_DIR: &str = "imports";

/// Loader context, built once per run and shared by every page load.
///
/// The cache is owned by the context rather than global, so tests and
/// parallel builds get isolated instances. Use [`Context::with_cache`] to
/// share one cache between contexts. Clones share the cache and reporter.
#[derive(Clone)]
pub struct Context {
    root: PathBuf,
    html_dir: PathBuf,
    data_dir: PathBuf,
    pages_dir: PathBuf,
    imports_dir: PathBuf,
    entry: String,
    cache: Arc<ImportCache>,
    reporter: Arc<dyn Reporter>,
    /// Loaded/Cached events; errors always reach the reporter
    report_actions: bool,
}

impl Context {
    /// Resolve configured directories against `root`.
    ///
    /// Fails with [`LoadError::SandboxViolation`] when the HTML or data
    /// directory resolves outside `root`.
    pub fn new(root: impl AsRef<Path>, config: &SidecarConfig) -> Result<Self, LoadError> {
        let root = absolute_root(root.as_ref())?;
        let source = &config.source;

        let html_dir = match &source.html {
            Some(html) => resolve(&root, html),
            None => resolve(&root, &source.root).join("html"),
        };
        let data_dir = match &source.data {
            Some(data) => resolve(&root, data),
            None => resolve(&root, &source.root).join("data"),
        };

        for dir in [&html_dir, &data_dir] {
            if !is_within(&root, dir) {
                return Err(LoadError::SandboxViolation(dir.clone()));
            }
        }


        Ok(Self {
            pages_dir: data_dir.join(PAGES_DIR),
            imports_dir: data_dir.join(IMPORTS_DIR),
            root,
            html_dir,
            data_dir,
            entry: config.data.entry.clone(),
            cache: Arc::default(),
            reporter: Arc::new(ConsoleReporter::new(config.report.locale.as_str())),
            report_actions: config.report.enable,
        })
    }

    pub fn with_cache(mut self, cache: Arc<ImportCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn html_dir(&self) -> &Path {
        &self.html_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    pub fn imports_dir(&self) -> &Path {
        &self.imports_dir
    }

    /// Key page data is exposed under on each pocket.
    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn cache(&self) -> &ImportCache {
        &self.cache
    }

    pub fn shared_cache(&self) -> Arc<ImportCache> {
        Arc::clone(&self.cache)
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    /// Project-relative cache key for `path`.
    pub fn cache_key(&self, path: &Path) -> String {
        relative_key(&self.root, path)
    }

    pub(crate) fn report(&self, action: Action, key: &str) {
        if self.report_actions {
            self.reporter.action(&Report::new(action, key));
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.root)
            .field("html_dir", &self.html_dir)
            .field("data_dir", &self.data_dir)
            .field("entry", &self.entry)
            .field("report_actions", &self.report_actions)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Make `root` absolute without touching symlinks.
fn absolute_root(root: &Path) -> Result<PathBuf, LoadError> {
    if root.is_absolute() {
        return Ok(normalize(root));
    }
    let cwd = std::env::current_dir().map_err(|source| LoadError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(normalize(&cwd.join(root)))
}
