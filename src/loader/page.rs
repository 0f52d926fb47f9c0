//! Page loading: sidecar JSON + imports → [`Pocket`].
//!
//! ```text
//! <html>/blog/post.pug ──► <data>/pages/blog/post.json ──► Pocket
//!                                    │
//!                                    └── "imports": [...] ──► resolve_imports
//! ```
//!
//! A missing or malformed sidecar is not an error: the page simply has no
//! data. Failures while resolving declared imports are reported and also
//! yield the bare pocket, except sandbox violations, which are returned.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::cache::{Action, CacheEntry};
use super::context::Context;
use super::error::{ErrorKind, LoadError};
use super::imports::resolve_imports;
use super::pocket::{IMPORTS_KEY, PageData, Pocket};
use super::read_json;
use super::sandbox::{ensure_within, normalize};

const DATA_KEY: &str = "data";
const ERR_DATA_NOT_OBJECT: &str = "Page data should be an Object";

/// Location of a page's sidecar file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidecar {
    /// Page name (file stem of the page source)
    pub filename: String,
    pub path: PathBuf,
    pub key: String,
}

impl Sidecar {
    /// Map a page source path onto `<data>/pages/`, swapping the extension
    /// for `.json`.
    ///
    /// Relative paths are taken relative to the HTML directory. Absolute
    /// paths must lie inside it.
    pub fn locate(ctx: &Context, page: &Path) -> Result<Self, LoadError> {
        let rel = if page.is_absolute() {
            let page = normalize(page);
            page.strip_prefix(ctx.html_dir())
                .map(Path::to_path_buf)
                .map_err(|_| LoadError::SandboxViolation(page.clone()))?
        } else {
            page.to_path_buf()
        };

        let pages_dir = ctx.pages_dir();
        let path = ensure_within(pages_dir, &pages_dir.join(rel.with_extension("json")))?;
        let filename = page
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            filename,
            key: ctx.cache_key(&path),
            path,
        })
    }
}

/// Load the pocket for the page at `page`.
///
/// Returns a cached pocket verbatim when the sidecar was assembled before.
/// Only sandbox violations are returned as errors; every other failure
/// yields a pocket without data.
pub async fn load_page(ctx: &Context, page: impl AsRef<Path>) -> Result<Arc<Pocket>, LoadError> {
    let sidecar = Sidecar::locate(ctx, page.as_ref()).inspect_err(|err| {
        ctx.reporter().error(&err.to_string());
    })?;

    if let Some(CacheEntry::Page(pocket)) = ctx.cache().get(&sidecar.key) {
        ctx.report(Action::Cached, &sidecar.key);
        return Ok(pocket);
    }

    let pocket = Pocket::new(sidecar.filename.as_str(), ctx.entry());

    // Pages without a readable sidecar are valid and carry no data
    let Ok(raw) = read_json(&sidecar.path).await else {
        return Ok(Arc::new(pocket));
    };

    ctx.report(Action::Loaded, &sidecar.key);

    let pocket = match assemble(ctx, pocket.clone(), raw).await {
        Ok(assembled) => Arc::new(assembled),
        Err(err) if err.kind() == ErrorKind::SandboxViolation => {
            ctx.reporter().error(&err.to_string());
            return Err(err);
        }
        Err(err) => {
            ctx.reporter().error(&err.to_string());
            return Ok(Arc::new(pocket));
        }
    };

    // Concurrent loads of one page may both get here; the values are equal
    ctx.cache().set(sidecar.key, CacheEntry::Page(Arc::clone(&pocket)));
    Ok(pocket)
}

/// Attach page data when the sidecar declares `imports`.
async fn assemble(ctx: &Context, pocket: Pocket, raw: Value) -> Result<Pocket, LoadError> {
    let Value::Object(mut sidecar) = raw else {
        return Ok(pocket);
    };
    let Some(imports) = sidecar.remove(IMPORTS_KEY) else {
        return Ok(pocket);
    };

    let fields = match sidecar.remove(DATA_KEY) {
        None => Map::new(),
        Some(Value::Object(fields)) => fields,
        Some(_) => return Err(LoadError::invalid_input(ERR_DATA_NOT_OBJECT)),
    };

    let imports = resolve_imports(ctx, &imports).await?;
    Ok(pocket.with_data(PageData::new(fields, imports)))
}
