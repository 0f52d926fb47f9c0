//! Import resolution: named JSON fragments under `<data>/imports/`.
//!
//! Every name in a batch is checked against the sandbox before any file is
//! read. The batch is all-or-nothing: one bad name, unreadable file or
//! malformed fragment fails the whole resolution.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use super::cache::CacheEntry;
use super::context::Context;
use super::error::LoadError;
use super::pocket::ImportMap;
use super::read_json;
use super::sandbox::{ensure_within, resolve};

const ERR_NOT_ARRAY: &str = "Imports should be an Array";
const ERR_NOT_STRING: &str = "Import names should be strings";

/// A validated import: where it lives and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ImportTarget {
    /// Basename without extension, the key in the resulting map
    name: String,
    path: PathBuf,
    key: String,
}

impl ImportTarget {
    fn locate(ctx: &Context, name: &str) -> Result<Self, LoadError> {
        let imports_dir = ctx.imports_dir();
        let path = ensure_within(imports_dir, &resolve(imports_dir, &format!("{name}.json")))?;
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name: stem,
            key: ctx.cache_key(&path),
            path,
        })
    }
}

/// Resolve an `imports` value taken from a page sidecar.
///
/// Fails with [`LoadError::InvalidInput`] unless `imports` is an array of
/// strings. No file is read in that case.
pub async fn resolve_imports(ctx: &Context, imports: &Value) -> Result<ImportMap, LoadError> {
    let Value::Array(items) = imports else {
        return Err(LoadError::invalid_input(ERR_NOT_ARRAY));
    };

    let names = items
        .iter()
        .map(|item| item.as_str().ok_or_else(|| LoadError::invalid_input(ERR_NOT_STRING)))
        .collect::<Result<Vec<_>, _>>()?;

    resolve_names(ctx, &names).await
}

/// Resolve import names in order, consulting and filling the cache.
///
/// Reports one `Loaded` or `Cached` event per name, in input order.
pub async fn resolve_names<S: AsRef<str>>(ctx: &Context, names: &[S]) -> Result<ImportMap, LoadError> {
    let mut imports = ImportMap::new();
    if names.is_empty() {
        return Ok(imports);
    }

    let targets = names
        .iter()
        .map(|name| ImportTarget::locate(ctx, name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    for target in targets {
        let (entry, action) = ctx
            .cache()
            .get_or_load(&target.key, || load_fragment(&target.path))
            .await?;

        ctx.report(action, &target.key);

        // Page keys live under `<data>/pages`; only a foreign cache can collide
        let CacheEntry::Json(value) = entry else {
            return Err(LoadError::invalid_input(format!(
                "Import `{}` is cached as a page",
                target.key
            )));
        };
        imports.insert(target.name, value);
    }

    Ok(imports)
}

async fn load_fragment(path: &Path) -> Result<CacheEntry, LoadError> {
    let value = read_json(path).await?;
    Ok(CacheEntry::Json(Arc::new(value)))
}
