//! Whole-site page data loading.
//!
//! ```text
//! build_pages()
//!     │
//!     ├── collect_pages() ──► every `*.<extension>` under the HTML directory
//!     │
//!     ├── load_page() per page, concurrently on one shared Context
//!     │       (imports shared between pages are read once)
//!     │
//!     └── write_pocket() ──► <output>/<page>.json   (optional)
//! ```

use crate::{
    loader::{Context, Pocket, load_page},
    log,
};
use anyhow::{Context as _, Result, bail};
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::task::JoinSet;
use walkdir::WalkDir;

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Outcome of a build run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// Pages processed
    pub pages: usize,
    /// Pages whose sidecar produced data
    pub with_data: usize,
    /// Pocket files written to the output directory
    pub written: usize,
}

/// Collect page templates with `extension` under `dir`, sorted.
pub fn collect_pages(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut pages: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .filter(|e| e.path().extension() == Some(OsStr::new(extension)))
        .map(walkdir::DirEntry::into_path)
        .collect();
    pages.sort();
    pages
}

/// Load every page under the HTML directory.
///
/// Pages load concurrently and share the context's import cache. With
/// `output`, each pocket is written as pretty JSON mirroring the page's
/// position in the HTML tree. Fails after all pages ran if any page failed.
pub async fn build_pages(
    ctx: Arc<Context>,
    extension: &str,
    output: Option<&Path>,
) -> Result<BuildSummary> {
    let pages = collect_pages(ctx.html_dir(), extension);
    if pages.is_empty() {
        log!("build"; "no `.{extension}` pages in {}", ctx.html_dir().display());
        return Ok(BuildSummary::default());
    }

    let mut tasks = JoinSet::new();
    for page in pages {
        let ctx = Arc::clone(&ctx);
        tasks.spawn(async move {
            let result = load_page(&ctx, &page).await;
            (page, result)
        });
    }

    let mut summary = BuildSummary::default();
    let mut failed = 0usize;

    while let Some(joined) = tasks.join_next().await {
        let (page, result) = joined.context("page task panicked")?;
        summary.pages += 1;

        let pocket = match result {
            Ok(pocket) => pocket,
            Err(err) => {
                log!("error"; "{}: {err}", page.display());
                failed += 1;
                continue;
            }
        };

        if pocket.has_data() {
            summary.with_data += 1;
        }

        if let Some(output) = output {
            let dest = pocket_path(output, ctx.html_dir(), &page)?;
            write_pocket(&dest, &pocket).await?;
            summary.written += 1;
        }
    }

    log!(
        "build";
        "{} pages, {} with data, {} cached entries",
        summary.pages,
        summary.with_data,
        ctx.cache().len()
    );

    if failed > 0 {
        bail!("{failed} of {} pages failed to load", summary.pages);
    }
    Ok(summary)
}

/// `<output>/<page relative to html_dir>.json`
fn pocket_path(output: &Path, html_dir: &Path, page: &Path) -> Result<PathBuf> {
    let rel = page
        .strip_prefix(html_dir)
        .with_context(|| format!("page {} is outside {}", page.display(), html_dir.display()))?;
    Ok(output.join(rel).with_extension("json"))
}

async fn write_pocket(dest: &Path, pocket: &Pocket) -> Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(pocket)?;
    tokio::fs::write(dest, json)
        .await
        .with_context(|| format!("Failed to write {}", dest.display()))
}
