//! Path sandboxing for every file the loader touches.
//!
//! Paths are resolved lexically (no symlink resolution, no filesystem access)
//! and then checked against an anchor directory. A path that leaves its anchor
//! is a [`LoadError::SandboxViolation`], never a missing file.
//!
//! # Example
//!
//! ```ignore
//! let root = Path::new("/project");
//!
//! resolve(root, "src/data")      // → /project/src/data
//! resolve(root, "/src/data")     // → /project/src/data (leading `/` = project root)
//! resolve(root, "../elsewhere")  // → /elsewhere, rejected by `ensure_within`
//! ```

use std::path::{Component, Path, PathBuf};

use super::error::LoadError;

/// Resolve `segment` against `base` and normalize the result.
///
/// A leading `/` does not mean the filesystem root: `"/data"` is treated
/// as `"./data"`, relative to `base`.
pub fn resolve(base: &Path, segment: &str) -> PathBuf {
    let segment = segment.trim_start_matches('/');
    normalize(&base.join(segment))
}

/// Lexically normalize a path, folding `.` and `..` components.
///
/// `..` above the filesystem root stays at the root; on relative paths
/// leading `..` components are preserved.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }

    out
}

/// Check whether `candidate` lies inside `root` (or is `root` itself).
///
/// Both paths are normalized first. The comparison is component-wise, so
/// `/project-other` is not inside `/project`.
pub fn is_within(root: &Path, candidate: &Path) -> bool {
    normalize(candidate).starts_with(normalize(root))
}

/// Normalize `candidate` and fail unless it stays inside `root`.
pub fn ensure_within(root: &Path, candidate: &Path) -> Result<PathBuf, LoadError> {
    let resolved = normalize(candidate);
    if resolved.starts_with(normalize(root)) {
        Ok(resolved)
    } else {
        Err(LoadError::SandboxViolation(resolved))
    }
}

/// Root-relative key for `path`, always `/`-separated.
///
/// Paths outside `root` keep their full form; callers check containment
/// before deriving a key.
pub fn relative_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
