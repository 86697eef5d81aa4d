//! Source discovery: which `.gd` files a run touches.

use crate::error::{CoreError, CoreResult};
use crate::settings::{ScanSettings, SCRIPT_EXTENSION};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use glob::glob;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Find every script under the scan roots, as paths relative to `project_root`, sorted.
///
/// Roots that do not exist contribute nothing. Files reachable from more than one root are
/// listed once.
pub fn discover_sources(
    project_root: &Utf8Path,
    scan: &ScanSettings,
) -> CoreResult<Vec<Utf8PathBuf>> {
    // glob drops leading `.` components from what it yields, so strip them up front to keep
    // `strip_prefix` below lined up.
    let base: Utf8PathBuf = project_root
        .components()
        .filter(|c| !matches!(c, Utf8Component::CurDir))
        .collect();

    let mut found = BTreeSet::new();
    for root in &scan.roots {
        let root = root.trim_matches('/');
        let prefix = if base.as_str().is_empty() {
            String::new()
        } else {
            format!("{}/", glob::Pattern::escape(base.as_str()))
        };
        let pattern = format!("{prefix}{root}/**/*.{SCRIPT_EXTENSION}");
        debug!(pattern = %pattern, "scanning for sources");

        let entries = glob(&pattern).map_err(|source| CoreError::InvalidRoot {
            root: root.to_string(),
            source,
        })?;

        for entry in entries {
            let path = entry.map_err(|e| {
                let path = Utf8PathBuf::from(e.path().to_string_lossy().as_ref());
                CoreError::Io {
                    path,
                    source: std::io::Error::from(e),
                }
            })?;
            let path = match Utf8PathBuf::from_path_buf(path) {
                Ok(p) => p,
                Err(p) => {
                    warn!(path = %p.display(), "skipping non-UTF-8 path");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let rel = path
                .strip_prefix(&base)
                .map(Utf8Path::to_path_buf)
                .unwrap_or(path);
            if is_excluded(&rel, scan) {
                debug!(path = %rel, "excluded");
                continue;
            }
            found.insert(rel);
        }
    }

    Ok(found.into_iter().collect())
}

/// True when `rel` looks like a test file or lives under a test-framework directory.
pub fn is_excluded(rel: &Utf8Path, scan: &ScanSettings) -> bool {
    let lowered = rel.as_str().replace('\\', "/").to_lowercase();
    if scan
        .exclude_substrings
        .iter()
        .any(|s| lowered.contains(&s.to_lowercase()))
    {
        return true;
    }

    let Some(parent) = rel.parent() else {
        return false;
    };
    parent.components().any(|c| match c {
        Utf8Component::Normal(name) => scan.exclude_dirs.iter().any(|d| d == name),
        _ => false,
    })
}

/// True when `rel` is a script under one of the scan roots.
pub fn is_candidate(rel: &Utf8Path, scan: &ScanSettings) -> bool {
    rel.extension() == Some(SCRIPT_EXTENSION)
        && scan
            .roots
            .iter()
            .any(|root| rel.starts_with(root.trim_matches('/')))
}
