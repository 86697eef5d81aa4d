//! Run reports and their plain-text rendering.

use camino::{Utf8Path, Utf8PathBuf};
use diffy::PatchFormatter;
use std::collections::BTreeMap;

pub const DRY_RUN_BANNER: &str = "DRY RUN - no files will be modified";

/// One rewritten file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: Utf8PathBuf,
    pub fixes: usize,
    pub by_rule: BTreeMap<&'static str, usize>,
    /// False in dry-run mode.
    pub written: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub dry_run: bool,
    pub files_scanned: usize,
    /// Files with at least one fix, in processing order.
    pub files: Vec<FileReport>,
    /// Unified diff of every changed file, when requested.
    pub patch: Option<String>,
}

impl RunReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn total_fixes(&self) -> usize {
        self.files.iter().map(|f| f.fixes).sum()
    }

    /// Fix counts summed per rule id across all files.
    pub fn totals_by_rule(&self) -> BTreeMap<&'static str, usize> {
        let mut totals = BTreeMap::new();
        for file in &self.files {
            for (rule, n) in &file.by_rule {
                *totals.entry(*rule).or_insert(0) += n;
            }
        }
        totals
    }
}

/// Human-readable run summary: optional banner, one line per rewritten file, then the total.
pub fn render_summary(report: &RunReport) -> String {
    let mut out = String::new();
    if report.dry_run {
        out.push_str(DRY_RUN_BANNER);
        out.push_str("\n\n");
    }
    for file in &report.files {
        out.push_str(&format!("{}: {} fixes\n", file.path, file.fixes));
    }
    out.push_str(&format!("\nTotal: {} fixes", report.total_fixes()));
    if report.dry_run {
        out.push_str(" (dry run)");
    }
    out.push('\n');
    out
}

/// Unified diff for one file, with git-style headers.
pub fn render_file_patch(path: &Utf8Path, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

    let patch = diffy::create_patch(before, after);
    let body = PatchFormatter::new().fmt_patch(&patch).to_string();
    // diffy repeats its own `---`/`+++` header; keep only the hunks.
    let hunks = body
        .find("\n@@")
        .map(|idx| &body[idx + 1..])
        .unwrap_or(body.as_str());
    out.push_str(hunks);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
