//! The rewrite pipeline, extracted from the CLI.
//!
//! I/O-agnostic: every read, write, and directory scan goes through a [`SourceStore`].

use crate::error::{CoreError, CoreResult};
use crate::ports::SourceStore;
use crate::report::{render_file_patch, FileReport, RunReport};
use crate::settings::RunSettings;
use camino::Utf8PathBuf;
use castfix_rewrite::{RewriteOutcome, Rewriter};
use tracing::{debug, info};

/// One script's text before and after rewriting.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: Utf8PathBuf,
    pub original: String,
    pub outcome: RewriteOutcome,
}

impl SourceFile {
    /// Run both passes over `original`.
    pub fn rewrite(path: Utf8PathBuf, original: String, rewriter: &Rewriter) -> Self {
        let outcome = rewriter.rewrite(&original);
        Self {
            path,
            original,
            outcome,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.outcome.changed(&self.original)
    }

    pub fn rewritten(&self) -> &str {
        &self.outcome.text
    }
}

/// Discover, rewrite, and (unless dry-run) write back every candidate script.
///
/// Files are processed in sorted order. The first I/O failure aborts the run; files already
/// written stay written.
pub fn run(settings: &RunSettings, store: &dyn SourceStore) -> CoreResult<RunReport> {
    let rewriter = Rewriter::new(&settings.rewrite)?;
    debug!(rules = ?rewriter.rule_ids(), "compiled rewrite rules");
    let files = store.discover(&settings.scan).map_err(into_core)?;
    info!(
        root = %settings.project_root,
        files = files.len(),
        dry_run = settings.dry_run,
        "discovered sources"
    );

    let mut report = RunReport::new(settings.dry_run);
    let mut patch = settings.collect_patch.then(String::new);

    for rel in files {
        let original = store.read(&rel).map_err(into_core)?;
        let source = SourceFile::rewrite(rel, original, &rewriter);
        report.files_scanned += 1;

        if !source.is_changed() {
            debug!(path = %source.path, "no matches");
            continue;
        }

        if let Some(patch) = patch.as_mut() {
            patch.push_str(&render_file_patch(
                &source.path,
                &source.original,
                source.rewritten(),
            ));
        }

        if !settings.dry_run {
            store
                .write(&source.path, source.rewritten())
                .map_err(into_core)?;
        }

        debug!(
            path = %source.path,
            fixes = source.outcome.fixes,
            rules = ?source.outcome.by_rule,
            "rewrote source"
        );
        report.files.push(FileReport {
            path: source.path,
            fixes: source.outcome.fixes,
            by_rule: source.outcome.by_rule,
            written: !settings.dry_run,
        });
    }

    report.patch = patch;
    info!(
        scanned = report.files_scanned,
        changed = report.files.len(),
        fixes = report.total_fixes(),
        "run complete"
    );
    Ok(report)
}

/// Recover a typed error that a port passed through `anyhow`.
fn into_core(err: anyhow::Error) -> CoreError {
    match err.downcast::<CoreError>() {
        Ok(core) => core,
        Err(other) => CoreError::Runtime(other),
    }
}
