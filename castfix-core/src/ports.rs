//! Port traits abstracting all I/O away from the pipeline.

use crate::settings::ScanSettings;
use camino::{Utf8Path, Utf8PathBuf};

/// Where sources come from and go back to. Paths are relative to the project root.
pub trait SourceStore {
    /// Candidate scripts, sorted, exclusions already applied.
    fn discover(&self, scan: &ScanSettings) -> anyhow::Result<Vec<Utf8PathBuf>>;

    fn read(&self, rel: &Utf8Path) -> anyhow::Result<String>;

    /// Replace the whole file. Must not leave a partially written file behind.
    fn write(&self, rel: &Utf8Path, contents: &str) -> anyhow::Result<()>;
}
