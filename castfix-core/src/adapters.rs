//! Default filesystem-backed port implementations, plus an in-memory store.

use crate::discover::{discover_sources, is_candidate, is_excluded};
use crate::error::CoreError;
use crate::ports::SourceStore;
use crate::settings::ScanSettings;
use anyhow::anyhow;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

/// Suffix of the sibling file a write goes through before it is renamed into place.
const STAGING_SUFFIX: &str = ".castfix.tmp";

/// Reads and writes scripts under a project root on disk.
#[derive(Debug, Clone)]
pub struct FsSourceStore {
    pub project_root: Utf8PathBuf,
}

impl FsSourceStore {
    pub fn new(project_root: Utf8PathBuf) -> Self {
        Self { project_root }
    }

    fn abs(&self, rel: &Utf8Path) -> Utf8PathBuf {
        if rel.is_absolute() {
            rel.to_path_buf()
        } else {
            self.project_root.join(rel)
        }
    }
}

impl SourceStore for FsSourceStore {
    fn discover(&self, scan: &ScanSettings) -> anyhow::Result<Vec<Utf8PathBuf>> {
        Ok(discover_sources(&self.project_root, scan)?)
    }

    fn read(&self, rel: &Utf8Path) -> anyhow::Result<String> {
        let abs = self.abs(rel);
        std::fs::read_to_string(&abs).map_err(|source| io_error(&abs, source).into())
    }

    /// Writes through symlinks to the real file and keeps its permission bits.
    fn write(&self, rel: &Utf8Path, contents: &str) -> anyhow::Result<()> {
        let abs = self.abs(rel);
        let target = resolve_target(&abs)?;

        let permissions = std::fs::metadata(&target)
            .map_err(|source| io_error(&target, source))?
            .permissions();
        let staging = Utf8PathBuf::from(format!("{target}{STAGING_SUFFIX}"));
        std::fs::write(&staging, contents).map_err(|source| io_error(&staging, source))?;

        let placed = std::fs::set_permissions(&staging, permissions)
            .and_then(|()| std::fs::rename(&staging, &target));
        if let Err(source) = placed {
            let _ = std::fs::remove_file(&staging);
            return Err(io_error(&target, source).into());
        }
        debug!(path = %abs, target = %target, bytes = contents.len(), "wrote source");
        Ok(())
    }
}

fn io_error(path: &Utf8Path, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// The file a write must land in: `abs` itself, or the end of its symlink chain.
fn resolve_target(abs: &Utf8Path) -> Result<Utf8PathBuf, CoreError> {
    let canonical = std::fs::canonicalize(abs).map_err(|source| io_error(abs, source))?;
    Utf8PathBuf::from_path_buf(canonical).map_err(|p| CoreError::Io {
        path: abs.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("symlink target {} is not UTF-8", p.display()),
        ),
    })
}

/// In-memory store for embedding and testing.
///
/// Discovery applies the same root, extension, and exclusion rules as the filesystem store.
#[derive(Debug, Default)]
pub struct InMemorySourceStore {
    files: Mutex<BTreeMap<Utf8PathBuf, String>>,
}

impl InMemorySourceStore {
    pub fn new<I, P, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<Utf8PathBuf>,
        S: Into<String>,
    {
        let files: BTreeMap<Utf8PathBuf, String> = files
            .into_iter()
            .map(|(p, s)| (p.into(), s.into()))
            .collect();
        Self {
            files: Mutex::new(files),
        }
    }

    /// Current contents of a file, if present.
    pub fn get(&self, rel: &Utf8Path) -> Option<String> {
        self.lock().ok()?.get(rel).cloned()
    }

    fn lock(
        &self,
    ) -> anyhow::Result<std::sync::MutexGuard<'_, BTreeMap<Utf8PathBuf, String>>> {
        self.files
            .lock()
            .map_err(|_| anyhow!("in-memory source store lock poisoned"))
    }
}

impl SourceStore for InMemorySourceStore {
    fn discover(&self, scan: &ScanSettings) -> anyhow::Result<Vec<Utf8PathBuf>> {
        let files = self.lock()?;
        Ok(files
            .keys()
            .filter(|p| is_candidate(p, scan) && !is_excluded(p, scan))
            .cloned()
            .collect())
    }

    fn read(&self, rel: &Utf8Path) -> anyhow::Result<String> {
        self.lock()?.get(rel).cloned().ok_or_else(|| {
            CoreError::Io {
                path: rel.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            }
            .into()
        })
    }

    fn write(&self, rel: &Utf8Path, contents: &str) -> anyhow::Result<()> {
        self.lock()?.insert(rel.to_path_buf(), contents.to_string());
        Ok(())
    }
}
