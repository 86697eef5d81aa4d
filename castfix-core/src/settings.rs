//! Clap-free settings for a rewrite run.

use camino::Utf8PathBuf;
use castfix_rewrite::RewriteConfig;

/// Script extension scanned under each root.
pub const SCRIPT_EXTENSION: &str = "gd";

/// Which files a run looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    /// Directories relative to the project root, scanned recursively.
    pub roots: Vec<String>,
    /// Case-insensitive substrings of the relative path that exclude a file.
    pub exclude_substrings: Vec<String>,
    /// Directory names that exclude every file beneath them.
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            roots: vec![
                "core".to_string(),
                "scenes".to_string(),
                "addons/sparkling_editor".to_string(),
            ],
            exclude_substrings: vec!["test".to_string()],
            exclude_dirs: vec!["gdUnit4".to_string()],
        }
    }
}

/// Settings for one run of the pipeline.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub project_root: Utf8PathBuf,
    pub scan: ScanSettings,
    pub rewrite: RewriteConfig,

    /// Detect and report only; never write.
    pub dry_run: bool,
    /// Collect a unified diff of every changed file.
    pub collect_patch: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            project_root: Utf8PathBuf::from("."),
            scan: ScanSettings::default(),
            rewrite: RewriteConfig::default(),
            dry_run: false,
            collect_patch: false,
        }
    }
}
