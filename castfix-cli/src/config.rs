//! Configuration file loading for castfix.
//!
//! Discovers and loads `castfix.toml` from the project root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use castfix_core::settings::{RunSettings, ScanSettings};
use castfix_core::RewriteConfig;
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "castfix.toml";

/// Top-level configuration from castfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CastfixConfig {
    /// Which scripts are scanned.
    pub scan: ScanConfig,

    /// Names used when emitting rewritten code.
    pub rewrite: RewriteSection,
}

/// Scan section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directories scanned recursively, relative to the project root.
    pub roots: Vec<String>,

    /// Path substrings (case-insensitive) that exclude a file.
    pub exclude_substrings: Vec<String>,

    /// Directory names that exclude everything beneath them.
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let scan = ScanSettings::default();
        Self {
            roots: scan.roots,
            exclude_substrings: scan.exclude_substrings,
            exclude_dirs: scan.exclude_dirs,
        }
    }
}

/// Rewrite section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteSection {
    pub namespace: String,
    pub holder_type: String,
    pub null_literal: String,

    /// Cast targets added to the built-in known types.
    pub extra_types: Vec<String>,
}

impl Default for RewriteSection {
    fn default() -> Self {
        let rewrite = RewriteConfig::default();
        Self {
            namespace: rewrite.namespace,
            holder_type: rewrite.holder_type,
            null_literal: rewrite.null_literal,
            extra_types: Vec::new(),
        }
    }
}

/// Discover the castfix.toml config file.
///
/// Returns `None` if the project root has no config file.
pub fn discover_config(project_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = project_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a castfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<CastfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<CastfixConfig> {
    let config: CastfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the project root, or return default if not found.
pub fn load_or_default(project_root: &Utf8Path) -> anyhow::Result<CastfixConfig> {
    match discover_config(project_root) {
        Some(path) => load_config(&path),
        None => Ok(CastfixConfig::default()),
    }
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: CastfixConfig,
}

impl ConfigMerger {
    pub fn new(config: CastfixConfig) -> Self {
        Self { config }
    }

    /// Produce the settings for one run.
    ///
    /// The project root and both flags come from the CLI; everything else from the file.
    pub fn merge_cli_args(
        self,
        project_root: Utf8PathBuf,
        dry_run: bool,
        diff: bool,
    ) -> RunSettings {
        let CastfixConfig { scan, rewrite } = self.config;

        let rewrite_config = RewriteConfig {
            namespace: rewrite.namespace,
            holder_type: rewrite.holder_type,
            null_literal: rewrite.null_literal,
            ..RewriteConfig::default()
        }
        .with_extra_types(rewrite.extra_types);

        RunSettings {
            project_root,
            scan: ScanSettings {
                roots: scan.roots,
                exclude_substrings: scan.exclude_substrings,
                exclude_dirs: scan.exclude_dirs,
            },
            rewrite: rewrite_config,
            dry_run,
            collect_patch: diff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castfix_core::DEFAULT_KNOWN_TYPES;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
[scan]
roots = ["src", "levels"]
exclude_substrings = ["spec", "mock"]
exclude_dirs = ["gut"]

[rewrite]
namespace = "Util.Dict"
holder_type = "RefCounted"
null_literal = "null"
extra_types = ["QuestData", "Texture2D"]
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(config.scan.roots, vec!["src", "levels"]);
        assert_eq!(config.scan.exclude_substrings, vec!["spec", "mock"]);
        assert_eq!(config.scan.exclude_dirs, vec!["gut"]);
        assert_eq!(config.rewrite.namespace, "Util.Dict");
        assert_eq!(config.rewrite.holder_type, "RefCounted");
        assert_eq!(config.rewrite.extra_types, vec!["QuestData", "Texture2D"]);
    }

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let contents = r#"
[scan]
roots = ["game"]
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(config.scan.roots, vec!["game"]);
        assert_eq!(config.scan.exclude_substrings, vec!["test"]);
        assert_eq!(config.scan.exclude_dirs, vec!["gdUnit4"]);
        assert_eq!(config.rewrite.namespace, "DictUtils");
        assert_eq!(config.rewrite.holder_type, "Resource");
        assert!(config.rewrite.extra_types.is_empty());
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config.scan.roots, ScanSettings::default().roots);
        assert_eq!(config.rewrite.null_literal, "null");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = parse_config("[scan]\nroot = [\"core\"]\n").unwrap_err();
        assert!(format!("{:#}", err).contains("invalid TOML"));
    }

    #[test]
    fn test_merge_defaults_matches_run_settings_default() {
        let settings =
            ConfigMerger::new(CastfixConfig::default()).merge_cli_args(".".into(), false, false);
        let expected = RunSettings::default();

        assert_eq!(settings.project_root, expected.project_root);
        assert_eq!(settings.scan, expected.scan);
        assert_eq!(settings.rewrite, expected.rewrite);
        assert!(!settings.dry_run);
        assert!(!settings.collect_patch);
    }

    #[test]
    fn test_merge_cli_flags_and_extra_types() {
        let config = CastfixConfig {
            rewrite: RewriteSection {
                extra_types: vec!["QuestData".to_string(), "ItemData".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };

        let settings = ConfigMerger::new(config).merge_cli_args("game".into(), true, true);

        assert_eq!(settings.project_root, Utf8PathBuf::from("game"));
        assert!(settings.dry_run);
        assert!(settings.collect_patch);
        // ItemData is already known, so only QuestData is appended.
        assert_eq!(settings.rewrite.known_types.len(), DEFAULT_KNOWN_TYPES.len() + 1);
        assert_eq!(
            settings.rewrite.known_types.last().map(String::as_str),
            Some("QuestData")
        );
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert!(discover_config(&root).is_some());
    }

    #[test]
    fn test_load_or_default_returns_default_when_missing() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        let cfg = load_or_default(&root).expect("load default");
        assert_eq!(cfg.scan.exclude_dirs, vec!["gdUnit4"]);
        assert!(cfg.rewrite.extra_types.is_empty());
    }

    #[test]
    fn test_load_config_reports_path_on_parse_error() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        std::fs::write(root.join(CONFIG_FILE_NAME), "[scan\n").expect("write config");

        let err = load_or_default(&root).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
