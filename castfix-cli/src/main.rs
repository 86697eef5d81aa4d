mod config;

use anyhow::Context;
use camino::Utf8PathBuf;
use castfix_core::adapters::FsSourceStore;
use castfix_core::pipeline;
use castfix_core::report::render_summary;
use castfix_core::CoreError;
use clap::Parser;
use config::ConfigMerger;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "castfix",
    version,
    about = "Rewrite unsafe resource casts and untyped dictionary conversions in GDScript."
)]
struct Cli {
    /// Report what would change without modifying any file.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Project root containing the scanned directories (default: current directory).
    #[arg(long, default_value = ".")]
    project_root: Utf8PathBuf,

    /// Print a unified diff of every changed file after the summary.
    #[arg(long, default_value_t = false)]
    diff: bool,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        let core = e.downcast_ref::<CoreError>();
        if core.is_some_and(CoreError::is_setup_error) {
            warn!("no scripts were read or modified");
        }
        return ExitCode::from(core.map_or(1, CoreError::exit_code));
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cmd_run(cli)
}

fn cmd_run(cli: Cli) -> anyhow::Result<()> {
    let project_root = cli.project_root;

    let file_config =
        config::load_or_default(&project_root).context("load castfix.toml config")?;
    let settings = ConfigMerger::new(file_config).merge_cli_args(
        project_root.clone(),
        cli.dry_run,
        cli.diff,
    );
    debug!(
        "merged config: roots={:?}, known_types={}, dry_run={}",
        settings.scan.roots,
        settings.rewrite.known_types.len(),
        settings.dry_run
    );

    let store = FsSourceStore::new(project_root);
    let report = pipeline::run(&settings, &store)
        .with_context(|| format!("rewrite scripts under {}", settings.project_root))?;

    for (rule, fixes) in report.totals_by_rule() {
        info!(rule, fixes, "rule totals");
    }

    print!("{}", render_summary(&report));
    if let Some(patch) = report.patch.as_deref().filter(|p| !p.is_empty()) {
        println!();
        print!("{}", patch);
    }
    Ok(())
}
