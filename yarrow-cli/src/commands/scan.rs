//! `yarrow <TARGET>` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use yarrow_core::config::YarrowConfig;
use yarrow_scanner::{ScanSummary, ScannerConfig, run_scan};

use crate::cli::{Cli, DEFAULT_CONFIG_PATH};
use crate::error::CliError;
use crate::output::OutputWriter;
use crate::reporter::{ConsoleReporter, ScanReport};

/// Result of a completed scan: the summary plus the writer the report went to.
pub struct ScanOutcome<W> {
    pub summary: ScanSummary,
    pub out: W,
}

/// Load configuration and apply command-line overrides.
///
/// An explicit `--config` file must exist; the default `yarrow.toml`
/// is optional and falls back to built-in defaults.
pub async fn load_config(cli: &Cli) -> Result<YarrowConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => YarrowConfig::load(path).await?,
        None => YarrowConfig::load_or_default(DEFAULT_CONFIG_PATH).await?,
    };

    apply_cli_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

/// Command-line flags take precedence over environment and file values.
pub fn apply_cli_overrides(config: &mut YarrowConfig, cli: &Cli) {
    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(dir) = &cli.rules_dir {
        config.scan.rules_dir = dir.display().to_string();
    }
    if cli.verbose {
        config.scan.report_non_matching = true;
    }
    if cli.fail_on_match {
        config.scan.fail_on_match = true;
    }
    if cli.follow_symlinks {
        config.scan.follow_symlinks = true;
    }
    if cli.no_verify_leaves {
        config.scan.verify_leaves = false;
    }
}

/// Execute the scan and write the report to `out`.
///
/// The scan itself is blocking I/O and runs on the blocking thread pool.
/// Per-file failures are part of the report; only fatal errors are returned.
pub async fn execute<W>(
    target: &Path,
    config: &YarrowConfig,
    writer: OutputWriter,
    out: W,
) -> Result<ScanOutcome<W>, CliError>
where
    W: Write + Send + 'static,
{
    let scanner_config = ScannerConfig::from_core(&config.scan);
    scanner_config.validate()?;

    info!(
        path = %target.display(),
        rules_dir = %scanner_config.rules_dir.display(),
        "starting scan"
    );

    let target: PathBuf = target.to_path_buf();
    let (result, finished) = tokio::task::spawn_blocking(move || {
        let mut reporter = ConsoleReporter::new(writer, out);
        let result = run_scan(scanner_config, &target, &mut reporter);
        (result, reporter.finish())
    })
    .await
    .map_err(|e| CliError::Task(e.to_string()))?;

    let summary = result?;
    let mut out = finished?;

    writer.render_to(
        &ScanReport {
            summary: summary.clone(),
        },
        &mut out,
    )?;
    out.flush()?;

    debug!(scan_id = %summary.scan_id, "report written");
    Ok(ScanOutcome { summary, out })
}

/// Map a completed scan to the process outcome.
///
/// Matches only fail the run when `fail_on_match` is enabled.
pub fn exit_policy(summary: &ScanSummary, fail_on_match: bool) -> Result<(), CliError> {
    if fail_on_match && summary.has_matches() {
        return Err(CliError::MatchesFound(summary.rule_matches));
    }
    Ok(())
}
