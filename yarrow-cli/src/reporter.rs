//! Console reporter -- renders session events as marker-prefixed lines
//!
//! Markers: `[+]` progress or match, `[-]` failure or skip,
//! `[!]` engine limit reached, `[*]` informational.

use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use yarrow_core::event::MatchEvent;
use yarrow_core::types::TargetKind;
use yarrow_scanner::{Reporter, ScanSummary, SessionEvent};

use crate::error::CliError;
use crate::output::{OutputWriter, Render};

fn ok() -> colored::ColoredString {
    "[+]".green()
}

fn fail() -> colored::ColoredString {
    "[-]".red()
}

fn warn() -> colored::ColoredString {
    "[!]".yellow()
}

fn info() -> colored::ColoredString {
    "[*]".cyan()
}

impl Render for SessionEvent {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        match self {
            Self::EngineReady { engine } => {
                writeln!(w, "{} Successfully initialized {engine}", ok())
            }
            Self::RuleSourceCompiled { path } => {
                writeln!(w, "{} Compiled rules {}", ok(), path.display())
            }
            Self::RuleSourceRejected(diag) if diag.is_unreadable() => writeln!(
                w,
                "{} Failed to open rule file {}: {}",
                fail(),
                diag.source_path.display(),
                diag.messages.join("; ")
            ),
            Self::RuleSourceRejected(diag) => writeln!(
                w,
                "{} Failed to compile YARA rule {}, number of errors found: {}",
                fail(),
                diag.source_path.display(),
                diag.error_count
            ),
            Self::RulesCompiled {
                rule_count,
                sources,
                rejected,
            } => writeln!(
                w,
                "{} Loaded {rule_count} rules from {sources} files ({rejected} rejected)",
                info()
            ),
            Self::TargetClassified(target) => match target.kind {
                TargetKind::File => {
                    writeln!(w, "{} Path is a regular file: {}", ok(), target.path.display())
                }
                TargetKind::Directory => {
                    writeln!(w, "{} Path is a directory: {}", ok(), target.path.display())
                }
                TargetKind::Other => {
                    writeln!(w, "{} Unknown file type: {}", fail(), target.path.display())
                }
            },
            Self::ClassificationFailed { path, reason } => writeln!(
                w,
                "{} Error getting file status {}: {reason}",
                fail(),
                path.display()
            ),
            Self::WalkFailed { path, reason } => {
                writeln!(w, "{} Failed to walk {}: {reason}", fail(), path.display())
            }
            Self::Skipped(target) => match target.kind {
                TargetKind::Other => {
                    writeln!(w, "{} Unknown file type: {}", fail(), target.path.display())
                }
                kind => writeln!(w, "{} Skipping {kind}: {}", fail(), target.path.display()),
            },
            Self::File { path, event } => match event {
                MatchEvent::RuleMatched { rule } => {
                    writeln!(w, "{} Matched rule: {rule} ({})", ok(), path.display())
                }
                MatchEvent::RuleNotMatched { rule } => {
                    writeln!(w, "{} Did not match rule: {rule} ({})", fail(), path.display())
                }
                MatchEvent::ScanFinished => {
                    writeln!(w, "{} Scan finished: {}", ok(), path.display())
                }
                MatchEvent::TooManyMatches { pattern } => writeln!(
                    w,
                    "{} Too many matches: {pattern} ({})",
                    warn(),
                    path.display()
                ),
                MatchEvent::ConsoleLog { message } => {
                    writeln!(w, "{} Console log: {message}", info())
                }
            },
            Self::ScanFailed { path, reason } => {
                writeln!(w, "{} Failed to scan {}: {reason}", fail(), path.display())
            }
        }
    }
}

/// Closing summary record.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "summary")]
pub struct ScanReport {
    #[serde(flatten)]
    pub summary: ScanSummary,
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let s = &self.summary;
        writeln!(
            w,
            "{} Summary: {} files scanned, {} matched ({} rule matches), {} errors, {} rule files rejected",
            info(),
            s.files_scanned,
            s.files_matched,
            s.rule_matches,
            s.scan_errors + s.walk_errors,
            s.rule_sources_rejected
        )
    }
}

/// Reporter writing each session event as soon as it arrives.
///
/// `Reporter::report` cannot fail, so the first write error is kept
/// and returned from [`ConsoleReporter::finish`]. Later events are dropped.
pub struct ConsoleReporter<W: Write> {
    writer: OutputWriter,
    out: W,
    error: Option<CliError>,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(writer: OutputWriter, out: W) -> Self {
        Self {
            writer,
            out,
            error: None,
        }
    }

    /// Flush the output and return the first write error, if any.
    pub fn finish(mut self) -> Result<W, CliError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, event: &SessionEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.writer.render_to(event, &mut self.out) {
            self.error = Some(e);
        }
    }
}
