//! CLI-specific error types and exit code mapping

use yarrow_core::error::YarrowError;
use yarrow_scanner::ScannerError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Wrong number of arguments or an unparsable flag.
    #[error("incorrect parameters specified: {0}")]
    Usage(String),

    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// Logging could not be initialized.
    #[error("logging error: {0}")]
    Logging(String),

    /// Fatal scanner error (engine bootstrap, rules directory).
    #[error("{0}")]
    Scan(#[from] ScannerError),

    /// The blocking scan task did not complete.
    #[error("scan task failed: {0}")]
    Task(String),

    /// At least one rule matched and `--fail-on-match` was given.
    #[error("{0} rule match(es) found")]
    MatchesFound(usize),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error while writing the report.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                      |
    /// |------|----------------------------------------------|
    /// | 0    | Scan completed (per-file errors included)    |
    /// | 1    | Usage, configuration or fatal scanner error  |
    /// | 4    | Matches found with `--fail-on-match`         |
    /// | 10   | Report could not be written                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MatchesFound(_) => 4,
            Self::Io(_) => 10,
            Self::Usage(_)
            | Self::Config(_)
            | Self::Logging(_)
            | Self::Scan(_)
            | Self::Task(_)
            | Self::JsonSerialize(_) => 1,
        }
    }
}

impl From<YarrowError> for CliError {
    fn from(e: YarrowError) -> Self {
        match e {
            YarrowError::Config(inner) => Self::Config(inner.to_string()),
            other => Self::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yarrow_core::error::ConfigError;

    #[test]
    fn test_exit_code_usage_error() {
        let err = CliError::Usage("missing target".to_owned());
        assert_eq!(err.exit_code(), 1, "usage error should return exit code 1");
    }

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("bad value".to_owned());
        assert_eq!(err.exit_code(), 1, "config error should return exit code 1");
    }

    #[test]
    fn test_exit_code_fatal_scan_error() {
        let err = CliError::Scan(ScannerError::RulesDirectory {
            path: "/etc/yarrow/rules".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        });
        assert_eq!(err.exit_code(), 1, "fatal scan error should return exit code 1");
        assert!(err.to_string().contains("/etc/yarrow/rules"));
    }

    #[test]
    fn test_exit_code_matches_found() {
        let err = CliError::MatchesFound(3);
        assert_eq!(err.exit_code(), 4, "matches should return exit code 4");
        assert_eq!(err.to_string(), "3 rule match(es) found");
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_from_core_config_error() {
        let core_err = YarrowError::Config(ConfigError::FileNotFound {
            path: "custom.toml".to_owned(),
        });
        let cli_err: CliError = core_err.into();
        match cli_err {
            CliError::Config(msg) => assert!(msg.contains("custom.toml")),
            other => panic!("expected Config variant, got {other:?}"),
        }
    }

    #[test]
    fn test_error_display_usage() {
        let err = CliError::Usage("unexpected argument 'b'".to_owned());
        let display_str = format!("{}", err);
        assert!(display_str.contains("incorrect parameters specified"));
        assert!(display_str.contains("unexpected argument"));
    }
}
