use std::io::IsTerminal;

use clap::Parser;
use clap::error::ErrorKind;
use colored::Colorize;

use yarrow_cli::cli::{Cli, OutputFormat};
use yarrow_cli::commands::scan;
use yarrow_cli::error::CliError;
use yarrow_cli::logging;
use yarrow_cli::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            eprintln!("{} Incorrect parameters specified", "[-]".red());
            eprint!("{e}");
            std::process::exit(CliError::Usage(e.to_string()).exit_code());
        }
    };

    if let Err(e) = run(cli).await {
        eprintln!("{} {e}", "[-]".red());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = scan::load_config(&cli).await?;

    logging::init_tracing(&config.general).map_err(|e| CliError::Logging(e.to_string()))?;

    if cli.output == OutputFormat::Json || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    tracing::debug!(target_path = %cli.target.display(), "yarrow starting");

    let writer = OutputWriter::new(cli.output);
    let outcome = scan::execute(&cli.target, &config, writer, std::io::stdout()).await?;

    scan::exit_policy(&outcome.summary, config.scan.fail_on_match)
}
