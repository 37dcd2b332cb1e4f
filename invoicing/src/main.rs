use clap::Parser;
use invoicing::cli::Cli;
use invoicing::config::InvoicingConfig;
use invoicing::startup::Application;
use service_core::error::AppError;
use service_core::observability::init_tracing;
use std::process::ExitCode;

fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = InvoicingConfig::load()?;
    if let Some(format) = cli.log_format {
        config.common.log_format = format;
    }

    init_tracing(
        "invoicing",
        &config.common.log_level,
        config.common.log_format,
    );
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        "Configuration loaded"
    );

    let mut app = Application::build(&config)?;
    let stdout = std::io::stdout();
    app.run(cli.command, &mut stdout.lock())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind(), "{}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
