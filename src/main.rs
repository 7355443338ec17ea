use std::process::ExitCode;

use clap::Parser;
use release_herald::{execute, ConsolePort, ErrorCategory, HttpApi, Sent, Settings};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cli;

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (code, label) = match e.category() {
                ErrorCategory::Configuration => (2u8, "configuration error"),
                ErrorCategory::Remote => (3, "rejected by the service"),
                ErrorCategory::Environment => (4, "environment failure"),
            };
            error!("{}: {}", label, e);
            eprintln!("herald: {}: {}", label, e);
            ExitCode::from(code)
        }
    }
}

fn run(cli: &Cli) -> release_herald::Result<()> {
    let file_settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    let settings = file_settings.overlay(cli.overrides());

    let api = HttpApi::new(settings.consumer()?, settings.endpoints()?)?;
    let mut port = ConsolePort::console();
    let outcome = execute(&settings, cli.action(), &api, &mut port)?;

    match outcome.sent {
        Sent::Status(status) => println!("Sent tweet: {}", status.text),
        Sent::Message(message) => println!(
            "Sent direct message to @{}: {}",
            message.recipient_screen_name, message.text
        ),
    }
    if outcome.token_saved {
        info!("access token cached for the next run");
    }
    Ok(())
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
