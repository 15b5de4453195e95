mod domain;
mod application;
mod infrastructure;

use std::process::ExitCode;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use crate::domain::TransferError;
use crate::infrastructure::driving::cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // .env must be loaded before clap reads argument defaults from the environment
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match infrastructure::config::load() {
        Ok(settings) => infrastructure::driving::cli::run(args.command, &settings).await,
        Err(e) => Err(anyhow::Error::new(e).context("Failed to load configuration")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::from(exit_code(&err))
        }
    }
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<TransferError>() {
        Some(transfer) => error!(kind = transfer.kind(), "{:#}", err),
        None => error!("{:#}", err),
    }
    for line in error_lines(err) {
        eprintln!("{line}");
    }
}

/// Printed regardless of the log filter
fn error_lines(err: &anyhow::Error) -> Vec<String> {
    let mut lines = vec![format!("Error: {err:#}")];
    if let Some(failure) = err.downcast_ref::<TransferError>().map(TransferError::failure) {
        if let Some(status) = failure.status {
            lines.push(format!("Status: {status}"));
        }
        if let Some(reason) = &failure.reason {
            lines.push(format!("Reason: {reason}"));
        }
    }
    lines
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<TransferError>()
        .map(TransferError::exit_code)
        .unwrap_or(1)
}
