//! gke-ship CLI entrypoint

use std::process::ExitCode;

use clap::Parser;

use gke_ship::cli::Cli;
use gke_ship::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging once, before anything else can log
    if let Err(e) = logging::init(&cli.logging_config()) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    match cli.execute().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
