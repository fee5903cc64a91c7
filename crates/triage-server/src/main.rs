use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use triage_core::KnowledgeBase;
use triage_engine::DiagnosisEngine;
use triage_server::{ServerConfig, ServerError};

/// HTTP server for the triage expert system.
#[derive(Debug, Parser)]
#[command(name = "triage-server", version, about)]
struct Cli {
    /// TOML file with `bind` and `allowed_origin` keys
    #[arg(long, env = "TRIAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(long, env = "TRIAGE_BIND")]
    bind: Option<SocketAddr>,

    /// Origin allowed to call the API from a browser
    #[arg(long, env = "TRIAGE_ALLOWED_ORIGIN")]
    allowed_origin: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "triage_server={level},triage_engine={level},triage_core={level},tower_http={level}"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let config = ServerConfig::load(
        cli.config.as_deref(),
        cli.bind,
        cli.allowed_origin.as_deref(),
    )?;

    let kb = Arc::new(KnowledgeBase::builtin()?);
    let engine = DiagnosisEngine::new(kb);

    triage_server::serve(engine, &config).await
}
