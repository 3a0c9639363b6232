//! pixdiff-server binary - serve the diff endpoint over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixdiff_remote::{HttpFetcher, ObjectStorePublisher};
use pixdiff_server::AppState;

/// Visual image diff service.
#[derive(Parser, Debug)]
#[command(name = "pixdiff-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8000", value_name = "ADDR")]
    bind: SocketAddr,

    /// Object-store base URL (endpoint plus bucket) that published
    /// overlays are uploaded to.
    #[arg(long, value_name = "URL")]
    storage_url: String,

    /// Directory for on-disk debug copies of inputs and overlays.
    #[arg(long, value_name = "DIR")]
    work_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("pixdiff={log_level},pixdiff_server={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: Args) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(
        Box::new(HttpFetcher::new()),
        Box::new(ObjectStorePublisher::new(&args.storage_url)),
        args.work_dir,
    ));

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(args.bind)
            .await
            .with_context(|| format!("failed to bind {}", args.bind))?;
        tracing::info!(addr = %args.bind, storage = %args.storage_url, "serving");
        axum::serve(listener, pixdiff_server::app(state))
            .await
            .context("server error")
    })
}
