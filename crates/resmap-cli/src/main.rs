//! `resmap`: command-line access to resource map tag hierarchies.

mod cli;
mod handlers;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing::{info, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use resmap_client::GraphQlBackend;

use crate::cli::Cli;
use crate::handlers::{dispatch, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing. Logs go to stderr so command output stays clean.
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, replaces stderr output)
    //   RUST_LOG    - standard env filter (default: "resmap=info")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "resmap=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("resmap.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        None
    };

    let cli = Cli::parse();
    let settings = Settings::resolve(&cli)?;
    let backend = Arc::new(GraphQlBackend::from_env()?);

    let request_id = Uuid::now_v7();
    let span = tracing::info_span!(
        "command",
        request_id = %request_id,
        command = cli.command.name(),
        workspace_id = %settings.workspace_id,
        tag_type = %settings.tag_type
    );

    let report = async {
        info!(endpoint = %backend.config().endpoint, "Running command");
        dispatch(cli, &settings, backend).await
    }
    .instrument(span)
    .await?;

    if !report.text.is_empty() {
        println!("{}", report.text);
    }
    if report.failed {
        drop(file_guard);
        std::process::exit(1);
    }
    Ok(())
}
