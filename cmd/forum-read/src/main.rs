//! # forum-read
//!
//! Seeds the in-memory store from a JSON fixture, reads one thread through
//! the thread-detail service and prints the response envelope the HTTP API
//! would send:
//!
//! - `{"status":"success","data":{"thread":{...}}}`, exit code 0
//! - `{"status":"fail","message":"..."}`, exit code 2 when the thread does
//!   not exist and 3 for malformed records or store failures
//!
//! Setup failures (configuration, fixture) exit with code 1.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use configs::{AppConfig, LogConfig, LogFormat};
use domains::{DomainError, ThreadView};
use serde::Serialize;
use services::{ThreadDetailOptions, ThreadDetailService};
use storage_adapters::{ForumFixture, InMemoryForumStore, TimeoutStore};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "forum-read", version, about = "Print the comment tree of one forum thread")]
struct Cli {
    /// JSON fixture used to seed the in-memory store
    #[arg(long, short)]
    fixtures: PathBuf,

    /// Id of the thread to read
    thread_id: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Envelope {
    Success { data: ThreadData },
    Fail { message: String },
}

#[derive(Debug, Serialize)]
struct ThreadData {
    thread: ThreadView,
}

const EXIT_NOT_FOUND: u8 = 2;
const EXIT_FAULT: u8 = 3;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // 1. Configuration and logging
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.log);

    // 2. Seed the store, then bound every call to it
    let store = InMemoryForumStore::new();
    ForumFixture::load(&cli.fixtures)
        .await
        .with_context(|| format!("failed to load fixtures from {}", cli.fixtures.display()))?
        .seed(&store)
        .context("failed to seed the store")?;
    let store = Arc::new(TimeoutStore::new(store, config.store.timeout()));

    // 3. Wire the service over the same store for all three ports
    let service = ThreadDetailService::new(store.clone(), store.clone(), store).with_options(
        ThreadDetailOptions {
            reply_fetch_concurrency: config.aggregation.reply_fetch_concurrency(),
        },
    );

    let (envelope, code) = respond(service.get_thread_detail(&cli.thread_id).await);

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(ExitCode::from(code))
}

/// Maps the outcome of a read to its envelope and process exit code.
fn respond(outcome: Result<ThreadView, DomainError>) -> (Envelope, u8) {
    match outcome {
        Ok(thread) => (
            Envelope::Success {
                data: ThreadData { thread },
            },
            0,
        ),
        Err(err) => {
            let code = if err.is_not_found() {
                EXIT_NOT_FOUND
            } else {
                tracing::error!(error = %err, "thread detail failed");
                EXIT_FAULT
            };
            (
                Envelope::Fail {
                    message: err.to_string(),
                },
                code,
            )
        }
    }
}

/// Logs go to stderr so stdout carries only the envelope.
fn init_tracing(log: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
