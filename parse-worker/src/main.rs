//! Parse worker: reconstructs tracker events from a JSON-lines record file.
//!
//! Usage: `tracker-parse-worker <records.jsonl> [config.toml]`
//!
//! Rendered events (when enabled) are written to stdout one per line, followed
//! by a single JSON line holding the [`WorkerOutput`]. Logs go to stderr, or to
//! `TRACKER_LOG_PATH` when set.

use std::path::{Path, PathBuf};

use tracing_subscriber::filter::EnvFilter;
use tracker_core::context::load_config;
use tracker_core::{TrackerProcessor, WorkerOutput};

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    // If TRACKER_LOG_PATH is set, append to that file
    if let Ok(path) = std::env::var("TRACKER_LOG_PATH")
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_ansi(false)
            .with_writer(file)
            .init();
        return;
    }

    // Fallback to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_file(file_path: &Path, config_path: Option<&Path>) -> Result<WorkerOutput, String> {
    let config = load_config(config_path).map_err(|e| format!("Failed to load config: {}", e))?;
    let render = config.render_events;

    let timer = std::time::Instant::now();
    let mut processor = TrackerProcessor::new(config);
    processor
        .process_file(file_path)
        .map_err(|e| format!("Failed to process {}: {}", file_path.display(), e))?;

    if render {
        for event in processor.events() {
            println!("{}", event);
        }
    }

    Ok(processor.to_worker_output(timer.elapsed().as_millis()))
}

fn main() {
    // Worker runs as its own process and needs its own subscriber
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        tracing::error!("Usage: tracker-parse-worker <records.jsonl> [config.toml]");
        std::process::exit(1);
    }

    let file_path = PathBuf::from(&args[1]);
    let config_path = args.get(2).map(PathBuf::from);

    match parse_file(&file_path, config_path.as_deref()) {
        Ok(output) => {
            tracing::info!(
                records = output.records_read,
                skipped = output.skipped,
                unresolved = output.unresolved,
                elapsed_ms = output.elapsed_ms as u64,
                "Parse complete"
            );
            match serde_json::to_string(&output) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize output");
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Parse failed");
            std::process::exit(1);
        }
    }
}
