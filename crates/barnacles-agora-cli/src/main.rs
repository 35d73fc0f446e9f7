//! CLI for barnacles-agora.
//!
//! Reads barnacles events as JSON lines from a file or stdin and forwards the
//! registered ones to the configured Agora webhook. Also validates a
//! configuration without sending anything.

use anyhow::{Context, Result};
use barnacles_agora_core::InboundEvent;
use barnacles_agora_webhook::{AgoraOptions, BarnaclesAgora, Config};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted when no target is given otherwise.
const TARGET_ENV: &str = "AGORA_TARGET";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON options file: {"target": ..., "printErrors": ..., "eventsToStore": {...}}
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Agora webhook URL (overrides the options file and AGORA_TARGET)
    #[arg(long, global = true)]
    target: Option<String>,

    /// Print delivery errors instead of discarding them
    #[arg(long, global = true)]
    print_errors: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forward events read as JSON lines from a file or stdin
    Forward {
        /// Input file path (default: stdin)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Skip this many lines before forwarding (0-based)
        #[arg(long, default_value = "0")]
        line_offset: u64,

        /// Path to the stats file
        #[arg(long)]
        stats_file: Option<PathBuf>,
    },
    /// Validate the configuration and print where events would go
    CheckConfig,
}

#[derive(Serialize, Deserialize, Debug)]
struct ForwardStats {
    total_received: u64,
    forwarded: u64,
    by_event: BTreeMap<String, u64>,
    #[serde(with = "time::serde::iso8601")]
    last_updated: OffsetDateTime,
}

impl Default for ForwardStats {
    fn default() -> Self {
        Self {
            total_received: 0,
            forwarded: 0,
            by_event: BTreeMap::new(),
            last_updated: OffsetDateTime::now_utc(),
        }
    }
}

impl ForwardStats {
    fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let file = File::open(path)
            .with_context(|| format!("Failed to open stats file {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse stats file {}", path.display()))
    }

    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create stats file {}", path.display()))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write forwarding stats")
    }

    fn update(&mut self, event: &InboundEvent, forwarded: bool) {
        self.total_received += 1;
        if forwarded {
            self.forwarded += 1;
        }
        *self.by_event.entry(event.name.clone()).or_insert(0) += 1;
        self.last_updated = OffsetDateTime::now_utc();
    }
}

/// Deliveries started by `forward` that may still be running.
///
/// Finished tasks are dropped on every push, so a long-running stdin stream
/// only holds handles for requests that are actually outstanding.
#[derive(Default)]
struct InFlight {
    tasks: Vec<JoinHandle<()>>,
}

impl InFlight {
    fn push(&mut self, task: JoinHandle<()>) {
        self.tasks.retain(|t| !t.is_finished());
        self.tasks.push(task);
    }

    fn len(&self) -> usize {
        self.tasks.len()
    }

    async fn wait_all(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "delivery task did not complete");
            }
        }
    }
}

fn load_options_file(path: &Path) -> Result<AgoraOptions> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open options file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Invalid options file {}", path.display()))
}

/// Layers the command line over the options file: `--target` wins, then the
/// file, then the environment. `--print-errors` can only switch printing on.
fn merge_options(
    mut options: AgoraOptions,
    target_flag: Option<String>,
    target_env: Option<String>,
    print_errors: bool,
) -> AgoraOptions {
    if let Some(target) = target_flag {
        options.target = Some(target);
    } else if options.target.is_none() {
        options.target = target_env;
    }
    if print_errors {
        options.print_errors = Some(true);
    }
    options
}

/// Dispatches every event in `reader` from line `offset` on, then waits for
/// the deliveries it started. Returns the number of lines consumed.
async fn forward_events<R: BufRead>(
    agora: &BarnaclesAgora,
    reader: R,
    offset: u64,
    stats: &mut ForwardStats,
) -> Result<u64> {
    let mut in_flight = InFlight::default();
    let mut lines_read = 0;

    for (idx, line) in reader.lines().enumerate() {
        if (idx as u64) < offset {
            continue;
        }
        let line = line.context("Failed to read input")?;
        lines_read += 1;
        if line.trim().is_empty() {
            continue;
        }

        let event: InboundEvent = serde_json::from_str(&line)
            .with_context(|| format!("Invalid event on line {}", idx + 1))?;
        let task = agora.handle_event(&event.name, &event.data);
        stats.update(&event, task.is_some());
        if let Some(task) = task {
            in_flight.push(task);
        }
    }

    in_flight.wait_all().await;

    Ok(lines_read)
}

fn print_config(config: &Config) {
    let events: Vec<_> = config
        .events_to_store()
        .keys()
        .map(|event| event.as_str())
        .collect();

    println!("target: {}", config.target());
    println!("endpoint: {}", config.endpoint());
    println!("print errors: {}", config.print_errors());
    if events.is_empty() {
        println!("events: (none)");
    } else {
        println!("events: {}", events.join(", "));
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => load_options_file(path)?,
        None => AgoraOptions::default(),
    };
    let options = merge_options(base, cli.target, env::var(TARGET_ENV).ok(), cli.print_errors);
    let agora = BarnaclesAgora::new(options).context("Invalid forwarding configuration")?;

    match cli.command {
        Commands::CheckConfig => print_config(agora.config()),
        Commands::Forward {
            path,
            line_offset,
            stats_file,
        } => {
            let mut stats = match &stats_file {
                Some(file) => ForwardStats::load(file).unwrap_or_else(|e| {
                    tracing::warn!(
                        "failed to read stats from {}; starting fresh: {e}",
                        file.display()
                    );
                    ForwardStats::default()
                }),
                None => ForwardStats::default(),
            };
            let before = (stats.total_received, stats.forwarded);

            let reader: Box<dyn BufRead> = match &path {
                Some(p) => Box::new(BufReader::new(
                    File::open(p).context("Failed to open input file")?,
                )),
                None => Box::new(BufReader::new(io::stdin())),
            };

            let lines_read = forward_events(&agora, reader, line_offset, &mut stats).await?;
            let next_offset = line_offset
                .checked_add(lines_read)
                .context("Line offset overflow")?;

            println!(
                "Received {} events, forwarded {}. (next line offset: {})",
                stats.total_received - before.0,
                stats.forwarded - before.1,
                next_offset
            );

            if let Some(file) = &stats_file {
                stats.save(file).context("Failed to save stats")?;
            }
        }
    }

    Ok(())
}
