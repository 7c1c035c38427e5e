use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schedule_delta::adapter::{EventAdapter, WidgetEvent};
use schedule_delta::config::{default_config_path, SessionConfig};
use schedule_delta::diff::diff_schedule;
use schedule_delta::integrity;
use schedule_delta::models::{DeltaSummary, Schedule, ScheduleDelta};
use schedule_delta::normalize::normalize_schedule;
use schedule_delta::seed::demo_seed;
use schedule_delta::store::{Command, ScheduleStore};
use schedule_delta::tree_render::render_task_tree;

#[derive(Parser)]
#[command(name = "sdelta")]
#[command(about = "Track Gantt schedule edits against a baseline and report the delta")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the normalized schedule
    Show {
        /// Seed dataset (JSON). Uses the built-in demo project when omitted
        #[arg(short, long)]
        seed: Option<PathBuf>,

        /// Render the task hierarchy instead of JSON
        #[arg(long)]
        tree: bool,
    },
    /// Feed widget events (one JSON object per line) through the adapter
    Replay {
        #[arg(short, long)]
        seed: Option<PathBuf>,

        /// Event file
        #[arg(short, long)]
        events: PathBuf,

        /// Include the live snapshot in the report
        #[arg(long)]
        live: bool,
    },
    /// Apply store commands (one JSON object per line)
    Apply {
        #[arg(short, long)]
        seed: Option<PathBuf>,

        /// Command file
        #[arg(short, long)]
        commands: PathBuf,

        /// Include the live snapshot in the report
        #[arg(long)]
        live: bool,
    },
    /// Diff two dataset files
    Diff { before: PathBuf, after: PathBuf },
    /// Report dangling references, parent loops and inverted dates
    Check {
        #[arg(short, long)]
        seed: Option<PathBuf>,
    },
    /// Print the effective config
    Config {
        /// Write it to the config path instead
        #[arg(long)]
        write: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    session: uuid::Uuid,
    revision: u64,
    summary: DeltaSummary,
    delta: &'a ScheduleDelta,
    #[serde(skip_serializing_if = "Option::is_none")]
    live: Option<&'a Schedule>,
    rejected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    misses: Option<u64>,
}

impl<'a> Report<'a> {
    fn new(store: &'a ScheduleStore, include_live: bool, rejected: usize) -> Self {
        Self {
            session: store.session_id(),
            revision: store.revision(),
            summary: store.delta().summary(),
            delta: store.delta(),
            live: include_live.then(|| store.live()),
            rejected,
            misses: None,
        }
    }
}

/// Initialize tracing on stderr so stdout stays clean for reports
fn init_tracing(default_filter: Option<&str>) {
    let filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(
        |_| default_filter.unwrap_or("schedule_delta=info").to_string(),
    ));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SessionConfig::load(cli.config.as_deref());
    init_tracing(config.log_filter.as_deref());

    match cli.command {
        Commands::Show { seed, tree } => {
            let store = open_store(seed.as_deref(), &config)?;
            if tree {
                print!("{}", render_task_tree(store.live(), store.delta()));
            } else {
                emit(&config, store.live())?;
            }
        }
        Commands::Replay { seed, events, live } => {
            let mut store = open_store(seed.as_deref(), &config)?;
            let adapter = EventAdapter::new();
            let mut rejected = 0;

            for (line, text) in read_lines(&events)? {
                let event: WidgetEvent = match serde_json::from_str(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::warn!(line, error = %e, "Skipping unparseable event");
                        rejected += 1;
                        continue;
                    }
                };
                if let Err(e) = adapter.dispatch(&mut store, &event) {
                    tracing::warn!(line, callback = event.name(), error = %e, "Event rejected");
                    rejected += 1;
                }
            }

            tracing::info!(
                changes = store.delta().change_count(),
                rejected,
                misses = adapter.misses(),
                "Replay finished"
            );
            let mut report = Report::new(&store, live, rejected);
            report.misses = Some(adapter.misses());
            emit(&config, &report)?;
        }
        Commands::Apply {
            seed,
            commands,
            live,
        } => {
            let mut store = open_store(seed.as_deref(), &config)?;
            let mut rejected = 0;

            for (line, text) in read_lines(&commands)? {
                let command: Command = match serde_json::from_str(&text) {
                    Ok(command) => command,
                    Err(e) => {
                        tracing::warn!(line, error = %e, "Skipping unparseable command");
                        rejected += 1;
                        continue;
                    }
                };
                let op = command.name();
                if let Err(e) = store.apply(command) {
                    tracing::warn!(line, op, error = %e, "Command rejected");
                    rejected += 1;
                }
            }

            tracing::info!(changes = store.delta().change_count(), rejected, "Apply finished");
            emit(&config, &Report::new(&store, live, rejected))?;
        }
        Commands::Diff { before, after } => {
            let before = load_schedule(&before, &config)?;
            let after = load_schedule(&after, &config)?;
            let delta = diff_schedule(&before, &after);
            tracing::info!(changes = delta.change_count(), "Diff finished");
            emit(&config, &delta)?;
        }
        Commands::Check { seed } => {
            let store = open_store(seed.as_deref(), &config)?;
            let issues = integrity::check(store.live());
            if issues.is_empty() {
                println!("No issues found");
            }
            for issue in &issues {
                println!("{}", issue);
            }
        }
        Commands::Config { write } => {
            if write {
                let path = match cli.config {
                    Some(path) => path,
                    None => default_config_path()?,
                };
                config.save_to(&path)?;
                println!("Wrote {}", path.display());
            } else {
                emit(&config, &config)?;
            }
        }
    }

    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn open_store(seed: Option<&Path>, config: &SessionConfig) -> Result<ScheduleStore> {
    let data = match seed {
        Some(path) => read_json(path)?,
        None => demo_seed(),
    };
    let store = ScheduleStore::with_entity_set(&data, config.entity_set)
        .context("Failed to load seed dataset")?;
    tracing::debug!(session = %store.session_id(), "Session opened");
    Ok(store)
}

fn load_schedule(path: &Path, config: &SessionConfig) -> Result<Schedule> {
    let mut schedule = normalize_schedule(&read_json(path)?)
        .with_context(|| format!("Invalid dataset in {}", path.display()))?;
    for kind in schedule.retain_tracked(config.entity_set) {
        tracing::warn!(%kind, "Ignoring untracked collection");
    }
    Ok(schedule)
}

/// Non-blank lines with their 1-based line numbers.
fn read_lines(path: &Path) -> Result<Vec<(usize, String)>> {
    let file =
        fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut lines = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        if !line.trim().is_empty() {
            lines.push((index + 1, line));
        }
    }
    Ok(lines)
}

fn emit(config: &SessionConfig, value: &impl Serialize) -> Result<()> {
    let json = if config.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
