mod records;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prometheus::{Encoder, Registry, TextEncoder};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use brushmatch_core::metrics::register_metrics;
use brushmatch_core::{
    load_config, validate_config, BatchRunner, Config, FileSnapshotSource, SnapshotManager,
    SnapshotSettings,
};

/// Environment variable naming the config file when `--config` is absent.
const CONFIG_ENV: &str = "BRUSHMATCH_CONFIG";

#[derive(Parser, Debug)]
#[command(
    name = "brushmatch",
    version,
    about = "Match free-form shaving brush descriptions to catalog products"
)]
struct Cli {
    /// Config file (default: $BRUSHMATCH_CONFIG, then ./config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, help = "Emit logs as JSON")]
    json_logs: bool,
    #[arg(long, help = "Write Prometheus metrics to this file on exit")]
    metrics: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match descriptions given on the command line
    Match {
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Match a record file (JSON array or JSON lines of {id, month, brush})
    Batch {
        #[arg(long)]
        input: PathBuf,
        /// JSON lines output; stdout when absent
        #[arg(long)]
        output: Option<PathBuf>,
        /// Overrides batch.workers
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Build a snapshot and report catalog statistics and pattern errors
    Check,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    if let Err(e) = run(cli) {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(|| {
        std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"))
    })
}

fn load(path: &Path) -> Result<Config> {
    info!("Loading configuration from {:?}", path);
    let mut config =
        load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?;
    validate_config(&config).context("Configuration validation failed")?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    config.catalog = config.catalog.resolved_against(base);
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let registry = Registry::new();
    register_metrics(&registry).context("Failed to register metrics")?;

    let config = load(&config_path(&cli))?;
    let settings = SnapshotSettings {
        matching: config.matching.clone(),
        strict_patterns: config.catalog.strict_patterns,
    };
    let manager = SnapshotManager::new(FileSnapshotSource::new(config.catalog.clone()), settings)
        .context("Failed to build matching snapshot")?;

    match &cli.command {
        Command::Match { texts } => {
            let snapshot = manager.current();
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for text in texts {
                let result = snapshot.match_brush(text);
                serde_json::to_writer_pretty(&mut out, &result)?;
                writeln!(out)?;
            }
        }
        Command::Batch {
            input,
            output,
            workers,
        } => {
            let records = records::read_records(input)?;
            let runner = BatchRunner::new(workers.unwrap_or(config.batch.workers))
                .context("Failed to start batch workers")?;
            info!(
                "Matching {} records from {:?} on {} workers",
                records.len(),
                input,
                runner.workers()
            );
            let batches = runner.match_by_month(&manager, &records);
            let matched = batches.into_iter().flat_map(|b| b.records);
            match output {
                Some(path) => records::write_matched(path, matched)?,
                None => records::write_lines(std::io::stdout().lock(), matched)?,
            }
        }
        Command::Check => {
            let snapshot = manager.current();
            for err in snapshot.pattern_errors() {
                warn!("{}", err);
            }
            let report = serde_json::json!({
                "generation": snapshot.generation(),
                "fingerprint": snapshot.fingerprint(),
                "catalog": snapshot.stats(),
                "pattern_errors": snapshot.pattern_errors().iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Some(path) = &cli.metrics {
        write_metrics(&registry, path)?;
    }
    Ok(())
}

fn write_metrics(registry: &Registry, path: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .context("Failed to encode metrics")?;
    std::fs::write(path, buffer).with_context(|| format!("Failed to write metrics to {:?}", path))?;
    info!("Wrote metrics to {:?}", path);
    Ok(())
}
