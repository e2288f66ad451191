//! storyscan - transcript signal extraction CLI
//!
//! **Usage:**
//! ```bash
//! storyscan extract [FILE] [--sentences-file F] [--language L] [--compact]
//! storyscan init-config [PATH]
//! ```
//!
//! Reads a transcript from FILE (or stdin) and prints `ExtractedSignals` as
//! JSON on stdout. Logs go to stderr.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use storyscan_common::config::{
    default_config_path, write_toml_config, CategoryEngine, ConfigResolver, LoggingConfig,
    TomlConfig, UrgencyEngine,
};
use storyscan_extract::{PipelineConfig, SignalPipeline, TranscriptInput};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for storyscan
#[derive(Parser, Debug)]
#[command(name = "storyscan")]
#[command(about = "Extract structured signals from speech-to-text transcripts")]
#[command(version)]
struct Cli {
    /// Config file (overrides STORYSCAN_CONFIG and the platform default)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter directive (overrides RUST_LOG and the config file)
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract signals from a transcript
    Extract(ExtractArgs),

    /// Write the default configuration file
    InitConfig {
        /// Target path (defaults to the platform config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Transcript file; reads stdin when omitted
    file: Option<PathBuf>,

    /// Pre-segmented sentences, one per line
    #[arg(long, value_name = "FILE")]
    sentences_file: Option<PathBuf>,

    /// Language hint (e.g. en-US)
    #[arg(long, value_name = "TAG")]
    language: Option<String>,

    /// Category engine: legacy | enhanced
    #[arg(long, value_name = "ENGINE")]
    category_engine: Option<CategoryEngine>,

    /// Urgency engine: legacy | multilayer | remote
    #[arg(long, value_name = "ENGINE")]
    urgency_engine: Option<UrgencyEngine>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Extract(args) => {
            let config = ConfigResolver::new(cli.config.clone())
                .load()
                .context("Failed to load configuration")?;
            init_tracing(cli.log_level.as_deref(), &config.logging);
            run_extract(args, &config).await
        }
        Command::InitConfig { path, force } => {
            init_tracing(cli.log_level.as_deref(), &LoggingConfig::default());
            run_init_config(path, force)
        }
    }
}

/// Filter priority: --log-level, RUST_LOG, config file level
fn init_tracing(flag: Option<&str>, logging: &LoggingConfig) {
    let filter = match flag {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(logging.ansi)
        .init();
}

async fn run_extract(args: ExtractArgs, config: &TomlConfig) -> Result<()> {
    let mut pipeline_config = PipelineConfig::from(config);
    if let Some(engine) = args.category_engine {
        pipeline_config.category_engine = engine;
    }
    if let Some(engine) = args.urgency_engine {
        pipeline_config.urgency_engine = engine;
    }
    info!(
        category_engine = %pipeline_config.category_engine,
        urgency_engine = %pipeline_config.urgency_engine,
        "Starting extraction"
    );

    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read transcript from stdin")?;
            buf
        }
    };

    let mut input = TranscriptInput::new(text);
    if let Some(path) = &args.sentences_file {
        input = input.with_sentences(read_sentences(path)?);
    }
    if let Some(language) = args.language {
        input = input.with_language_hint(language);
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, cancelling remote scoring");
            on_interrupt.cancel();
        }
    });

    let pipeline = SignalPipeline::new(pipeline_config);
    let signals = pipeline.extract_async(&input, cancel).await;

    let json = if args.compact {
        serde_json::to_string(&signals)
    } else {
        serde_json::to_string_pretty(&signals)
    }
    .context("Failed to serialize signals")?;
    println!("{}", json);
    Ok(())
}

fn read_sentences(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sentences {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

fn run_init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let target = match path.or_else(default_config_path) {
        Some(target) => target,
        None => bail!("No platform config directory; pass a PATH"),
    };
    if target.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", target.display());
    }
    write_toml_config(&TomlConfig::default(), &target)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    println!("{}", target.display());
    Ok(())
}
