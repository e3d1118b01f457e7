use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::interpreter::{parse_program_with_version, run_program};

#[derive(Parser, Debug)]
#[command(name = "numen")]
#[command(about = "Numen - an interpreter for a small stack language", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset (e.g. debug, numen_core=trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run source files, each as its own program
    Run {
        /// Files to run, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Entry function run after the top-level code
        #[arg(long)]
        entry: Option<String>,

        /// Don't fail when the entry function is missing
        #[arg(long)]
        no_entry: bool,

        /// Cap on live executor frames
        #[arg(long)]
        max_frames: Option<usize>,
    },

    /// Print the parsed functions and Blocks of a file as JSON
    Parse {
        file: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Run the CLI by parsing process arguments
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run_cli_with_args(cli)
}

/// Run the CLI with provided arguments
pub fn run_cli_from_args(args: Vec<String>) -> Result<()> {
    let cli = Cli::parse_from(args);
    run_cli_with_args(cli)
}

/// Internal function that handles CLI commands
fn run_cli_with_args(cli: Cli) -> Result<()> {
    let mut builder = Config::builder()
        .config_path(cli.config.clone())
        .log_level(cli.log_level.clone());
    if let Commands::Run {
        entry,
        no_entry,
        max_frames,
        ..
    } = &cli.command
    {
        builder = builder
            .entry(entry.clone())
            .require_entry(no_entry.then_some(false))
            .max_frames(*max_frames);
    }

    // Load config before anything runs so config errors come first
    let config = builder.build().context("Failed to load configuration")?;
    init_tracing(&config.log_level);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Run { files, .. } => {
            let options = config.run_options();
            for file in &files {
                info!(file = %file.display(), entry = %options.entry, "running");
                let source = read_source(file)?;
                let program = parse_program_with_version(&source, &options.version)
                    .with_context(|| format!("Failed to parse {}", file.display()))?;
                run_program(&program, &options, &mut out)
                    .with_context(|| format!("Failed to run {}", file.display()))?;
            }
        }

        Commands::Parse { file } => {
            let source = read_source(&file)?;
            let program = parse_program_with_version(&source, &config.version)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&program)?)?;
        }

        Commands::Config => {
            write!(out, "{}", toml::to_string_pretty(&config)?)?;
        }
    }

    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Log to stderr; `RUST_LOG` wins over the configured level
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
