//! RTLS Viewer - headless host for the device map
//!
//! Reads a JSON-lines event script (feed events, pointer/wheel input and frame
//! ticks) and writes outgoing feed messages and rendered frames as JSON lines.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::info;

use rtls_viewer_lib::config::ViewerConfig;
use rtls_viewer_lib::{run_session, AppState};

#[derive(Parser)]
#[command(
    name = "rtls-viewer",
    version,
    about = "Render the RTLS device map from a feed/input event script"
)]
struct Cli {
    /// Configuration file path (JSON)
    #[arg(long, env = "RTLS_VIEWER_CONFIG")]
    config: Option<PathBuf>,

    /// Event script to replay; reads stdin when omitted
    #[arg(long)]
    script: Option<PathBuf>,

    /// Set log level (overrides RUST_LOG)
    #[arg(long, value_enum, env = "RTLS_VIEWER_LOG_LEVEL")]
    log_level: Option<LogLevel>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(level) = cli.log_level {
        logger.filter_level(level.into());
    }
    logger.init();

    info!("RTLS Viewer v{} starting", env!("CARGO_PKG_VERSION"));

    let config = ViewerConfig::load(cli.config.as_deref())?;
    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let mut state = AppState::from_config(&config).context("Invalid viewer configuration")?;
    let stdout = io::stdout().lock();

    let stats = match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            run_session(&mut state, BufReader::new(file), stdout)?
        }
        None => run_session(&mut state, io::stdin().lock(), stdout)?,
    };

    info!("rendered {} frames", stats.frames);
    Ok(())
}
