use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use crate::error::{GameError, Result};
use crate::level::DEFAULT_MAX_THREAD;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Find the way out before the thread runs out.
#[derive(Clone, Debug, Parser)]
#[command(name = "ariadne", version)]
pub struct Cli {
    /// Length of thread available on each level
    #[arg(long, env = "ARIADNE_MAX_THREAD", default_value_t = DEFAULT_MAX_THREAD)]
    pub max_thread: u32,

    /// Seed for maze generation; a random one is picked and logged if unset
    #[arg(long, env = "ARIADNE_SEED")]
    pub seed: Option<u64>,

    /// Write logs to this file (the terminal is taken over by the game)
    #[arg(long, env = "ARIADNE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        if self.max_thread == 0 {
            return Err(GameError::InvalidThread(self.max_thread));
        }
        Ok(())
    }
}

/// Installs a file logger when one was asked for. Without a log file no
/// logger is installed and log macros are no-ops.
pub fn setup_logging(cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.log_file {
        WriteLogger::init(
            cli.log_level.into(),
            ConfigBuilder::new()
                .set_target_level(LevelFilter::Error)
                .build(),
            File::create(path)?,
        )?;
    }
    Ok(())
}
