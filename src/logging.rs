use std::fs::File;
use std::io;
use std::path::PathBuf;

use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("couldn't create log file: {0}")]
    Io(#[from] io::Error),
    #[error("a logger is already installed")]
    AlreadyInitialized(#[from] log::SetLoggerError),
    #[error("unknown log level `{0}`")]
    UnknownLevel(String),
}

/// A file that gets its own copy of the log, usually at a more verbose level than the terminal.
#[derive(Debug, Clone)]
pub struct LogFile {
    pub path: PathBuf,
    pub level: LevelFilter,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub terminal_level: LevelFilter,
    pub file: Option<LogFile>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            terminal_level: LevelFilter::Warn,
            file: None,
        }
    }
}

impl LogConfig {
    /// Reads `AVL_LOG` (terminal level) and `AVL_LOG_FILE` (file path, logged at `Debug`).
    pub fn from_env() -> Result<Self, LoggingError> {
        let mut config = Self::default();
        if let Ok(level) = std::env::var("AVL_LOG") {
            config.terminal_level = parse_level(&level)?;
        }
        if let Some(path) = std::env::var_os("AVL_LOG_FILE") {
            config.file = Some(LogFile {
                path: path.into(),
                level: LevelFilter::Debug,
            });
        }
        Ok(config)
    }
}

/// `off|error|warn|info|debug|trace`, case insensitive.
pub fn parse_level(s: &str) -> Result<LevelFilter, LoggingError> {
    s.trim().parse().map_err(|_| LoggingError::UnknownLevel(s.to_owned()))
}

/// Installs the global logger. Can only succeed once per process.
pub fn init(config: &LogConfig) -> Result<(), LoggingError> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(config.terminal_level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
    ];
    if let Some(file) = &config.file {
        loggers.push(WriteLogger::new(file.level, Config::default(), File::create(&file.path)?));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}
