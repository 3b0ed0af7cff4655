//! Argument types and setup shared between commands.

use crate::Result;
use crate::config::{Declaration, Scale};
use crate::grammar::Grammar;
use crate::registry::{Registry, SchemaSource};
use camino::Utf8Path;
use clap::{Args, ValueEnum};
use ohno::IntoAppError;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

impl ColorMode {
    #[must_use]
    pub fn use_colors(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => {
                use std::io::{IsTerminal, stdout};
                stdout().is_terminal()
            }
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared by every command
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

/// Initialize the logger based on the log level.
///
/// `RUST_LOG` takes precedence when set. A logger installed earlier in the
/// process is kept.
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Register the schema file at `path` under `criterion`, reading it once.
///
/// Without `phases`, every phase the schema describes is declared with the
/// default policy, in schema order.
pub fn register_schema(
    registry: &mut Registry,
    criterion: &str,
    path: &Utf8Path,
    phases: Option<&[String]>,
    scale: Scale,
) -> Result<()> {
    let text = SchemaSource::File(path.to_path_buf())
        .load()
        .into_app_err_with(|| format!("reading schema '{path}'"))?;

    let phases = match phases {
        Some(phases) => phases.to_vec(),
        None => Grammar::parse(&text)
            .into_app_err_with(|| format!("parsing schema '{path}'"))?
            .phases
            .iter()
            .map(|phase| phase.name.to_string())
            .collect(),
    };

    registry
        .register(criterion, SchemaSource::Text(text), Declaration::with_default_policy(phases).scale(scale))
        .into_app_err_with(|| format!("registering schema '{path}'"))
}
