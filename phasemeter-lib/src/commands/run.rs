//! Command dispatch logic for phasemeter

use super::{InitArgs, ReportArgs, ValidateArgs, generate_report, init_schema, validate_schema};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "phasemeter", author, version, long_about = None)]
#[command(about = "Aggregate and report hierarchical phase measurements")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an annotated sample schema file
    Init(InitArgs),
    /// Check a schema file and print what it declares
    Validate(ValidateArgs),
    /// Build the tree described by a collection file and report it
    Report(Box<ReportArgs>),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        Command::Init(init_args) => init_schema(host, init_args),
        Command::Validate(validate_args) => validate_schema(host, validate_args),
        Command::Report(report_args) => generate_report(host, report_args),
    }
}
