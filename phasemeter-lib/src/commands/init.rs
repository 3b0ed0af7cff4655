use super::Host;
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ohno::IntoAppError;
use std::fs;
use std::io::Write;

/// Annotated sample schema written by `init`.
pub const DEFAULT_SCHEMA: &str = include_str!("../../default_schema.properties");

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output schema file path
    #[arg(value_name = "PATH", default_value = "phasemeter.properties")]
    pub output: Utf8PathBuf,
}

fn save_default(output_path: &Utf8Path) -> Result<()> {
    fs::write(output_path, DEFAULT_SCHEMA).into_app_err_with(|| format!("writing default schema to {output_path}"))?;
    Ok(())
}

pub fn init_schema<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    save_default(&args.output)?;
    let _ = writeln!(host.output(), "Generated default schema file: {}", args.output);
    Ok(())
}
