use super::Host;
use super::collection::Collection;
use super::common::{CommonArgs, init_logging};
use crate::Result;
use crate::reports;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Local;
use clap::Parser;
use ohno::IntoAppError;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Path to the collection file describing the measured tree
    #[arg(long, short = 'c', value_name = "PATH")]
    pub collection: Utf8PathBuf,

    /// Write the text report to this file instead of standard output
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Append to the output file instead of replacing it
    #[arg(long, requires = "output")]
    pub append: bool,

    /// Also print an indented summary of the tree
    #[arg(long)]
    pub console: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn generate_report<H: Host>(host: &mut H, args: &ReportArgs) -> Result<()> {
    init_logging(args.common.log_level);

    let collection = Collection::load(&args.collection)?;
    let base_dir = args.collection.parent().unwrap_or_else(|| Utf8Path::new("."));
    let root = collection.build(base_dir)?;
    let timestamp = Local::now();

    if let Some(path) = &args.output {
        reports::write_report(&root, path, args.append, &timestamp).into_app_err("generating report")?;
        let _ = writeln!(host.output(), "Report written to {path}");
    } else {
        let mut out = String::new();
        reports::report(&root, &timestamp, &mut out).into_app_err("generating report")?;
        let _ = write!(host.output(), "{out}");
    }

    if args.console {
        let mut out = String::new();
        reports::generate_console(&root, args.common.color.use_colors(), &mut out).into_app_err("generating console summary")?;
        let _ = write!(host.output(), "{out}");
    }

    Ok(())
}
