use super::Host;
use super::common::{LogLevel, init_logging, register_schema};
use crate::Result;
use crate::config::{MetricConfig, Scale};
use crate::registry::Registry;
use crate::schema::Stage;
use camino::Utf8PathBuf;
use clap::Parser;
use core::fmt::Write as _;
use ohno::IntoAppError;
use std::io::Write;
use std::sync::Arc;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the schema file
    #[arg(long, short = 's', value_name = "PATH")]
    pub schema: Utf8PathBuf,

    /// Phases the application declares, in report order (default is every phase of the schema)
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub phases: Option<Vec<String>>,

    /// Criterion to register the schema under
    #[arg(long, value_name = "NAME", default_value = "default")]
    pub criterion: String,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

fn load_config(args: &ValidateArgs) -> Result<Arc<MetricConfig>> {
    let mut registry = Registry::new();
    register_schema(&mut registry, &args.criterion, &args.schema, args.phases.as_deref(), Scale::identity())?;
    registry.config(&args.criterion).into_app_err("binding schema")
}

fn stage_list(stages: &[Stage]) -> String {
    let mut out = String::new();
    for (i, stage) in stages.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(stage.name());
        if stage.is_shared() {
            out.push('*');
        }
    }
    out
}

fn describe(config: &MetricConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Identifier: {}", config.identifier());
    let _ = writeln!(out, "Attributes: {}", config.attributes().join(", "));
    let _ = writeln!(out, "Measure unit: {}", config.measure_unit());

    for phase in config.phases() {
        match phase.levels() {
            [level] if level.is_default() => {
                let _ = writeln!(out, "Phase {}: {}", phase.name(), stage_list(level.stages()));
            }
            levels => {
                let _ = writeln!(out, "Phase {}:", phase.name());
                for level in levels {
                    let _ = writeln!(out, "  {}: {}", level.name(), stage_list(level.stages()));
                }
            }
        }
    }
    out
}

pub fn validate_schema<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    init_logging(args.log_level);

    match load_config(args) {
        Ok(config) => {
            let _ = writeln!(host.output(), "Schema file is valid: {}", args.schema);
            let _ = write!(host.output(), "{}", describe(&config));
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Schema validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}
