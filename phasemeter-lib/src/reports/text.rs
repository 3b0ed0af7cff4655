use super::{ReportError, common};
use crate::config::{Scale, format_scaled};
use crate::node::MetricNode;
use camino::Utf8Path;
use chrono::{DateTime, TimeZone};
use core::fmt::Write;
use std::fs::OpenOptions;
use std::io::Write as _;

const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Render the tab-separated report of `root` and its subtree.
///
/// The first line is `# <timestamp>` with its UTC offset, the second the header, then one row per
/// node in pre-order. Each node is validated as it is visited.
///
/// Nothing is written to `writer` unless the whole tree renders.
pub fn generate<W, Tz>(root: &MetricNode, scale: &Scale, timestamp: &DateTime<Tz>, writer: &mut W) -> Result<(), ReportError>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: core::fmt::Display,
{
    let mut out = String::new();
    writeln!(out, "# {}", timestamp.format(TIMESTAMP_FORMAT))?;
    write_header(root, &mut out)?;

    for node in root {
        common::validate(node)?;
        write_row(node, scale, &mut out)?;
    }

    writer.write_str(&out)?;
    Ok(())
}

/// [`generate`] using the display scale of the root's schema.
pub fn report<W, Tz>(root: &MetricNode, timestamp: &DateTime<Tz>, writer: &mut W) -> Result<(), ReportError>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: core::fmt::Display,
{
    generate(root, root.config().scale(), timestamp, writer)
}

/// Render the report into `path`, replacing or appending to its contents.
///
/// The file is only opened once the report has rendered.
pub fn write_report<Tz>(root: &MetricNode, path: &Utf8Path, append: bool, timestamp: &DateTime<Tz>) -> Result<(), ReportError>
where
    Tz: TimeZone,
    Tz::Offset: core::fmt::Display,
{
    let mut out = String::new();
    report(root, timestamp, &mut out)?;

    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .map_err(io_err)?;
    file.write_all(out.as_bytes()).map_err(io_err)?;
    log::info!(target: super::LOG_TARGET, "wrote report of '{}' to '{path}'", root.identifier());
    Ok(())
}

fn write_header(root: &MetricNode, out: &mut String) -> core::fmt::Result {
    let config = root.config();
    out.push_str("IDENTIFIER");
    for attribute in config.attributes() {
        write!(out, "\t{attribute}")?;
    }
    for phase in config.phases() {
        for column in common::phase_columns(phase) {
            write!(out, "\t{column}")?;
        }
    }
    out.push('\n');
    Ok(())
}

fn write_row(node: &MetricNode, scale: &Scale, out: &mut String) -> core::fmt::Result {
    let config = node.config();
    out.push_str(node.identifier());

    for attribute in config.attributes() {
        write!(out, "\t{}", node.attribute(attribute).unwrap_or_default())?;
    }

    for phase in config.phases() {
        let levels = node.phase_measurements(phase);
        let summary = node.summarize(phase);

        for lm in levels.iter().filter(|lm| !lm.level.is_default()) {
            let value = summary.level(lm.level.name()).unwrap_or_default();
            write!(out, "\t{}", format_scaled(scale.apply(value)))?;
        }

        write!(out, "\t{}", format_scaled(scale.apply(summary.total())))?;
        write!(out, "\t{}", common::phase_detail(&levels))?;
    }

    out.push('\n');
    Ok(())
}
