use crate::config::format_scaled;
use crate::node::MetricNode;
use core::fmt::{self, Write};
use owo_colors::OwoColorize;

const INDENT: &str = "  ";

/// Print an indented summary of the tree: one line per node with its
/// attributes, followed by one line per phase with its scaled total.
///
/// Unlike the text report this does not require the tree to be complete;
/// absent measurements count as whatever the phase calculator makes of them.
pub fn generate<W: Write>(root: &MetricNode, use_colors: bool, writer: &mut W) -> fmt::Result {
    write_node(root, 0, use_colors, writer)
}

fn write_node<W: Write>(node: &MetricNode, depth: usize, use_colors: bool, writer: &mut W) -> fmt::Result {
    let config = node.config();
    let indent = INDENT.repeat(depth);

    if use_colors {
        write!(writer, "{indent}{}", node.identifier().bold())?;
    } else {
        write!(writer, "{indent}{}", node.identifier())?;
    }

    let attributes: Vec<String> = config
        .attributes()
        .iter()
        .filter_map(|name| node.attribute(name).map(|value| format!("{name}={value}")))
        .collect();
    if !attributes.is_empty() {
        let attributes = format!("[{}]", attributes.join(", "));
        if use_colors {
            write!(writer, " {}", attributes.dimmed())?;
        } else {
            write!(writer, " {attributes}")?;
        }
    }
    writeln!(writer)?;

    let unit = config.measure_unit();
    for phase in config.phases() {
        let summary = node.summarize(phase);
        let total = format_scaled(config.scaled(summary.total()));
        let total = if unit.is_empty() { total } else { format!("{total} {unit}") };

        write!(writer, "{indent}{INDENT}{}: ", phase.name())?;
        if use_colors {
            write!(writer, "{}", total.cyan())?;
        } else {
            write!(writer, "{total}")?;
        }

        let levels: Vec<String> = summary
            .levels()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| format!("{name} {}", format_scaled(config.scaled(value))))
            .collect();
        if !levels.is_empty() {
            write!(writer, " ({})", levels.join(", "))?;
        }
        writeln!(writer)?;
    }

    for child in node.children() {
        write_node(child, depth + 1, use_colors, writer)?;
    }

    Ok(())
}
