//! Report generation for metric-node trees
//!
//! # Implementation Model
//!
//! Two generators are provided:
//! - **Text**: the tab-separated artifact read by chart tools and operators.
//!   Its first line is a `# <timestamp>` comment, the second a header, then
//!   one row per node in pre-order. Every node is validated as it is visited,
//!   so a report is only produced for a complete tree.
//! - **Console**: an indented, optionally coloured summary of the same tree
//!   for terminals.
//!
//! The timestamp is supplied by the caller, which keeps rendering
//! deterministic.

mod common;
mod console;
mod text;

pub use common::validate;
pub use console::generate as generate_console;
pub use text::{generate, report, write_report};

use crate::error::MetricError;
use camino::Utf8PathBuf;

const LOG_TARGET: &str = "   reports";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Incomplete(#[from] MetricError),

    #[error("unable to format the report")]
    Format(#[from] core::fmt::Error),

    #[error("unable to write report to '{path}'")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
