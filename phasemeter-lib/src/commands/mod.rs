//! Command-line interface for phasemeter
//!
//! # Implementation Model
//!
//! Three commands are provided:
//!
//! - **init**: write an annotated sample schema file
//! - **validate**: load a schema through a [`Registry`](crate::registry::Registry),
//!   bind it against a phase declaration, and describe the result
//! - **report**: read a collection file, build and merge the node tree it
//!   describes, then emit the text report and optionally a console summary
//!
//! A collection file is TOML. It names the schema file (relative to itself),
//! the phases to declare, a display divisor, and one `[[node]]` table per
//! node. Exactly one node must have no parent; the tree is assembled
//! bottom-up so every parent merges children that are already complete.
//!
//! All output goes through a [`Host`] so commands can be driven from tests.

mod collection;
mod common;
mod host;
mod init;
mod report;
mod run;
mod validate;

pub use collection::{Collection, MeasureSpec, NodeSpec, SchemaSection};
pub use common::{ColorMode, CommonArgs, LogLevel};
pub use host::Host;
pub use init::{DEFAULT_SCHEMA, InitArgs, init_schema};
pub use report::{ReportArgs, generate_report};
pub use run::run;
pub use validate::{ValidateArgs, validate_schema};
