//! Core library for phasemeter
//!
//! This library collects hierarchical performance measurements. A textual
//! schema declares the attributes, stages, levels, and phases a measured node
//! carries; nodes from a distributed run are merged bottom-up into a single
//! tree, and each phase is reduced to a value through a pluggable calculator.
//!
//! # Module Organization
//!
//! - [`grammar`]: Schema source parsing and structural validation
//! - [`schema`]: Stage, level, and phase definitions
//! - [`config`]: Schemas bound to application phase declarations
//! - [`registry`]: Lazily built, cached configurations per criterion
//! - [`node`]: Metric nodes, measurements, and the merge engine
//! - [`calc`]: The value calculator protocol and its reference policy
//! - [`query`]: Read-only queries over populated trees
//! - [`reports`]: Text and console report generation
//! - [`commands`]: Command-line interface

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod calc;
pub mod commands;
pub mod config;
pub mod error;
pub mod grammar;
pub mod node;
pub mod query;
pub mod registry;
pub mod reports;
pub mod schema;

#[cfg(test)]
mod testing;

pub use crate::commands::{Host, run};
pub use crate::config::{Declaration, MetricConfig, PhaseDecl, Scale};
pub use crate::error::{MetricError, SchemaError};
pub use crate::node::{Measurement, MetricNode};
pub use crate::registry::{Registry, SchemaSource};
