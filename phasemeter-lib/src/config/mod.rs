//! Validated schemas
//!
//! A [`MetricConfig`] is the result of binding a parsed schema source to a
//! [`Declaration`] made in code. The source supplies the structure (stages,
//! levels, phases, attributes, unit); the declaration supplies a calculator
//! per phase and the display [`Scale`]. Construction either fully succeeds or
//! fails, so no partially valid schema is ever visible.

mod declaration;
mod metric_config;
mod scale;

pub use declaration::{Declaration, PhaseDecl};
pub use metric_config::MetricConfig;
pub use scale::{Scale, format_scaled};

const LOG_TARGET: &str = "    config";
