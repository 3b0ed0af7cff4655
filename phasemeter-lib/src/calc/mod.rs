//! Per-phase value reduction
//!
//! Every [`Phase`](crate::schema::Phase) carries a [`ValueCalculator`] that
//! reduces raw measurements in two steps:
//!
//! 1. `level_value` turns one level's ordered stage entries into a single
//!    integer.
//! 2. `phase_value` turns the per-level integers into the phase total.
//!
//! # Implementation Model
//!
//! Both functions must be total. An absent measurement is passed as `None`
//! and must resolve to a deterministic value rather than a failure, since the
//! calculator is invoked from read-only report and chart paths.
//!
//! [`DefaultCalculator`] implements the reference policy used by the bundled
//! schema. It is only a default: a phase can be bound to any implementation,
//! including closures wrapped by [`FnCalculator`].

mod default_policy;
mod fn_calculator;

pub use default_policy::DefaultCalculator;
pub use fn_calculator::FnCalculator;

use crate::node::Measurement;
use crate::schema::Stage;
use core::fmt::Debug;

/// One stage of a level together with the node's measurement for it, if any.
#[derive(Debug, Clone, Copy)]
pub struct StageEntry<'a> {
    pub stage: &'a Stage,
    pub measurement: Option<&'a Measurement>,
}

impl<'a> StageEntry<'a> {
    #[must_use]
    pub const fn new(stage: &'a Stage, measurement: Option<&'a Measurement>) -> Self {
        Self { stage, measurement }
    }
}

/// Computed level values of one phase, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelValues<'a> {
    values: Vec<(&'a str, i64)>,
}

impl<'a> LevelValues<'a> {
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn push(&mut self, level: &'a str, value: i64) {
        self.values.push((level, value));
    }

    #[must_use]
    pub fn get(&self, level: &str) -> Option<i64> {
        self.values.iter().find(|(name, _)| *name == level).map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, i64)> + '_ {
        self.values.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, i64)> for LevelValues<'a> {
    fn from_iter<I: IntoIterator<Item = (&'a str, i64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// The reduction policy attached to a phase.
pub trait ValueCalculator: Debug + Send + Sync {
    /// Reduce one level's stage entries, given in schema order.
    fn level_value(&self, entries: &[StageEntry<'_>]) -> i64;

    /// Reduce the per-level values of a phase into its total.
    fn phase_value(&self, levels: &LevelValues<'_>) -> i64;
}
