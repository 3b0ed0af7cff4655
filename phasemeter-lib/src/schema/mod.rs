//! Schema value types: stages, levels, and phases
//!
//! A schema organizes raw measurements in three tiers. A [`Phase`] is a named
//! category of measurement made of one or more [`Level`]s, and every level of
//! a phase is the same ordered sequence of [`Stage`]s. A stage marked as
//! *shared* is propagated from child to parent when metric nodes are merged.
//!
//! Phases declared without explicit levels get a single level named
//! [`DEFAULT_LEVEL`] (the empty string). Report headers omit that level, but
//! its value still contributes to the phase total.
//!
//! Each phase carries its own [`ValueCalculator`](crate::calc::ValueCalculator),
//! bound when the schema is built, rather than inheriting behavior from a base
//! type.

mod level;
mod phase;
mod stage;

pub(crate) use level::check_levels;
pub use level::{DEFAULT_LEVEL, Level};
pub use phase::Phase;
pub use stage::Stage;
