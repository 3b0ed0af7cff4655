use super::level::check_levels;
use super::{Level, Stage};
use crate::calc::{LevelValues, StageEntry, ValueCalculator};
use crate::error::SchemaError;
use compact_str::CompactString;
use core::fmt;
use std::sync::Arc;

/// A named category of measurement: one or more levels plus the calculator
/// that reduces them to summary values.
#[derive(Clone)]
pub struct Phase {
    name: CompactString,
    levels: Vec<Level>,
    calculator: Arc<dyn ValueCalculator>,
}

impl Phase {
    /// Create a phase with explicit levels.
    ///
    /// # Errors
    ///
    /// Fails if `levels` is empty, repeats a level name, or if the levels do
    /// not all share the same stage sequence.
    pub fn new(name: impl Into<CompactString>, levels: Vec<Level>, calculator: Arc<dyn ValueCalculator>) -> Result<Self, SchemaError> {
        let name = name.into();
        check_levels(&name, &levels)?;
        Ok(Self { name, levels, calculator })
    }

    /// Create a phase whose stages live in a single synthesized default level.
    #[must_use]
    pub fn without_levels(name: impl Into<CompactString>, stages: impl Into<Arc<[Stage]>>, calculator: Arc<dyn ValueCalculator>) -> Self {
        Self {
            name: name.into(),
            levels: vec![Level::default_level(stages)],
            calculator,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    #[must_use]
    pub fn level(&self, name: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.name() == name)
    }

    /// The stage sequence shared by every level of this phase.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        self.levels.first().map_or(&[], Level::stages)
    }

    #[must_use]
    pub fn calculator(&self) -> &dyn ValueCalculator {
        self.calculator.as_ref()
    }

    #[must_use]
    pub fn level_value(&self, entries: &[StageEntry<'_>]) -> i64 {
        self.calculator.level_value(entries)
    }

    #[must_use]
    pub fn phase_value(&self, levels: &LevelValues<'_>) -> i64 {
        self.calculator.phase_value(levels)
    }
}

impl fmt::Debug for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Phase")
            .field("name", &self.name)
            .field("levels", &self.levels)
            .field("calculator", &self.calculator)
            .finish()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::DefaultCalculator;

    fn stages() -> Vec<Stage> {
        vec![Stage::new("Start", true), Stage::new("End", true)]
    }

    #[test]
    fn test_without_levels_synthesizes_default_level() {
        let phase = Phase::without_levels("Sorting", stages(), Arc::new(DefaultCalculator));
        assert_eq!(phase.levels().len(), 1);
        assert!(phase.levels()[0].is_default());
        assert_eq!(phase.stages().len(), 2);
    }

    #[test]
    fn test_new_validates_levels() {
        let levels = vec![Level::new("One", stages()), Level::new("Two", vec![Stage::new("Start", true)])];
        let result = Phase::new("Merge", levels, Arc::new(DefaultCalculator));
        assert!(matches!(result, Err(SchemaError::MismatchedStages { .. })));
    }

    #[test]
    fn test_level_lookup() {
        let levels = vec![Level::new("One", stages()), Level::new("Two", stages())];
        let phase = Phase::new("Merge", levels, Arc::new(DefaultCalculator)).unwrap();
        assert_eq!(phase.level("Two").map(Level::name), Some("Two"));
        assert!(phase.level("Three").is_none());
    }
}
