use super::Stage;
use crate::error::SchemaError;
use compact_str::CompactString;
use core::fmt;
use std::collections::HashSet;
use std::sync::Arc;

/// Name of the level synthesized for a phase that declares its stages directly.
pub const DEFAULT_LEVEL: &str = "";

/// An ordered sequence of stages measured at one depth of a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    name: CompactString,
    stages: Arc<[Stage]>,
}

impl Level {
    #[must_use]
    pub fn new(name: impl Into<CompactString>, stages: impl Into<Arc<[Stage]>>) -> Self {
        Self {
            name: name.into(),
            stages: stages.into(),
        }
    }

    /// The single level of a phase declared without explicit levels.
    #[must_use]
    pub fn default_level(stages: impl Into<Arc<[Stage]>>) -> Self {
        Self::new(DEFAULT_LEVEL, stages)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    #[must_use]
    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.name() == name)
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_LEVEL
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Check the structural rules every phase's level list must satisfy.
///
/// The list must be non-empty, level names must not repeat, and every level
/// must carry exactly the stage sequence of the first one (same names, same
/// shared flags, same order).
pub(crate) fn check_levels(phase: &str, levels: &[Level]) -> Result<(), SchemaError> {
    let Some(first) = levels.first() else {
        return Err(SchemaError::EmptyLevelList(phase.into()));
    };

    let mut seen = HashSet::new();
    for level in levels {
        if !seen.insert(level.name()) {
            return Err(SchemaError::RepeatedLevel {
                phase: phase.into(),
                level: level.name.clone(),
            });
        }

        if level.stages() != first.stages() {
            return Err(SchemaError::MismatchedStages {
                phase: phase.into(),
                first: first.name.clone(),
                other: level.name.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_end() -> Vec<Stage> {
        vec![Stage::new("Start", true), Stage::new("End", true)]
    }

    #[test]
    fn test_default_level_uses_reserved_name() {
        let level = Level::default_level(start_end());
        assert!(level.is_default());
        assert_eq!(level.name(), DEFAULT_LEVEL);
    }

    #[test]
    fn test_stage_lookup() {
        let level = Level::new("One", start_end());
        assert!(level.stage("End").is_some());
        assert!(level.stage("end").is_none());
    }

    #[test]
    fn test_check_levels_accepts_identical_sequences() {
        let levels = vec![Level::new("One", start_end()), Level::new("Two", start_end())];
        check_levels("Merge", &levels).unwrap();
    }

    #[test]
    fn test_check_levels_rejects_reordered_stages() {
        let mut reversed = start_end();
        reversed.reverse();
        let levels = vec![Level::new("One", start_end()), Level::new("Two", reversed)];
        let err = check_levels("Merge", &levels).unwrap_err();
        assert!(matches!(err, SchemaError::MismatchedStages { ref other, .. } if other == "Two"));
    }

    #[test]
    fn test_check_levels_rejects_different_shared_flag() {
        let levels = vec![
            Level::new("One", start_end()),
            Level::new("Two", vec![Stage::new("Start", true), Stage::new("End", false)]),
        ];
        assert!(matches!(
            check_levels("Merge", &levels),
            Err(SchemaError::MismatchedStages { .. })
        ));
    }

    #[test]
    fn test_check_levels_rejects_repeated_level() {
        let levels = vec![Level::new("One", start_end()), Level::new("One", start_end())];
        assert!(matches!(check_levels("Merge", &levels), Err(SchemaError::RepeatedLevel { .. })));
    }

    #[test]
    fn test_check_levels_rejects_empty_list() {
        assert!(matches!(check_levels("Merge", &[]), Err(SchemaError::EmptyLevelList(_))));
    }
}
