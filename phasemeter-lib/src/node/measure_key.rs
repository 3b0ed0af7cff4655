use crate::schema::DEFAULT_LEVEL;
use compact_str::CompactString;
use core::fmt;

/// Structured key of a measurement slot.
///
/// The three names are kept apart, so a name containing a separator
/// character can never collide with another key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeasureKey {
    phase: CompactString,
    level: CompactString,
    stage: CompactString,
}

impl MeasureKey {
    #[must_use]
    pub fn new(phase: impl Into<CompactString>, level: impl Into<CompactString>, stage: impl Into<CompactString>) -> Self {
        Self {
            phase: phase.into(),
            level: level.into(),
            stage: stage.into(),
        }
    }

    /// Key of a stage in the default level of `phase`.
    #[must_use]
    pub fn in_default_level(phase: impl Into<CompactString>, stage: impl Into<CompactString>) -> Self {
        Self::new(phase, DEFAULT_LEVEL, stage)
    }

    #[must_use]
    pub fn phase(&self) -> &str {
        &self.phase
    }

    #[must_use]
    pub fn level(&self) -> &str {
        &self.level
    }

    #[must_use]
    pub fn stage(&self) -> &str {
        &self.stage
    }
}

impl fmt::Display for MeasureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.level == DEFAULT_LEVEL {
            write!(f, "phase '{}', stage '{}'", self.phase, self.stage)
        } else {
            write!(f, "phase '{}', level '{}', stage '{}'", self.phase, self.level, self.stage)
        }
    }
}
