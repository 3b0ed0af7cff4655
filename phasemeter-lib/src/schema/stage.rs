use compact_str::CompactString;
use core::fmt;

/// A named point within a level at which one raw value is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stage {
    name: CompactString,
    shared: bool,
}

impl Stage {
    #[must_use]
    pub fn new(name: impl Into<CompactString>, shared: bool) -> Self {
        Self { name: name.into(), shared }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a child's value for this stage is propagated into its parent on merge.
    #[must_use]
    pub const fn is_shared(&self) -> bool {
        self.shared
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_equality_includes_shared_flag() {
        assert_eq!(Stage::new("Start", true), Stage::new("Start", true));
        assert_ne!(Stage::new("Start", true), Stage::new("Start", false));
    }

    #[test]
    fn test_stage_display_is_name() {
        assert_eq!(Stage::new("End", false).to_string(), "End");
    }
}
