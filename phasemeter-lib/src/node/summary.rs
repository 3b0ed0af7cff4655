use compact_str::CompactString;

/// Computed values of one phase for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSummary {
    phase: CompactString,
    levels: Vec<(CompactString, i64)>,
    total: i64,
}

impl PhaseSummary {
    pub(crate) fn new<'a>(phase: &str, levels: impl Iterator<Item = (&'a str, i64)>, total: i64) -> Self {
        Self {
            phase: phase.into(),
            levels: levels.map(|(name, value)| (name.into(), value)).collect(),
            total,
        }
    }

    #[must_use]
    pub fn phase(&self) -> &str {
        &self.phase
    }

    /// Level values in schema order, the default level included.
    pub fn levels(&self) -> impl Iterator<Item = (&str, i64)> {
        self.levels.iter().map(|(name, value)| (name.as_str(), *value))
    }

    #[must_use]
    pub fn level(&self, name: &str) -> Option<i64> {
        self.levels().find(|(level, _)| *level == name).map(|(_, value)| value)
    }

    /// Largest level value, zero when the phase has no levels.
    #[must_use]
    pub fn max_level(&self) -> i64 {
        self.levels().map(|(_, value)| value).max().unwrap_or_default()
    }

    #[must_use]
    pub const fn total(&self) -> i64 {
        self.total
    }
}
