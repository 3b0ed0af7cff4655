use super::{LevelValues, StageEntry, ValueCalculator};
use core::fmt;

type LevelFn = dyn Fn(&[StageEntry<'_>]) -> i64 + Send + Sync;
type PhaseFn = dyn Fn(&LevelValues<'_>) -> i64 + Send + Sync;

/// A calculator built from a pair of closures.
pub struct FnCalculator {
    level: Box<LevelFn>,
    phase: Box<PhaseFn>,
}

impl FnCalculator {
    pub fn new<L, P>(level: L, phase: P) -> Self
    where
        L: Fn(&[StageEntry<'_>]) -> i64 + Send + Sync + 'static,
        P: Fn(&LevelValues<'_>) -> i64 + Send + Sync + 'static,
    {
        Self {
            level: Box::new(level),
            phase: Box::new(phase),
        }
    }
}

impl fmt::Debug for FnCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnCalculator")
    }
}

impl ValueCalculator for FnCalculator {
    fn level_value(&self, entries: &[StageEntry<'_>]) -> i64 {
        (self.level)(entries)
    }

    fn phase_value(&self, levels: &LevelValues<'_>) -> i64 {
        (self.phase)(levels)
    }
}
