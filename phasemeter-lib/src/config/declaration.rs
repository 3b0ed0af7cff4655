use super::Scale;
use crate::calc::{DefaultCalculator, FnCalculator, LevelValues, StageEntry, ValueCalculator};
use compact_str::CompactString;
use std::sync::Arc;

/// A phase as declared in code: a name and the calculator bound to it.
///
/// The levels of the phase come from the schema source when the
/// declaration is bound.
#[derive(Debug, Clone)]
pub struct PhaseDecl {
    name: CompactString,
    calculator: Arc<dyn ValueCalculator>,
}

impl PhaseDecl {
    #[must_use]
    pub fn new(name: impl Into<CompactString>, calculator: Arc<dyn ValueCalculator>) -> Self {
        Self {
            name: name.into(),
            calculator,
        }
    }

    /// A phase reduced with [`DefaultCalculator`].
    #[must_use]
    pub fn with_default_policy(name: impl Into<CompactString>) -> Self {
        Self::new(name, Arc::new(DefaultCalculator))
    }

    /// A phase reduced with a pair of closures.
    pub fn from_fns<L, P>(name: impl Into<CompactString>, level: L, phase: P) -> Self
    where
        L: Fn(&[StageEntry<'_>]) -> i64 + Send + Sync + 'static,
        P: Fn(&LevelValues<'_>) -> i64 + Send + Sync + 'static,
    {
        Self::new(name, Arc::new(FnCalculator::new(level, phase)))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn calculator(&self) -> &Arc<dyn ValueCalculator> {
        &self.calculator
    }
}

/// Everything code contributes to a schema: the declared phases, in the
/// order they should be reported, and the display scale.
#[derive(Debug, Clone, Default)]
pub struct Declaration {
    phases: Vec<PhaseDecl>,
    scale: Scale,
}

impl Declaration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare every named phase with the default policy.
    #[must_use]
    pub fn with_default_policy<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        Self {
            phases: names.into_iter().map(PhaseDecl::with_default_policy).collect(),
            scale: Scale::identity(),
        }
    }

    #[must_use]
    pub fn phase(mut self, phase: PhaseDecl) -> Self {
        self.phases.push(phase);
        self
    }

    #[must_use]
    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn phases(&self) -> &[PhaseDecl] {
        &self.phases
    }

    pub(crate) fn into_parts(self) -> (Vec<PhaseDecl>, Scale) {
        (self.phases, self.scale)
    }
}
