use super::{Declaration, Scale};
use crate::error::SchemaError;
use crate::grammar::Grammar;
use crate::node::MeasureKey;
use crate::schema::{Phase, Stage, check_levels};
use compact_str::CompactString;
use std::collections::HashSet;
use std::sync::Arc;

/// A fully validated schema shared by every node of one criterion.
#[derive(Debug)]
pub struct MetricConfig {
    identifier: CompactString,
    attributes: Vec<CompactString>,
    phases: Vec<Phase>,
    measure_unit: CompactString,
    scale: Scale,
}

impl MetricConfig {
    /// Parse `source` and bind it to the code-side `declaration`.
    ///
    /// # Errors
    ///
    /// Fails if the source does not parse, or if the declared phases and the
    /// phases of the source do not match one to one by name.
    pub fn from_source(source: &str, declaration: Declaration) -> Result<Self, SchemaError> {
        Self::bind(Grammar::parse(source)?, declaration)
    }

    /// Bind a parsed grammar to the code-side declaration.
    ///
    /// Every declared phase takes its levels from the grammar phase of the
    /// same (case-sensitive) name. Phases are kept in declaration order.
    ///
    /// # Errors
    ///
    /// Fails if nothing is declared, a name is declared twice, a declared
    /// phase is missing from the grammar, or a grammar phase is not declared.
    pub fn bind(grammar: Grammar, declaration: Declaration) -> Result<Self, SchemaError> {
        let (declared, scale) = declaration.into_parts();
        if declared.is_empty() {
            return Err(SchemaError::EmptyPhaseList);
        }

        let mut bound = HashSet::new();
        let mut phases = Vec::with_capacity(declared.len());
        for decl in declared {
            if !bound.insert(CompactString::from(decl.name())) {
                return Err(SchemaError::DuplicatePhase(decl.name().into()));
            }

            let layout = grammar
                .phase(decl.name())
                .ok_or_else(|| SchemaError::PhaseNotInSchema(decl.name().into()))?;

            check_levels(&layout.name, &layout.levels)?;
            phases.push(Phase::new(layout.name.clone(), layout.levels.clone(), Arc::clone(decl.calculator()))?);
        }

        if let Some(extra) = grammar.phases.iter().find(|layout| !bound.contains(&layout.name)) {
            return Err(SchemaError::PhaseNotDeclared(extra.name.clone()));
        }

        log::debug!(
            target: super::LOG_TARGET,
            "bound schema '{}' with phases [{}]",
            grammar.identifier,
            phases.iter().map(Phase::name).collect::<Vec<_>>().join(", ")
        );

        Ok(Self {
            identifier: grammar.identifier,
            attributes: grammar.attributes,
            phases,
            measure_unit: grammar.measure_unit,
            scale,
        })
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn attributes(&self) -> &[CompactString] {
        &self.attributes
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attribute| attribute == name)
    }

    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    #[must_use]
    pub fn phase(&self, name: &str) -> Option<&Phase> {
        self.phases.iter().find(|phase| phase.name() == name)
    }

    #[must_use]
    pub fn measure_unit(&self) -> &str {
        &self.measure_unit
    }

    #[must_use]
    pub const fn scale(&self) -> &Scale {
        &self.scale
    }

    /// Apply the display scale to a raw or computed value.
    #[must_use]
    pub fn scaled(&self, raw: i64) -> f64 {
        self.scale.apply(raw)
    }

    /// The stage addressed by `key`, if the schema declares it.
    #[must_use]
    pub fn stage(&self, key: &MeasureKey) -> Option<&Stage> {
        self.phase(key.phase())?.level(key.level())?.stage(key.stage())
    }

    #[must_use]
    pub fn declares(&self, key: &MeasureKey) -> bool {
        self.stage(key).is_some()
    }

    /// Every declared measurement key with its stage, in schema order.
    pub fn declared_keys(&self) -> impl Iterator<Item = (MeasureKey, &Stage)> {
        self.phases.iter().flat_map(|phase| {
            phase.levels().iter().flat_map(move |level| {
                level
                    .stages()
                    .iter()
                    .map(move |stage| (MeasureKey::new(phase.name(), level.name(), stage.name()), stage))
            })
        })
    }

    /// Keys whose values propagate from children on merge.
    pub fn shared_keys(&self) -> impl Iterator<Item = MeasureKey> {
        self.declared_keys().filter(|(_, stage)| stage.is_shared()).map(|(key, _)| key)
    }
}
