use super::{MeasureKey, Measurement, PhaseSummary};
use crate::calc::{LevelValues, StageEntry};
use crate::config::MetricConfig;
use crate::error::MetricError;
use crate::schema::{DEFAULT_LEVEL, Level, Phase};
use compact_str::CompactString;
use std::collections::HashMap;
use std::sync::Arc;

/// One entity of a measured run: its attributes, raw measurements, and the
/// child nodes merged into it.
///
/// Attributes and measurements are set once per key. Children are owned and
/// kept in merge order.
#[derive(Debug, Clone)]
pub struct MetricNode {
    pub(super) identifier: CompactString,
    pub(super) config: Arc<MetricConfig>,
    pub(super) attributes: HashMap<CompactString, String>,
    pub(super) measurements: HashMap<MeasureKey, Measurement>,
    pub(super) children: Vec<Self>,
}

/// One level's ordered stage entries, as fed to a phase calculator.
#[derive(Debug, Clone)]
pub struct LevelMeasurements<'a> {
    pub level: &'a Level,
    pub entries: Vec<StageEntry<'a>>,
}

impl MetricNode {
    #[must_use]
    pub fn new(identifier: impl Into<CompactString>, config: Arc<MetricConfig>) -> Self {
        Self {
            identifier: identifier.into(),
            config,
            attributes: HashMap::new(),
            measurements: HashMap::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn config(&self) -> &Arc<MetricConfig> {
        &self.config
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Set an attribute declared by the node's schema.
    ///
    /// # Errors
    ///
    /// Fails if the attribute is not declared or already has a value.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) -> Result<(), MetricError> {
        if !self.config.has_attribute(name) {
            return Err(MetricError::UnknownAttribute {
                config: self.config.identifier().into(),
                attribute: name.into(),
            });
        }

        if let Some(existing) = self.attributes.get(name) {
            return Err(MetricError::AttributeAlreadySet {
                node: self.identifier.clone(),
                attribute: name.into(),
                value: existing.clone(),
            });
        }

        let _ = self.attributes.insert(name.into(), value.into());
        Ok(())
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Record a raw value for a stage of a phase declared without levels.
    ///
    /// # Errors
    ///
    /// See [`Self::set_level_measure`].
    pub fn set_measure(&mut self, phase: &str, stage: &str, value: i64) -> Result<(), MetricError> {
        self.set_level_measure(phase, DEFAULT_LEVEL, stage, value)
    }

    /// Record a raw value at `(phase, level, stage)`.
    ///
    /// # Errors
    ///
    /// Fails if the key is not declared by the schema or already holds a
    /// measurement.
    pub fn set_level_measure(&mut self, phase: &str, level: &str, stage: &str, value: i64) -> Result<(), MetricError> {
        let key = MeasureKey::new(phase, level, stage);
        if !self.config.declares(&key) {
            return Err(MetricError::UnknownMeasureKey {
                config: self.config.identifier().into(),
                key,
            });
        }

        if self.measurements.contains_key(&key) {
            return Err(MetricError::MeasurementAlreadySet {
                node: self.identifier.clone(),
                key,
            });
        }

        log::trace!(target: super::LOG_TARGET, "node '{}': {key} = {value}", self.identifier);
        let _ = self.measurements.insert(key, Measurement::Leaf(value));
        Ok(())
    }

    #[must_use]
    pub fn measurement(&self, phase: &str, level: &str, stage: &str) -> Option<&Measurement> {
        self.measurement_at(&MeasureKey::new(phase, level, stage))
    }

    #[must_use]
    pub fn measurement_at(&self, key: &MeasureKey) -> Option<&Measurement> {
        self.measurements.get(key)
    }

    /// Every level of `phase` with its stage entries in schema order.
    #[must_use]
    pub fn phase_measurements<'a>(&'a self, phase: &'a Phase) -> Vec<LevelMeasurements<'a>> {
        phase
            .levels()
            .iter()
            .map(|level| LevelMeasurements {
                level,
                entries: level
                    .stages()
                    .iter()
                    .map(|stage| StageEntry::new(stage, self.measurement(phase.name(), level.name(), stage.name())))
                    .collect(),
            })
            .collect()
    }

    /// Compute every level value of `phase` and its total through the phase's calculator.
    #[must_use]
    pub fn summarize(&self, phase: &Phase) -> PhaseSummary {
        let levels: LevelValues<'_> = self
            .phase_measurements(phase)
            .iter()
            .map(|lm| (lm.level.name(), phase.level_value(&lm.entries)))
            .collect();

        let total = phase.phase_value(&levels);
        PhaseSummary::new(phase.name(), levels.iter(), total)
    }

    /// Depth-first, pre-order traversal of this node and all its descendants.
    #[must_use]
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }
}

impl<'a> IntoIterator for &'a MetricNode {
    type Item = &'a MetricNode;
    type IntoIter = PreOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pre-order iterator over a node tree.
#[derive(Debug)]
pub struct PreOrder<'a> {
    stack: Vec<&'a MetricNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a MetricNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
