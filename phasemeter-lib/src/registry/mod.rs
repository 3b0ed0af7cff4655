//! Criterion registry
//!
//! A [`Registry`] maps each criterion name to a schema source and the phases
//! declared for it. The schema is parsed and bound the first time a node of
//! that criterion is requested, then cached, so every node of a criterion
//! shares one [`MetricConfig`] instance. That cache is the registry's only
//! mutable state.
//!
//! The registry is an ordinary value owned by the caller. Building a config
//! takes `&mut self`, so concurrent first use of one registry needs external
//! synchronization such as a mutex around it.

mod schema_source;

pub use schema_source::SchemaSource;

use crate::config::{Declaration, MetricConfig};
use crate::error::MetricError;
use crate::node::MetricNode;
use compact_str::CompactString;
use std::collections::HashMap;
use std::sync::Arc;

const LOG_TARGET: &str = "  registry";

#[derive(Debug)]
struct Registration {
    source: SchemaSource,
    declaration: Declaration,
    config: Option<Arc<MetricConfig>>,
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<CompactString, Registration>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a criterion. Nothing is parsed until first use.
    ///
    /// # Errors
    ///
    /// Fails if `criterion` is already registered.
    pub fn register(&mut self, criterion: &str, source: impl Into<SchemaSource>, declaration: Declaration) -> Result<(), MetricError> {
        if self.entries.contains_key(criterion) {
            return Err(MetricError::DuplicateCriterion(criterion.into()));
        }

        let source = source.into();
        log::debug!(target: LOG_TARGET, "registered criterion '{criterion}' from {source}");
        let _ = self.entries.insert(
            criterion.into(),
            Registration {
                source,
                declaration,
                config: None,
            },
        );
        Ok(())
    }

    #[must_use]
    pub fn is_registered(&self, criterion: &str) -> bool {
        self.entries.contains_key(criterion)
    }

    /// The shared config of `criterion`, built on first call.
    ///
    /// # Errors
    ///
    /// Fails if `criterion` is not registered, or if the schema cannot be
    /// read, parsed, or bound. Nothing is cached on failure, so a later call
    /// tries again.
    pub fn config(&mut self, criterion: &str) -> Result<Arc<MetricConfig>, MetricError> {
        let Some(registration) = self.entries.get_mut(criterion) else {
            return Err(MetricError::UnregisteredCriterion(criterion.into()));
        };

        if let Some(config) = &registration.config {
            log::trace!(target: LOG_TARGET, "criterion '{criterion}': using cached config");
            return Ok(Arc::clone(config));
        }

        log::debug!(target: LOG_TARGET, "criterion '{criterion}': building config from {}", registration.source);
        let text = registration.source.load()?;
        let config = Arc::new(MetricConfig::from_source(&text, registration.declaration.clone())?);
        registration.config = Some(Arc::clone(&config));
        Ok(config)
    }

    /// Create a new node bound to the shared config of `criterion`.
    ///
    /// # Errors
    ///
    /// See [`Self::config`].
    pub fn get_or_create_node(&mut self, criterion: &str, identifier: &str) -> Result<MetricNode, MetricError> {
        Ok(MetricNode::new(identifier, self.config(criterion)?))
    }
}
