//! Error types for schema construction and metric-node operations.

use crate::node::MeasureKey;
use camino::Utf8PathBuf;
use compact_str::CompactString;
use std::io;

/// A failure while building a schema from its textual source.
///
/// These are fatal for the schema being built: no partially validated
/// [`MetricConfig`](crate::config::MetricConfig) is ever produced.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("unable to read schema file '{path}'")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: expected 'key=value', found '{text}'")]
    MalformedLine { line: usize, text: String },

    #[error("line {line}: unknown schema field '{field}'")]
    UnknownField { line: usize, field: CompactString },

    #[error("line {line}: schema field '{field}' is set more than once")]
    DuplicateField { line: usize, field: CompactString },

    #[error("schema field '{field}' is required")]
    MissingField { field: &'static str },

    #[error("a bare identifier was expected in field '{field}', '{token}' was found")]
    MalformedIdentifier { field: &'static str, token: CompactString },

    #[error("syntax error in field '{field}': expected {expected}, found '{found}'")]
    Syntax {
        field: &'static str,
        expected: &'static str,
        found: CompactString,
    },

    #[error("attribute names must be unique, remove the duplicate attribute '{0}'")]
    DuplicateAttribute(CompactString),

    #[error("stage names must be unique, remove the duplicate stage '{0}'")]
    DuplicateStage(CompactString),

    #[error("level names must be unique, remove the duplicate level '{0}'")]
    DuplicateLevel(CompactString),

    #[error("phase names must be unique, remove the duplicate phase '{0}'")]
    DuplicatePhase(CompactString),

    #[error("stage '{stage}' appears more than once in '{owner}'")]
    RepeatedStage { owner: CompactString, stage: CompactString },

    #[error("level '{level}' appears more than once in phase '{phase}'")]
    RepeatedLevel { phase: CompactString, level: CompactString },

    #[error("stage '{stage}' referenced by '{owner}' was not declared in 'stages'")]
    UndeclaredStage { owner: CompactString, stage: CompactString },

    #[error("level '{level}' referenced by phase '{phase}' was not declared in 'levels'")]
    UndeclaredLevel { phase: CompactString, level: CompactString },

    #[error("all levels of phase '{phase}' must contain the same sequence of stages ('{first}' and '{other}' differ)")]
    MismatchedStages {
        phase: CompactString,
        first: CompactString,
        other: CompactString,
    },

    #[error("phase '{0}' is declared in code but not in the schema source (names are case sensitive)")]
    PhaseNotInSchema(CompactString),

    #[error("phase '{0}' is described in the schema source but was not declared in code (names are case sensitive)")]
    PhaseNotDeclared(CompactString),

    #[error("there must be at least one measurement phase")]
    EmptyPhaseList,

    #[error("phase '{0}' must contain at least one level")]
    EmptyLevelList(CompactString),
}

/// A failure of a runtime operation on a registry, a metric node, or a report.
#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("criterion '{0}' is already registered")]
    DuplicateCriterion(CompactString),

    #[error("criterion '{0}' must be registered before creating metric nodes")]
    UnregisteredCriterion(CompactString),

    #[error("attribute '{attribute}' is not declared by schema '{config}'")]
    UnknownAttribute { config: CompactString, attribute: CompactString },

    #[error("attribute '{attribute}' of node '{node}' is already set to '{value}'")]
    AttributeAlreadySet {
        node: CompactString,
        attribute: CompactString,
        value: String,
    },

    #[error("{key} is not declared by schema '{config}'")]
    UnknownMeasureKey { config: CompactString, key: MeasureKey },

    #[error("{key} of node '{node}' is already set")]
    MeasurementAlreadySet { node: CompactString, key: MeasureKey },

    #[error("cannot merge node '{child}' configured as '{child_config}' into node '{parent}' configured as '{parent_config}'")]
    ConfigMismatch {
        parent: CompactString,
        parent_config: CompactString,
        child: CompactString,
        child_config: CompactString,
    },

    #[error("node '{parent}' already has a child named '{child}'")]
    DuplicateChild { parent: CompactString, child: CompactString },

    #[error("child '{child}' is already recorded at {key} of node '{parent}'")]
    DuplicateMerge {
        parent: CompactString,
        child: CompactString,
        key: MeasureKey,
    },

    #[error("{key} of node '{parent}' holds its own value, so child values cannot be merged into it")]
    LeafAtMergeKey { parent: CompactString, key: MeasureKey },

    #[error("attribute '{attribute}' of node '{node}' must be set before generating the report")]
    MissingAttribute { node: CompactString, attribute: CompactString },

    #[error("{key} of node '{node}' must be set before generating the report")]
    MissingMeasurement { node: CompactString, key: MeasureKey },
}
