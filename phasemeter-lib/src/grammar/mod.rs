//! The textual schema grammar
//!
//! A schema source is a list of `key=value` lines:
//!
//! ```text
//! identifier=<id>
//! attributes=<id>[,<id>]*
//! measureunit=<string>
//! stages=<id>[:shared][,<id>[:shared]]*
//! levels=<id>:(<stage>[,<stage>]*)[,...]*
//! phases=<id>:(<stage>,...) | <id>:[<level>,...][,...]*
//! ```
//!
//! [`Grammar::parse`] reads the lines, tokenizes each field value, and runs a
//! small recursive-descent parser over the tokens. Every referenced stage and
//! level must be declared by the `stages` and `levels` fields. The result
//! describes the structure only; calculators are bound later by
//! [`MetricConfig`](crate::config::MetricConfig).

mod identifier;
mod lexer;
mod parser;
mod properties;

pub use identifier::is_identifier;

use crate::error::SchemaError;
use crate::schema::{Level, Stage, check_levels};
use compact_str::CompactString;
use parser::{Group, Members};
use std::collections::HashSet;
use std::sync::Arc;
use strum::{EnumString, IntoStaticStr};

const LOG_TARGET: &str = "   grammar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
enum Field {
    Identifier,
    Attributes,
    MeasureUnit,
    Stages,
    Levels,
    Phases,
}

impl Field {
    fn name(self) -> &'static str {
        self.into()
    }
}

/// A phase as described by the source: its name and levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseLayout {
    pub name: CompactString,
    pub levels: Vec<Level>,
}

/// The validated structure of a schema source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    pub identifier: CompactString,
    pub attributes: Vec<CompactString>,
    pub measure_unit: CompactString,
    pub stages: Vec<Stage>,
    pub levels: Vec<Level>,
    pub phases: Vec<PhaseLayout>,
}

#[derive(Debug, Default)]
struct Fields {
    values: [Option<String>; 6],
}

impl Fields {
    const fn slot(field: Field) -> usize {
        field as usize
    }

    fn take(&mut self, field: Field) -> Option<String> {
        self.values[Self::slot(field)].take()
    }

    fn require(&mut self, field: Field) -> Result<String, SchemaError> {
        self.take(field).ok_or(SchemaError::MissingField { field: field.name() })
    }
}

impl Grammar {
    /// Parse and validate a schema source.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed line, unknown or repeated field, syntax
    /// error, malformed identifier, duplicate name, or undeclared reference.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let mut fields = Fields::default();
        for property in properties::read(text)? {
            let Ok(field) = property.key.parse::<Field>() else {
                return Err(SchemaError::UnknownField {
                    line: property.line,
                    field: property.key.into(),
                });
            };

            let slot = &mut fields.values[Fields::slot(field)];
            if slot.is_some() {
                return Err(SchemaError::DuplicateField {
                    line: property.line,
                    field: property.key.into(),
                });
            }
            *slot = Some(property.value);
        }

        let identifier = identifier::identifier(Field::Identifier.name(), &fields.require(Field::Identifier)?)?;
        let attributes = parse_attributes(&fields.take(Field::Attributes).unwrap_or_default())?;
        let measure_unit = fields.take(Field::MeasureUnit).unwrap_or_default().into();
        let stages = parse_stages(&fields.require(Field::Stages)?)?;
        let levels = parse_levels(&fields.take(Field::Levels).unwrap_or_default(), &stages)?;
        let phases = parse_phases(&fields.require(Field::Phases)?, &stages, &levels)?;

        warn_unused(&identifier, &stages, &levels, &phases);
        log::debug!(
            target: LOG_TARGET,
            "parsed schema '{identifier}': {} attributes, {} stages, {} levels, {} phases",
            attributes.len(),
            stages.len(),
            levels.len(),
            phases.len()
        );

        Ok(Self {
            identifier,
            attributes,
            measure_unit,
            stages,
            levels,
            phases,
        })
    }

    #[must_use]
    pub fn phase(&self, name: &str) -> Option<&PhaseLayout> {
        self.phases.iter().find(|phase| phase.name == name)
    }
}

fn parse_attributes(source: &str) -> Result<Vec<CompactString>, SchemaError> {
    let attributes = parser::identifier_list(Field::Attributes.name(), source)?;
    let mut seen = HashSet::new();
    for attribute in &attributes {
        if !seen.insert(attribute) {
            return Err(SchemaError::DuplicateAttribute(attribute.clone()));
        }
    }
    Ok(attributes)
}

fn parse_stages(source: &str) -> Result<Vec<Stage>, SchemaError> {
    let stages = parser::stage_list(Field::Stages.name(), source)?;
    let mut seen = HashSet::new();
    for stage in &stages {
        if !seen.insert(stage.name()) {
            return Err(SchemaError::DuplicateStage(stage.name().into()));
        }
    }
    Ok(stages)
}

fn resolve_stages(owner: &str, names: &[CompactString], declared: &[Stage]) -> Result<Arc<[Stage]>, SchemaError> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|name| {
            if !seen.insert(name) {
                return Err(SchemaError::RepeatedStage {
                    owner: owner.into(),
                    stage: name.clone(),
                });
            }

            declared
                .iter()
                .find(|stage| *name == stage.name())
                .cloned()
                .ok_or_else(|| SchemaError::UndeclaredStage {
                    owner: owner.into(),
                    stage: name.clone(),
                })
        })
        .collect()
}

fn parse_levels(source: &str, stages: &[Stage]) -> Result<Vec<Level>, SchemaError> {
    let field = Field::Levels.name();
    let mut levels: Vec<Level> = Vec::new();

    for Group { name, members } in parser::group_list(field, source)? {
        let Members::Stages(stage_names) = members else {
            return Err(SchemaError::Syntax {
                field,
                expected: "'('",
                found: "[".into(),
            });
        };

        if levels.iter().any(|level| name == level.name()) {
            return Err(SchemaError::DuplicateLevel(name));
        }

        let resolved = resolve_stages(&name, &stage_names, stages)?;
        levels.push(Level::new(name, resolved));
    }

    Ok(levels)
}

fn parse_phases(source: &str, stages: &[Stage], levels: &[Level]) -> Result<Vec<PhaseLayout>, SchemaError> {
    let mut phases: Vec<PhaseLayout> = Vec::new();

    for Group { name, members } in parser::group_list(Field::Phases.name(), source)? {
        if phases.iter().any(|phase| phase.name == name) {
            return Err(SchemaError::DuplicatePhase(name));
        }

        let phase_levels = match members {
            Members::Stages(stage_names) => vec![Level::default_level(resolve_stages(&name, &stage_names, stages)?)],
            Members::Levels(level_names) => level_names
                .iter()
                .map(|level_name| {
                    levels
                        .iter()
                        .find(|level| *level_name == level.name())
                        .cloned()
                        .ok_or_else(|| SchemaError::UndeclaredLevel {
                            phase: name.clone(),
                            level: level_name.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        check_levels(&name, &phase_levels)?;
        phases.push(PhaseLayout { name, levels: phase_levels });
    }

    if phases.is_empty() {
        return Err(SchemaError::EmptyPhaseList);
    }

    Ok(phases)
}

fn warn_unused(identifier: &str, stages: &[Stage], levels: &[Level], phases: &[PhaseLayout]) {
    let used_levels: HashSet<&str> = phases.iter().flat_map(|p| p.levels.iter().map(Level::name)).collect();
    for level in levels.iter().filter(|level| !used_levels.contains(level.name())) {
        log::warn!(target: LOG_TARGET, "schema '{identifier}': level '{level}' is declared but no phase uses it");
    }

    let used_stages: HashSet<&str> = levels
        .iter()
        .chain(phases.iter().flat_map(|p| p.levels.iter()))
        .flat_map(|level| level.stages().iter().map(Stage::name))
        .collect();
    for stage in stages.iter().filter(|stage| !used_stages.contains(stage.name())) {
        log::warn!(target: LOG_TARGET, "schema '{identifier}': stage '{stage}' is declared but never used");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MERGE_SCHEMA, SORTING_SCHEMA};

    #[test]
    fn test_parses_default_level_phase() {
        let grammar = Grammar::parse(SORTING_SCHEMA).unwrap();
        assert_eq!(grammar.identifier, "Sort");
        assert_eq!(grammar.attributes, ["NODE", "COMPONENT"]);
        assert_eq!(grammar.measure_unit, "ms");

        let sorting = grammar.phase("Sorting").unwrap();
        assert_eq!(sorting.levels.len(), 1);
        assert!(sorting.levels[0].is_default());
        assert_eq!(sorting.levels[0].stages(), [Stage::new("Start", true), Stage::new("End", true)]);
    }

    #[test]
    fn test_parses_explicit_levels() {
        let grammar = Grammar::parse(MERGE_SCHEMA).unwrap();
        let merge = grammar.phase("Merge").unwrap();
        let names: Vec<_> = merge.levels.iter().map(Level::name).collect();
        assert_eq!(names, ["One", "Two", "Three"]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(Grammar::parse(MERGE_SCHEMA).unwrap(), Grammar::parse(MERGE_SCHEMA).unwrap());
    }

    #[test]
    fn test_optional_fields_default_to_empty() {
        let grammar = Grammar::parse("identifier=x\nstages=A,B\nphases=P:(A,B)").unwrap();
        assert!(grammar.attributes.is_empty());
        assert!(grammar.levels.is_empty());
        assert!(grammar.measure_unit.is_empty());
    }

    #[test]
    fn test_missing_required_field() {
        let err = Grammar::parse("identifier=x\nstages=A").unwrap_err();
        assert!(matches!(err, SchemaError::MissingField { field: "phases" }));
    }

    #[test]
    fn test_unknown_field() {
        let err = Grammar::parse("identifier=x\nstage=A").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownField { line: 2, ref field } if field == "stage"));
    }

    #[test]
    fn test_field_names_are_case_sensitive() {
        assert!(matches!(
            Grammar::parse("Identifier=x"),
            Err(SchemaError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_repeated_field() {
        let err = Grammar::parse("identifier=x\nidentifier=y").unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { line: 2, .. }));
    }

    #[test]
    fn test_malformed_identifier() {
        let err = Grammar::parse("identifier=my-schema\nstages=A\nphases=P:(A)").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedIdentifier { field: "identifier", .. }));
    }

    #[test]
    fn test_duplicate_names() {
        let cases = [
            ("identifier=x\nattributes=A,A\nstages=S\nphases=P:(S)", "attribute"),
            ("identifier=x\nstages=S,S:shared\nphases=P:(S)", "stage"),
            ("identifier=x\nstages=S\nlevels=L:(S),L:(S)\nphases=P:[L]", "level"),
            ("identifier=x\nstages=S\nphases=P:(S),P:(S)", "phase"),
        ];

        for (source, kind) in cases {
            let err = Grammar::parse(source).unwrap_err();
            let ok = match kind {
                "attribute" => matches!(err, SchemaError::DuplicateAttribute(_)),
                "stage" => matches!(err, SchemaError::DuplicateStage(_)),
                "level" => matches!(err, SchemaError::DuplicateLevel(_)),
                _ => matches!(err, SchemaError::DuplicatePhase(_)),
            };
            assert!(ok, "{kind}: {err}");
        }
    }

    #[test]
    fn test_undeclared_references() {
        let err = Grammar::parse("identifier=x\nstages=S\nlevels=L:(S,T)\nphases=P:[L]").unwrap_err();
        assert!(matches!(err, SchemaError::UndeclaredStage { ref stage, .. } if stage == "T"));

        let err = Grammar::parse("identifier=x\nstages=S\nlevels=L:(S)\nphases=P:[L,M]").unwrap_err();
        assert!(matches!(err, SchemaError::UndeclaredLevel { ref level, .. } if level == "M"));

        let err = Grammar::parse("identifier=x\nstages=S\nphases=P:(S,T)").unwrap_err();
        assert!(matches!(err, SchemaError::UndeclaredStage { ref owner, .. } if owner == "P"));
    }

    #[test]
    fn test_repeated_stage_in_level() {
        let err = Grammar::parse("identifier=x\nstages=S\nlevels=L:(S,S)\nphases=P:[L]").unwrap_err();
        assert!(matches!(err, SchemaError::RepeatedStage { .. }));
    }

    #[test]
    fn test_mismatched_stage_sequences() {
        let source = "identifier=x\nstages=A,B\nlevels=One:(A,B),Two:(B,A)\nphases=P:[One,Two]";
        assert!(matches!(Grammar::parse(source), Err(SchemaError::MismatchedStages { .. })));
    }

    #[test]
    fn test_empty_phase_list() {
        assert!(matches!(
            Grammar::parse("identifier=x\nstages=A\nphases="),
            Err(SchemaError::EmptyPhaseList)
        ));
    }

    #[test]
    fn test_levels_use_parentheses_only() {
        let err = Grammar::parse("identifier=x\nstages=A\nlevels=L:[A]\nphases=P:[L]").unwrap_err();
        assert!(matches!(err, SchemaError::Syntax { field: "levels", .. }));
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        let tight = Grammar::parse("identifier=x\nstages=A:shared,B\nlevels=L:(A,B)\nphases=P:[L],Q:(A,B)").unwrap();
        let loose = Grammar::parse(
            "identifier = x\nstages = A : shared , B\nlevels = L : ( A , B )\nphases = P : [ L ] , Q : ( A , B )",
        )
        .unwrap();
        assert_eq!(tight, loose);
    }
}
