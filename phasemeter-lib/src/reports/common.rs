use crate::error::MetricError;
use crate::node::{LevelMeasurements, MetricNode};
use crate::schema::Phase;
use core::fmt::Write;

/// Check that `node` has every declared attribute and measurement set.
///
/// Only `node` itself is checked; its children are validated when they are
/// rendered.
///
/// # Errors
///
/// Fails on the first missing attribute (in schema order) or missing
/// measurement (in phase, level, stage order).
pub fn validate(node: &MetricNode) -> Result<(), MetricError> {
    let config = node.config();

    if let Some(attribute) = config.attributes().iter().find(|a| node.attribute(a).is_none()) {
        return Err(MetricError::MissingAttribute {
            node: node.identifier().into(),
            attribute: attribute.clone(),
        });
    }

    if let Some((key, _)) = config.declared_keys().find(|(key, _)| node.measurement_at(key).is_none()) {
        return Err(MetricError::MissingMeasurement {
            node: node.identifier().into(),
            key,
        });
    }

    Ok(())
}

/// Column labels of one phase: each non-default level, the total, and the detail.
pub fn phase_columns(phase: &Phase) -> impl Iterator<Item = String> {
    phase
        .levels()
        .iter()
        .filter(|level| !level.is_default())
        .map(move |level| format!("{}[{}]", phase.name(), level.name()))
        .chain([phase.name().to_owned(), format!("{}-DETAIL", phase.name())])
}

/// `{<level>=[<stage>=<measurement>; ...]; ...}` with `NA` for absent measurements.
pub fn phase_detail(levels: &[LevelMeasurements<'_>]) -> String {
    let mut detail = String::from("{");
    for (i, lm) in levels.iter().enumerate() {
        if i > 0 {
            detail.push_str("; ");
        }

        let _ = write!(detail, "{}=[", lm.level.name());
        for (j, entry) in lm.entries.iter().enumerate() {
            if j > 0 {
                detail.push_str("; ");
            }

            match entry.measurement {
                Some(m) => {
                    let _ = write!(detail, "{}={m}", entry.stage.name());
                }
                None => {
                    let _ = write!(detail, "{}=NA", entry.stage.name());
                }
            }
        }
        detail.push(']');
    }
    detail.push('}');
    detail
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{merge_config, sorting_config, sorting_node};
    use std::sync::Arc;

    #[test]
    fn test_validate_reports_missing_attribute() {
        let config = sorting_config();
        let mut node = sorting_node(&config, "n", 0, 1);
        node.set_attribute("NODE", "x").unwrap();

        let err = validate(&node).unwrap_err();
        assert!(matches!(err, MetricError::MissingAttribute { ref attribute, .. } if attribute == "COMPONENT"));

        node.set_attribute("COMPONENT", "y").unwrap();
        validate(&node).unwrap();
    }

    #[test]
    fn test_validate_reports_missing_measurement() {
        let config = sorting_config();
        let mut node = MetricNode::new("n", Arc::clone(&config));
        node.set_attribute("NODE", "x").unwrap();
        node.set_attribute("COMPONENT", "y").unwrap();
        node.set_measure("Sorting", "Start", 0).unwrap();

        let err = validate(&node).unwrap_err();
        assert_eq!(
            err.to_string(),
            "phase 'Sorting', stage 'End' of node 'n' must be set before generating the report"
        );
    }

    #[test]
    fn test_phase_columns() {
        let config = merge_config();
        let merge: Vec<_> = phase_columns(config.phase("Merge").unwrap()).collect();
        assert_eq!(merge, ["Merge[One]", "Merge[Two]", "Merge[Three]", "Merge", "Merge-DETAIL"]);

        let sorting: Vec<_> = phase_columns(config.phase("Sorting").unwrap()).collect();
        assert_eq!(sorting, ["Sorting", "Sorting-DETAIL"]);
    }

    #[test]
    fn test_phase_detail() {
        let config = merge_config();
        let mut node = MetricNode::new("n", Arc::clone(&config));
        node.set_measure("Sorting", "Start", 3).unwrap();

        let phase = config.phase("Sorting").unwrap();
        assert_eq!(phase_detail(&node.phase_measurements(phase)), "{=[Start=3; End=NA]}");

        node.set_level_measure("Merge", "One", "Start", 1).unwrap();
        let phase = config.phase("Merge").unwrap();
        assert_eq!(
            phase_detail(&node.phase_measurements(phase)),
            "{One=[Start=1; End=NA]; Two=[Start=NA; End=NA]; Three=[Start=NA; End=NA]}"
        );
    }
}
