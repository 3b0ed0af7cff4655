use super::{LOG_TARGET, MeasureKey, Measurement, MetricNode};
use crate::error::MetricError;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

impl MetricNode {
    /// Check whether `children` could be merged into this node without
    /// touching it.
    ///
    /// # Errors
    ///
    /// Returns the first failure [`Self::merge`] would report.
    pub fn check_merge(&self, children: &[Self]) -> Result<(), MetricError> {
        let shared: Vec<MeasureKey> = self.config.shared_keys().collect();
        let mut pending: HashSet<(&MeasureKey, &str)> = HashSet::new();
        let mut batch: HashSet<&str> = HashSet::new();

        for child in children {
            if !Arc::ptr_eq(&self.config, &child.config) {
                return Err(MetricError::ConfigMismatch {
                    parent: self.identifier.clone(),
                    parent_config: self.config.identifier().into(),
                    child: child.identifier.clone(),
                    child_config: child.config.identifier().into(),
                });
            }

            for key in &shared {
                let Some(Measurement::Leaf(_)) = child.measurements.get(key) else {
                    continue;
                };

                match self.measurements.get(key) {
                    Some(Measurement::Leaf(_)) => {
                        return Err(MetricError::LeafAtMergeKey {
                            parent: self.identifier.clone(),
                            key: key.clone(),
                        });
                    }
                    Some(Measurement::Composite(values)) if values.contains_key(child.identifier()) => {
                        return Err(self.duplicate_merge(child, key));
                    }
                    _ => {}
                }

                if !pending.insert((key, child.identifier())) {
                    return Err(self.duplicate_merge(child, key));
                }
            }

            if !batch.insert(child.identifier()) || self.children.iter().any(|c| c.identifier == child.identifier) {
                return Err(MetricError::DuplicateChild {
                    parent: self.identifier.clone(),
                    child: child.identifier.clone(),
                });
            }
        }

        Ok(())
    }

    /// Merge `children` into this node.
    ///
    /// For every shared stage key, each child's own leaf value is recorded
    /// under the child's identifier in this node's composite measurement at
    /// that key. Grandchildren are not visited, so a tree is merged bottom-up.
    /// The children are then appended, in order, after any existing ones.
    ///
    /// Every child is checked before anything is changed, so a failed merge
    /// leaves this node as it was.
    ///
    /// # Errors
    ///
    /// Fails if a child was built from another schema instance, if a child
    /// identifier is already recorded at a shared key or among the children,
    /// or if this node holds its own leaf value at a shared key.
    pub fn merge(&mut self, children: Vec<Self>) -> Result<(), MetricError> {
        self.check_merge(&children)?;

        let config = Arc::clone(&self.config);
        let shared: Vec<MeasureKey> = config.shared_keys().collect();

        for child in &children {
            for key in &shared {
                let Some(Measurement::Leaf(value)) = child.measurements.get(key) else {
                    continue;
                };

                let slot = self
                    .measurements
                    .entry(key.clone())
                    .or_insert_with(|| Measurement::Composite(BTreeMap::new()));

                if let Measurement::Composite(values) = slot {
                    log::trace!(target: LOG_TARGET, "node '{}': {key} <- '{}' = {value}", self.identifier, child.identifier);
                    let _ = values.insert(child.identifier.clone(), *value);
                }
            }
        }

        log::debug!(target: LOG_TARGET, "merged {} children into node '{}'", children.len(), self.identifier);
        self.children.extend(children);
        Ok(())
    }

    fn duplicate_merge(&self, child: &Self, key: &MeasureKey) -> MetricError {
        MetricError::DuplicateMerge {
            parent: self.identifier.clone(),
            child: child.identifier.clone(),
            key: key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DEFAULT_LEVEL;
    use crate::testing::{merge_config, sorting_config, sorting_node};

    #[test]
    fn test_merge_records_shared_values_per_child() {
        let config = sorting_config();
        let mut parent = MetricNode::new("P", Arc::clone(&config));
        let a = sorting_node(&config, "A", 0, 90);
        let b = sorting_node(&config, "B", 5, 10);
        parent.merge(vec![a, b]).unwrap();

        let start = parent.measurement("Sorting", DEFAULT_LEVEL, "Start").unwrap();
        let end = parent.measurement("Sorting", DEFAULT_LEVEL, "End").unwrap();
        assert_eq!(start.to_string(), "0, (A=0, B=5)");
        assert_eq!(end.to_string(), "0, (A=90, B=10)");

        let summary = parent.summarize(config.phase("Sorting").unwrap());
        assert_eq!(summary.total(), 90);
    }

    #[test]
    fn test_merge_preserves_child_order_across_calls() {
        let config = sorting_config();
        let mut parent = MetricNode::new("P", Arc::clone(&config));
        parent.merge(vec![sorting_node(&config, "B", 0, 1)]).unwrap();
        parent.merge(vec![sorting_node(&config, "A", 0, 1), sorting_node(&config, "C", 0, 1)]).unwrap();

        let ids: Vec<_> = parent.children().iter().map(MetricNode::identifier).collect();
        assert_eq!(ids, ["B", "A", "C"]);
        assert_eq!(parent.measurement("Sorting", DEFAULT_LEVEL, "End").unwrap().child_values().len(), 3);
    }

    #[test]
    fn test_merging_same_child_twice_fails() {
        let config = sorting_config();
        let mut parent = MetricNode::new("P", Arc::clone(&config));
        parent.merge(vec![sorting_node(&config, "A", 0, 90)]).unwrap();

        let err = parent.merge(vec![sorting_node(&config, "A", 1, 2)]).unwrap_err();
        assert!(matches!(err, MetricError::DuplicateMerge { ref child, .. } if child == "A"));
    }

    #[test]
    fn test_duplicate_within_one_batch_fails() {
        let config = sorting_config();
        let mut parent = MetricNode::new("P", Arc::clone(&config));
        let err = parent
            .merge(vec![sorting_node(&config, "A", 0, 1), sorting_node(&config, "A", 0, 1)])
            .unwrap_err();
        assert!(matches!(err, MetricError::DuplicateMerge { .. }));
    }

    #[test]
    fn test_duplicate_child_without_shared_values_fails() {
        let config = sorting_config();
        let mut parent = MetricNode::new("P", Arc::clone(&config));
        parent.merge(vec![MetricNode::new("A", Arc::clone(&config))]).unwrap();
        let err = parent.merge(vec![MetricNode::new("A", Arc::clone(&config))]).unwrap_err();
        assert!(matches!(err, MetricError::DuplicateChild { .. }));
    }

    #[test]
    fn test_config_mismatch_is_rejected() {
        let config = sorting_config();
        let mut parent = MetricNode::new("P", Arc::clone(&config));
        let other = MetricNode::new("X", merge_config());
        let err = parent.merge(vec![other]).unwrap_err();
        assert!(matches!(err, MetricError::ConfigMismatch { .. }));
    }

    #[test]
    fn test_identical_content_with_different_identity_is_rejected() {
        let mut parent = MetricNode::new("P", sorting_config());
        let child = sorting_node(&sorting_config(), "A", 0, 1);
        assert!(matches!(parent.merge(vec![child]), Err(MetricError::ConfigMismatch { .. })));
    }

    #[test]
    fn test_parent_leaf_at_shared_key_is_rejected() {
        let config = sorting_config();
        let mut parent = MetricNode::new("P", Arc::clone(&config));
        parent.set_measure("Sorting", "Start", 3).unwrap();
        let err = parent.merge(vec![sorting_node(&config, "A", 0, 1)]).unwrap_err();
        assert!(matches!(err, MetricError::LeafAtMergeKey { .. }));
    }

    #[test]
    fn test_failed_merge_leaves_parent_untouched() {
        let config = sorting_config();
        let mut parent = MetricNode::new("P", Arc::clone(&config));
        let good = sorting_node(&config, "A", 0, 1);
        let bad = MetricNode::new("X", merge_config());

        assert!(parent.merge(vec![good, bad]).is_err());
        assert!(parent.children().is_empty());
        assert!(parent.measurement("Sorting", DEFAULT_LEVEL, "Start").is_none());
    }

    #[test]
    fn test_merge_is_shallow() {
        let config = sorting_config();
        let mut mid = MetricNode::new("M", Arc::clone(&config));
        mid.merge(vec![sorting_node(&config, "leaf", 0, 50)]).unwrap();

        let mut root = MetricNode::new("R", Arc::clone(&config));
        root.merge(vec![mid]).unwrap();

        // The middle node holds only composites, so nothing propagates further up.
        assert!(root.measurement("Sorting", DEFAULT_LEVEL, "Start").is_none());
        assert_eq!(root.children().len(), 1);
    }
}
