//! Read-only queries over a finished tree
//!
//! These are the values a timeline or bar-chart view needs. None of them
//! mutates the tree, so they can run concurrently once a tree is populated.

use crate::node::{Measurement, MetricNode};
use crate::schema::Phase;

/// Smallest and largest raw value seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: i64,
    pub end: i64,
}

impl Span {
    #[must_use]
    pub const fn duration(self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    fn widen(self, min: i64, max: i64) -> Self {
        Self {
            start: self.start.min(min),
            end: self.end.max(max),
        }
    }
}

/// The timeline origin of a subtree: the smallest own leaf value recorded by
/// any of its nodes, or `None` when the subtree holds no leaf values.
#[must_use]
pub fn execution_start(root: &MetricNode) -> Option<i64> {
    root.iter()
        .flat_map(|node| {
            node.config()
                .declared_keys()
                .filter_map(move |(key, _)| match node.measurement_at(&key) {
                    Some(Measurement::Leaf(value)) => Some(*value),
                    _ => None,
                })
        })
        .min()
}

/// The range covered by the stages of one level across a subtree.
///
/// Leaf values and merged child values both count. Returns `None` when the
/// phase or level is unknown, or nothing was recorded for it.
#[must_use]
pub fn level_span(root: &MetricNode, phase: &str, level: &str) -> Option<Span> {
    let stages = root.config().phase(phase)?.level(level)?.stages();

    root.iter()
        .flat_map(|node| {
            stages
                .iter()
                .filter_map(|stage| node.measurement(phase, level, stage.name()))
                .filter_map(Measurement::bounds)
        })
        .fold(None, |span: Option<Span>, (min, max)| {
            Some(span.map_or(Span { start: min, end: max }, |s| s.widen(min, max)))
        })
}

/// The largest level value of `phase` among `node` and its direct children.
///
/// Bar charts of one node normalise their bars against this value.
#[must_use]
pub fn max_level_value(node: &MetricNode, phase: &Phase) -> i64 {
    core::iter::once(node)
        .chain(node.children())
        .map(|n| n.summarize(phase).max_level())
        .max()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{merge_config, sorting_config, sorting_node};
    use std::sync::Arc;

    fn tree() -> MetricNode {
        let config = sorting_config();
        let mut root = MetricNode::new("root", Arc::clone(&config));
        root.merge(vec![sorting_node(&config, "A", 12, 90), sorting_node(&config, "B", 5, 10)])
            .unwrap();
        root
    }

    #[test]
    fn test_execution_start_is_smallest_leaf() {
        assert_eq!(execution_start(&tree()), Some(5));
        assert_eq!(execution_start(&MetricNode::new("empty", sorting_config())), None);
    }

    #[test]
    fn test_level_span_covers_subtree() {
        assert_eq!(level_span(&tree(), "Sorting", ""), Some(Span { start: 5, end: 90 }));
        assert_eq!(level_span(&tree(), "Sorting", "").map(Span::duration), Some(85));
        assert_eq!(level_span(&tree(), "Merge", ""), None);
    }

    #[test]
    fn test_max_level_value_includes_children() {
        let config = merge_config();
        let mut a = MetricNode::new("A", Arc::clone(&config));
        a.set_level_measure("Merge", "Two", "Start", 0).unwrap();
        a.set_level_measure("Merge", "Two", "End", 40).unwrap();

        let mut root = MetricNode::new("root", Arc::clone(&config));
        root.merge(vec![a]).unwrap();

        let phase = config.phase("Merge").unwrap();
        assert_eq!(max_level_value(&root, phase), 40);
    }
}
