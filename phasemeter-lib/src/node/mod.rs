//! The metric-node tree and its merge engine
//!
//! A [`MetricNode`] records attributes and raw [`Measurement`]s keyed by
//! [`MeasureKey`], and owns its children. Both maps are set once per key.
//!
//! # Implementation Model
//!
//! Merging a child copies the child's own leaf values at every *shared*
//! stage key into a composite measurement on the parent, keyed by the child
//! identifier. Only direct children are read, so building a multi-level tree
//! means merging from the bottom up. Nodes are compatible only when they were
//! bound to the very same [`MetricConfig`](crate::config::MetricConfig)
//! instance, which the [`Registry`](crate::registry::Registry) guarantees for
//! nodes of one criterion.
//!
//! Nodes carry no internal locking. Concurrent mutation of one node needs
//! external synchronization, while a finished tree can be read from any
//! number of threads.

mod measure_key;
mod measurement;
mod merge;
mod metric_node;
mod summary;

pub use measure_key::MeasureKey;
pub use measurement::Measurement;
pub use metric_node::{LevelMeasurements, MetricNode, PreOrder};
pub use summary::PhaseSummary;

const LOG_TARGET: &str = "      node";

#[cfg(test)]
mod tests {
    use super::*;

    const _: fn() = || {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MetricNode>();
        assert_send_sync::<PhaseSummary>();
    };

    #[test]
    fn test_finished_tree_is_readable_across_threads() {
        let config = crate::testing::sorting_config();
        let mut root = MetricNode::new("P", std::sync::Arc::clone(&config));
        root.merge(vec![crate::testing::sorting_node(&config, "A", 0, 90)]).unwrap();

        let phase = root.config().phase("Sorting").unwrap();
        let totals: Vec<i64> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..2).map(|_| scope.spawn(|| root.summarize(phase).total())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(totals, [90, 90]);
    }
}
