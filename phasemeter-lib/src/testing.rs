//! Schemas and node builders shared by unit tests.

use crate::config::{Declaration, MetricConfig};
use crate::node::MetricNode;
use std::sync::Arc;

pub const SORTING_SCHEMA: &str = "\
identifier=Sort
attributes=NODE,COMPONENT
measureunit=ms
stages=Start:shared,End:shared
phases=Sorting:(Start,End)
";

pub const MERGE_SCHEMA: &str = "\
identifier=MergeSort
attributes=NODE
measureunit=ms
stages=Start:shared,End:shared
levels=One:(Start,End),Two:(Start,End),Three:(Start,End)
phases=Sorting:(Start,End),Merge:[One,Two,Three]
";

pub fn sorting_config() -> Arc<MetricConfig> {
    Arc::new(MetricConfig::from_source(SORTING_SCHEMA, Declaration::with_default_policy(["Sorting"])).unwrap())
}

pub fn merge_config() -> Arc<MetricConfig> {
    Arc::new(MetricConfig::from_source(MERGE_SCHEMA, Declaration::with_default_policy(["Sorting", "Merge"])).unwrap())
}

/// A node of `config` with its `Sorting` stages set.
pub fn sorting_node(config: &Arc<MetricConfig>, id: &str, start: i64, end: i64) -> MetricNode {
    let mut node = MetricNode::new(id, Arc::clone(config));
    node.set_measure("Sorting", "Start", start).unwrap();
    node.set_measure("Sorting", "End", end).unwrap();
    node
}
