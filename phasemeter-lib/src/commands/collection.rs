//! Collection files: a schema reference plus the nodes of one measured run.
//!
//! ```toml
//! [schema]
//! path = "phasemeter.properties"
//! scale_divisor = 1000.0
//!
//! [[node]]
//! id = "root"
//! children = ["worker-1"]
//! attributes = { NODE = "head" }
//!
//! [[node]]
//! id = "worker-1"
//! measure = [
//!     { phase = "Sorting", stage = "Start", value = 0 },
//!     { phase = "Merge", level = "One", stage = "End", value = 40 },
//! ]
//! ```

use super::common::register_schema;
use crate::Result;
use crate::config::Scale;
use crate::node::MetricNode;
use crate::registry::Registry;
use crate::schema::DEFAULT_LEVEL;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;

const LOG_TARGET: &str = "collection";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Collection {
    pub schema: SchemaSection,

    #[serde(default, rename = "node")]
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaSection {
    /// Name the schema is registered under
    #[serde(default = "default_criterion")]
    pub criterion: String,

    /// Schema file, relative to the collection file
    pub path: String,

    /// Phases to declare, in report order (default is every phase of the schema)
    #[serde(default)]
    pub phases: Option<Vec<String>>,

    /// Raw values are divided by this for display
    #[serde(default = "default_scale_divisor")]
    pub scale_divisor: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    pub id: String,

    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    #[serde(default)]
    pub children: Vec<String>,

    #[serde(default, rename = "measure")]
    pub measures: Vec<MeasureSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeasureSpec {
    pub phase: String,

    #[serde(default)]
    pub level: Option<String>,

    pub stage: String,

    pub value: i64,
}

fn default_criterion() -> String {
    "default".to_owned()
}

const fn default_scale_divisor() -> f64 {
    1.0
}

impl Collection {
    /// Read and parse a collection file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading collection file '{path}'"))?;
        Self::parse(&text).into_app_err_with(|| format!("parsing collection file '{path}'"))
    }

    /// Parse collection text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid collection
    pub fn parse(text: &str) -> Result<Self> {
        let collection: Self = toml::from_str(text).into_app_err("invalid collection TOML")?;
        if !(collection.schema.scale_divisor.is_finite() && collection.schema.scale_divisor > 0.0) {
            return Err(app_err!(
                "scale_divisor must be a positive number, got {}",
                collection.schema.scale_divisor
            ));
        }
        Ok(collection)
    }

    /// The schema file path resolved against the directory holding the collection file.
    #[must_use]
    pub fn schema_path(&self, base_dir: &Utf8Path) -> Utf8PathBuf {
        base_dir.join(&self.schema.path)
    }

    /// Register the schema, create every node, and merge the tree bottom-up.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is invalid, the node list does not form
    /// a single tree, or any attribute, measurement, or merge is rejected
    pub fn build(&self, base_dir: &Utf8Path) -> Result<MetricNode> {
        let schema_path = self.schema_path(base_dir);
        let criterion = self.schema.criterion.as_str();

        let mut registry = Registry::new();
        register_schema(
            &mut registry,
            criterion,
            &schema_path,
            self.schema.phases.as_deref(),
            Scale::divide_by(self.schema.scale_divisor),
        )?;
        let _ = registry
            .config(criterion)
            .into_app_err_with(|| format!("loading schema '{schema_path}'"))?;

        let specs = self.index()?;
        let root = self.root(&specs)?;
        log::debug!(target: LOG_TARGET, "assembling {} nodes under root '{root}'", specs.len());
        assemble(root, &specs, &mut registry, criterion)
    }

    fn index(&self) -> Result<HashMap<&str, &NodeSpec>> {
        let mut specs = HashMap::with_capacity(self.nodes.len());
        for spec in &self.nodes {
            if specs.insert(spec.id.as_str(), spec).is_some() {
                return Err(app_err!("node '{}' is defined more than once", spec.id));
            }
        }
        Ok(specs)
    }

    /// Find the single root and check that the node list forms a tree.
    fn root<'a>(&'a self, specs: &HashMap<&str, &'a NodeSpec>) -> Result<&'a str> {
        let mut parents: HashMap<&str, &str> = HashMap::new();
        for spec in &self.nodes {
            for child in &spec.children {
                if !specs.contains_key(child.as_str()) {
                    return Err(app_err!("node '{}' lists unknown child '{child}'", spec.id));
                }
                if let Some(previous) = parents.insert(child.as_str(), spec.id.as_str()) {
                    return Err(app_err!("node '{child}' is listed as a child of both '{previous}' and '{}'", spec.id));
                }
            }
        }

        let roots: Vec<&str> = self
            .nodes
            .iter()
            .map(|spec| spec.id.as_str())
            .filter(|id| !parents.contains_key(id))
            .collect();

        let [root] = roots.as_slice() else {
            return Err(match roots.len() {
                0 => app_err!("the collection has no root node (every node is listed as a child)"),
                _ => app_err!("the collection must have exactly one root node, found: {}", roots.join(", ")),
            });
        };

        let mut seen = HashSet::new();
        let mut stack = vec![*root];
        while let Some(id) = stack.pop() {
            if seen.insert(id)
                && let Some(spec) = specs.get(id)
            {
                stack.extend(spec.children.iter().map(String::as_str));
            }
        }

        if let Some(orphan) = self.nodes.iter().find(|spec| !seen.contains(spec.id.as_str())) {
            return Err(app_err!("node '{}' is part of a cycle and not reachable from root '{root}'", orphan.id));
        }

        Ok(*root)
    }
}

fn assemble(id: &str, specs: &HashMap<&str, &NodeSpec>, registry: &mut Registry, criterion: &str) -> Result<MetricNode> {
    let spec = specs.get(id).into_app_err_with(|| format!("node '{id}' is not defined"))?;
    let mut node = registry
        .get_or_create_node(criterion, id)
        .into_app_err_with(|| format!("creating node '{id}'"))?;

    for (name, value) in &spec.attributes {
        node.set_attribute(name, value.as_str())
            .into_app_err_with(|| format!("setting attribute of node '{id}'"))?;
    }

    for measure in &spec.measures {
        let level = measure.level.as_deref().unwrap_or(DEFAULT_LEVEL);
        node.set_level_measure(&measure.phase, level, &measure.stage, measure.value)
            .into_app_err_with(|| format!("recording measurement of node '{id}'"))?;
    }

    let children = spec
        .children
        .iter()
        .map(|child| assemble(child, specs, registry, criterion))
        .collect::<Result<Vec<_>>>()?;

    node.merge(children).into_app_err_with(|| format!("merging children into node '{id}'"))?;
    Ok(node)
}
