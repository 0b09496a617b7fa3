use std::collections::BTreeMap;
use std::fmt::Write as _;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::catalog::FieldCatalog;
use crate::extract::strip_brackets;
use crate::model::CalculatedField;

/// Directed dependency graph over field captions. An edge parent → child
/// means the child's formula references the parent.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    indices: BTreeMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Builds the graph by testing every bracketed catalog caption for
    /// substring membership in each resolved formula.
    ///
    /// Known limitation: one caption whose bracketed text occurs inside
    /// another (`[Tax]` in `[Sales Tax]`) false-positives, and a field whose
    /// own caption appears in its formula gains a self-edge.
    pub fn build(fields: &[CalculatedField], catalog: &FieldCatalog) -> Self {
        let mut graph = Self::default();
        for field in fields {
            for caption in catalog.captions() {
                if field.formula.contains(caption) {
                    graph.add_edge(strip_brackets(caption), &field.name);
                }
            }
        }
        graph
    }

    fn node(&mut self, caption: &str) -> NodeIndex {
        if let Some(index) = self.indices.get(caption) {
            return *index;
        }
        let index = self.graph.add_node(caption.to_string());
        self.indices.insert(caption.to_string(), index);
        index
    }

    fn add_edge(&mut self, parent: &str, child: &str) {
        let parent = self.node(parent);
        let child = self.node(child);
        self.graph.update_edge(parent, child, ());
    }

    /// Returns every (parent, child) pair, sorted.
    pub fn edges(&self) -> Vec<(String, String)> {
        let mut edges: Vec<(String, String)> = self
            .graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].clone(),
                    self.graph[edge.target()].clone(),
                )
            })
            .collect();
        edges.sort();
        edges
    }

    pub fn contains_edge(&self, parent: &str, child: &str) -> bool {
        match (self.indices.get(parent), self.indices.get(child)) {
            (Some(parent), Some(child)) => self.graph.contains_edge(*parent, *child),
            _ => false,
        }
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Renders the graph as Graphviz DOT source: left-to-right layout,
    /// configurable background, filled white nodes.
    pub fn to_dot(&self, background: &str) -> String {
        let mut dot = String::from("digraph dependencies {\n");
        let _ = writeln!(dot, "    graph [rankdir=LR, bgcolor=\"{background}\"];");
        dot.push_str("    node [style=filled, fillcolor=white];\n");
        for index in self.graph.node_indices() {
            let _ = writeln!(dot, "    {:?};", self.graph[index]);
        }
        for edge in self.graph.edge_references() {
            let _ = writeln!(
                dot,
                "    {:?} -> {:?};",
                self.graph[edge.source()],
                self.graph[edge.target()]
            );
        }
        dot.push_str("}\n");
        dot
    }
}
