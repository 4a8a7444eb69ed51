#![forbid(unsafe_code)]
//! Turning a snapshot into a Graphviz-ready graph description.

use std::fmt;

use crate::error::{ProbeError, Result};
use crate::snapshot::TreeSnapshot;

/// Rendered color of a stored node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeColor {
    /// Color flag set.
    Red,
    /// Color flag clear.
    Black,
}

impl NodeColor {
    /// Graphviz color attribute value.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeColor::Red => "red",
            NodeColor::Black => "black",
        }
    }
}

/// One declared graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Graphviz node identifier.
    pub name: String,
    /// Display label; empty for placeholders.
    pub label: String,
    /// Outline color for stored nodes, `None` for placeholders.
    pub color: Option<NodeColor>,
    /// Point-shaped placeholder marking an absent child.
    pub point: bool,
}

/// A directed edge between two declared nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    /// Source node identifier.
    pub from: String,
    /// Target node identifier.
    pub to: String,
}

/// The tree's shape as nodes and edges, ready for layout.
///
/// Built incrementally by the walk, consumed once by the renderer.
/// Nodes are identified by their stored value; two stored nodes sharing
/// a value collide on graph identity (known limitation of the display
/// format, carried over as-is).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GraphDescription {
    /// Declared nodes: every stored slot first, then placeholders in
    /// traversal order.
    pub nodes: Vec<GraphNode>,
    /// Edges in traversal order, left side before right side.
    pub edges: Vec<GraphEdge>,
}

impl GraphDescription {
    /// Walks `snapshot` into a graph description.
    ///
    /// Every stored slot is declared unconditionally, reachable from
    /// the root or not, so orphaned entries stay visible. The traversal
    /// then descends from the root: leaves (both children absent) emit
    /// nothing further, a present child emits a real edge and recurses,
    /// and an absent side of an internal node emits one unlabeled
    /// point placeholder (`left{value}` / `right{value}`) plus an edge
    /// to it. An out-of-range child or root index is an error, never a
    /// truncated graph, and so is a child reference that revisits a
    /// slot (a cycle cannot occur in an intact tree).
    pub fn from_snapshot(snapshot: &TreeSnapshot) -> Result<Self> {
        let mut graph = GraphDescription::default();
        for (i, node) in snapshot.nodes.iter().enumerate() {
            let color = if node.red {
                NodeColor::Red
            } else {
                NodeColor::Black
            };
            graph.nodes.push(GraphNode {
                name: node.value.to_string(),
                label: format!("{},{}", i, node.value),
                color: Some(color),
                point: false,
            });
        }
        if let Some(root) = snapshot.meta.root {
            let mut visited = vec![false; snapshot.nodes.len()];
            graph.walk(snapshot, root, &mut visited)?;
        }
        Ok(graph)
    }

    fn walk(&mut self, snapshot: &TreeSnapshot, index: u64, visited: &mut [bool]) -> Result<()> {
        let node = snapshot.node(index)?;
        if visited[index as usize] {
            return Err(ProbeError::Decode("stored child references form a cycle"));
        }
        visited[index as usize] = true;
        if node.left.is_none() && node.right.is_none() {
            return Ok(());
        }
        let value = node.value;
        let (left, right) = (node.left, node.right);
        match left {
            Some(child) => {
                self.edge(value.to_string(), snapshot.node(child)?.value.to_string());
                self.walk(snapshot, child, visited)?;
            }
            None => self.placeholder(format!("left{value}"), value),
        }
        match right {
            Some(child) => {
                self.edge(value.to_string(), snapshot.node(child)?.value.to_string());
                self.walk(snapshot, child, visited)?;
            }
            None => self.placeholder(format!("right{value}"), value),
        }
        Ok(())
    }

    fn edge(&mut self, from: String, to: String) {
        self.edges.push(GraphEdge { from, to });
    }

    fn placeholder(&mut self, name: String, from_value: u64) {
        self.nodes.push(GraphNode {
            name: name.clone(),
            label: String::new(),
            color: None,
            point: true,
        });
        self.edge(from_value.to_string(), name);
    }
}

/// Graphviz dot serialization.
///
/// `ordering="out"` tells the layout engine to keep out-edges in
/// declaration order, so the left child always renders left of the
/// right child.
impl fmt::Display for GraphDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph G {{")?;
        writeln!(f, "  graph [ordering=\"out\"];")?;
        for node in &self.nodes {
            if node.point {
                writeln!(f, "  {} [shape=point, label=\"\"];", node.name)?;
            } else {
                let color = node.color.map_or("black", NodeColor::as_str);
                writeln!(
                    f,
                    "  {} [label=\"{}\", color=\"{}\"];",
                    node.name, node.label, color
                )?;
            }
        }
        for edge in &self.edges {
            writeln!(f, "  {} -> {};", edge.from, edge.to)?;
        }
        write!(f, "}}")
    }
}
