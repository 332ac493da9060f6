//! Cycle detection over the component graph.
//!
//! Depth-first search with three-color marking, restarted from every
//! not-yet-finished component in lexicographic order so the reported
//! cycle set is stable given identical input ordering.
//!
//! The traversal reports one cycle per back edge it meets. It does not
//! enumerate every elementary cycle of graphs with shared sub-cycles, but
//! if any cycle exists at least one is reported, which is what the
//! no-cycles invariant needs.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::graph::{ComponentName, Graph};

/// A closed dependency loop: `[c1, c2, ..., ck, c1]`.
///
/// A self-edge yields the length-1 cycle `[c, c]` when self-edges are
/// not excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    path: Vec<ComponentName>,
}

impl Cycle {
    /// The components along the cycle; first and last entries are equal.
    #[must_use]
    pub fn path(&self) -> &[ComponentName] {
        &self.path
    }

    /// Number of distinct components on the cycle.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

impl std::fmt::Display for Cycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.path.iter().map(ComponentName::as_str).collect();
        write!(f, "{}", names.join(" -> "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    OnStack,
    Finished,
}

/// Finds dependency cycles in the graph.
///
/// Runs in O(V+E). With `exclude_self_edges` set, an edge from a component
/// to itself never contributes a cycle (intra-component imports are not a
/// layering concern).
#[must_use]
pub fn find_cycles(graph: &Graph, exclude_self_edges: bool) -> Vec<Cycle> {
    let mut color: BTreeMap<&ComponentName, Color> =
        graph.components().map(|c| (c, Color::Unvisited)).collect();
    let mut stack: Vec<&ComponentName> = Vec::new();
    let mut cycles = Vec::new();

    // Components iterate lexicographically, which pins the restart order.
    for component in graph.components() {
        if color.get(component) == Some(&Color::Unvisited) {
            visit(
                graph,
                component,
                &mut color,
                &mut stack,
                &mut cycles,
                exclude_self_edges,
            );
        }
    }

    cycles
}

fn visit<'a>(
    graph: &'a Graph,
    node: &'a ComponentName,
    color: &mut BTreeMap<&'a ComponentName, Color>,
    stack: &mut Vec<&'a ComponentName>,
    cycles: &mut Vec<Cycle>,
    exclude_self_edges: bool,
) {
    color.insert(node, Color::OnStack);
    stack.push(node);

    for edge in graph.out_edges(node) {
        let next = &edge.to;

        if next == node {
            if !exclude_self_edges {
                cycles.push(Cycle {
                    path: vec![node.clone(), node.clone()],
                });
            }
            continue;
        }

        match color.get(next).copied().unwrap_or(Color::Unvisited) {
            Color::Unvisited => {
                visit(graph, next, color, stack, cycles, exclude_self_edges);
            }
            Color::OnStack => {
                // Back edge: unwind the DFS stack to the repeated ancestor.
                if let Some(pos) = stack.iter().position(|c| *c == next) {
                    let mut path: Vec<ComponentName> =
                        stack[pos..].iter().map(|c| (*c).clone()).collect();
                    path.push((*next).clone());
                    cycles.push(Cycle { path });
                }
            }
            Color::Finished => {}
        }
    }

    stack.pop();
    color.insert(node, Color::Finished);
}
