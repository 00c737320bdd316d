//! Gate-to-gate dependency graph.
//!
//! Node `i` is the gate at sequence position `i`. An edge `i -> j` means
//! gate `j` acts on a qubit whose previous toucher was gate `i`. Only
//! direct dependencies are materialized; transitive ones are implied.
//!
//! Because edges always point from an earlier position to a later one, the
//! graph is acyclic by construction and sequence order is a valid
//! topological order.

use petgraph::Direction;
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::gate::GateKind;
use crate::qubit::QubitId;

/// A node in the dependency graph: one gate of the source circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    /// Sequence position of the gate.
    pub position: usize,
    /// Gate tag.
    pub gate: GateKind,
    /// Operand qubits.
    pub qubits: Vec<QubitId>,
}

impl fmt::Display for DependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.gate)?;
        for q in &self.qubits {
            write!(f, " {q}")?;
        }
        Ok(())
    }
}

/// An edge in the dependency graph, labelled with the shared qubits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Qubits over which the later gate depends on the earlier one.
    pub qubits: Vec<QubitId>,
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.qubits.iter().map(ToString::to_string).collect();
        f.write_str(&labels.join(","))
    }
}

/// An edge in plain-data form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeExport {
    /// Position of the earlier gate.
    pub from: usize,
    /// Position of the dependent gate.
    pub to: usize,
    /// Shared qubits.
    pub qubits: Vec<QubitId>,
}

/// Node and edge lists for external plotting tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExport {
    /// Nodes in sequence order.
    pub nodes: Vec<DependencyNode>,
    /// Edges sorted by `(from, to)`.
    pub edges: Vec<EdgeExport>,
}

/// Directed acyclic graph of direct data dependencies between gates.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<DependencyNode, DependencyEdge, u32>,
}

impl DependencyGraph {
    /// Build the dependency graph of a circuit.
    ///
    /// Tracks the last gate that touched each qubit while walking the gates
    /// in sequence order. Each gate contributes at most one incoming edge per
    /// operand qubit; a predecessor reached through several qubits yields a
    /// single edge labelled with all of them.
    pub fn build(circuit: &Circuit) -> Self {
        let mut graph: DiGraph<DependencyNode, DependencyEdge, u32> =
            DiGraph::with_capacity(circuit.num_gates(), 2 * circuit.num_gates());
        let mut last_toucher: FxHashMap<QubitId, NodeIndex> = FxHashMap::default();

        for op in circuit {
            let node = graph.add_node(DependencyNode {
                position: op.position(),
                gate: op.kind().clone(),
                qubits: op.qubits().to_vec(),
            });

            for &qubit in op.qubits() {
                if let Some(prev) = last_toucher.insert(qubit, node) {
                    match graph.find_edge(prev, node) {
                        Some(edge) => graph[edge].qubits.push(qubit),
                        None => {
                            graph.add_edge(prev, node, DependencyEdge { qubits: vec![qubit] });
                        }
                    }
                }
            }
        }

        Self { graph }
    }

    /// Number of nodes (gates).
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// The node for a sequence position.
    pub fn node(&self, position: usize) -> Option<&DependencyNode> {
        self.graph.node_weight(NodeIndex::new(position))
    }

    /// All nodes in sequence order.
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.graph.node_weights()
    }

    /// Edges as `(from, to)` position pairs, sorted.
    pub fn edge_list(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Positions of the direct predecessors of a gate, ascending.
    pub fn predecessors(&self, position: usize) -> Vec<usize> {
        self.neighbors(position, Direction::Incoming)
    }

    /// Positions of the direct successors of a gate, ascending.
    pub fn successors(&self, position: usize) -> Vec<usize> {
        self.neighbors(position, Direction::Outgoing)
    }

    fn neighbors(&self, position: usize, dir: Direction) -> Vec<usize> {
        if position >= self.num_nodes() {
            return vec![];
        }
        let mut out: Vec<_> = self
            .graph
            .neighbors_directed(NodeIndex::new(position), dir)
            .map(NodeIndex::index)
            .collect();
        out.sort_unstable();
        out
    }

    /// A topological order of gate positions.
    pub fn topological_order(&self) -> IrResult<Vec<usize>> {
        petgraph::algo::toposort(&self.graph, None)
            .map(|order| order.into_iter().map(NodeIndex::index).collect())
            .map_err(|cycle| {
                IrError::InvalidGraph(format!(
                    "cycle through gate at position {}",
                    cycle.node_id().index()
                ))
            })
    }

    /// Whether the graph has no directed cycle.
    pub fn is_acyclic(&self) -> bool {
        !petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Critical-path depth of every gate, indexed by position.
    ///
    /// `depth[g] = 1 + max(depth[p] for p in predecessors(g))`, with 0 as the
    /// default for gates without predecessors.
    pub fn node_depths(&self) -> Vec<usize> {
        self.depths_with_parents().0
    }

    /// Length of the longest dependency chain, counted in gates.
    pub fn depth(&self) -> usize {
        self.node_depths().into_iter().max().unwrap_or(0)
    }

    /// Gate positions along one longest dependency chain, in execution order.
    ///
    /// Ties are broken towards the earliest position, both for the chain's
    /// last gate and for each predecessor step.
    pub fn critical_path(&self) -> Vec<usize> {
        let (depths, parents) = self.depths_with_parents();
        let Some(max) = depths.iter().copied().max() else {
            return vec![];
        };

        let mut path = vec![];
        let mut current = depths.iter().position(|&d| d == max);
        while let Some(node) = current {
            path.push(node);
            current = parents[node];
        }
        path.reverse();
        path
    }

    /// Gate positions grouped by depth (as-soon-as-possible layers).
    pub fn layers(&self) -> Vec<Vec<usize>> {
        let depths = self.node_depths();
        let mut layers: Vec<Vec<usize>> = vec![vec![]; depths.iter().copied().max().unwrap_or(0)];
        for (position, depth) in depths.into_iter().enumerate() {
            layers[depth - 1].push(position);
        }
        layers
    }

    /// Single pass in sequence order; valid because every edge points forward.
    fn depths_with_parents(&self) -> (Vec<usize>, Vec<Option<usize>>) {
        let n = self.num_nodes();
        let mut depths = vec![0usize; n];
        let mut parents = vec![None; n];

        for position in 0..n {
            let mut best: Option<(usize, usize)> = None;
            for pred in self.predecessors(position) {
                let d = depths[pred];
                if best.is_none_or(|(_, bd)| d > bd) {
                    best = Some((pred, d));
                }
            }
            depths[position] = 1 + best.map_or(0, |(_, d)| d);
            parents[position] = best.map(|(p, _)| p);
        }

        (depths, parents)
    }

    /// Plain-data node and edge lists.
    pub fn export(&self) -> GraphExport {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| EdgeExport {
                from: e.source().index(),
                to: e.target().index(),
                qubits: e.weight().qubits.clone(),
            })
            .collect();
        edges.sort_unstable_by_key(|e| (e.from, e.to));

        GraphExport {
            nodes: self.graph.node_weights().cloned().collect(),
            edges,
        }
    }

    /// Render as Graphviz DOT.
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::new(&self.graph))
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<DependencyNode, DependencyEdge, u32> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;

    fn ghz3() -> Circuit {
        Circuit::from_ops(3, [("h", vec![0u32]), ("cx", vec![0, 1]), ("cx", vec![1, 2])]).unwrap()
    }

    #[test]
    fn test_huge_declared_width_uses_touched_qubits_only() {
        let circuit =
            Circuit::from_ops(u32::MAX, [("h", vec![0u32]), ("cx", vec![0, u32::MAX - 1])])
                .unwrap();
        let dag = DependencyGraph::build(&circuit);
        assert_eq!(dag.num_nodes(), 2);
        assert_eq!(dag.edge_list(), vec![(0, 1)]);
        assert_eq!(dag.depth(), 2);
    }

    #[test]
    fn test_empty_graph() {
        let dag = DependencyGraph::build(&Circuit::empty(2));
        assert_eq!(dag.num_nodes(), 0);
        assert_eq!(dag.num_edges(), 0);
        assert_eq!(dag.depth(), 0);
        assert!(dag.critical_path().is_empty());
        assert!(dag.layers().is_empty());
    }

    #[test]
    fn test_ghz_chain() {
        let dag = DependencyGraph::build(&ghz3());
        assert_eq!(dag.edge_list(), vec![(0, 1), (1, 2)]);
        assert_eq!(dag.node_depths(), vec![1, 2, 3]);
        assert_eq!(dag.depth(), 3);
        assert_eq!(dag.critical_path(), vec![0, 1, 2]);
    }

    #[test]
    fn test_parallel_gates() {
        let circuit = CircuitBuilder::new("par", 2).h(0).h(1).build().unwrap();
        let dag = DependencyGraph::build(&circuit);
        assert_eq!(dag.num_edges(), 0);
        assert_eq!(dag.depth(), 1);
        assert_eq!(dag.layers(), vec![vec![0, 1]]);
    }

    #[test]
    fn test_only_direct_dependencies() {
        // h q0; x q0; cx q0,q1 -> edges 0->1, 1->2 (no transitive 0->2)
        let circuit = CircuitBuilder::new("t", 2).h(0).x(0).cx(0, 1).build().unwrap();
        let dag = DependencyGraph::build(&circuit);
        assert_eq!(dag.edge_list(), vec![(0, 1), (1, 2)]);
        assert_eq!(dag.predecessors(2), vec![1]);
        assert_eq!(dag.successors(0), vec![1]);
    }

    #[test]
    fn test_shared_pair_gives_single_edge() {
        let circuit = CircuitBuilder::new("t", 2).cx(0, 1).cz(0, 1).build().unwrap();
        let dag = DependencyGraph::build(&circuit);
        assert_eq!(dag.num_edges(), 1);
        let export = dag.export();
        assert_eq!(export.edges[0].qubits, vec![QubitId(0), QubitId(1)]);
    }

    #[test]
    fn test_edge_bound() {
        let circuit = Circuit::qft(5).unwrap();
        let dag = DependencyGraph::build(&circuit);
        assert!(dag.num_edges() <= 2 * circuit.num_gates());
        assert!(dag.is_acyclic());
        assert_eq!(dag.topological_order().unwrap().len(), circuit.num_gates());
    }

    #[test]
    fn test_critical_path_tie_break() {
        // Two independent chains of equal length; the earlier one wins.
        let circuit = CircuitBuilder::new("t", 2)
            .h(0)
            .h(1)
            .x(0)
            .x(1)
            .build()
            .unwrap();
        let dag = DependencyGraph::build(&circuit);
        assert_eq!(dag.depth(), 2);
        assert_eq!(dag.critical_path(), vec![0, 2]);
        assert_eq!(dag.layers(), vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn test_critical_path_picks_deeper_predecessor() {
        // q0: h, x ; q1: h ; cx(q0,q1) depends on x (depth 2) and h q1 (depth 1)
        let circuit = CircuitBuilder::new("t", 2)
            .h(0)
            .x(0)
            .h(1)
            .cx(0, 1)
            .build()
            .unwrap();
        let dag = DependencyGraph::build(&circuit);
        assert_eq!(dag.depth(), 3);
        assert_eq!(dag.critical_path(), vec![0, 1, 3]);
    }

    #[test]
    fn test_dot_output() {
        let dot = DependencyGraph::build(&ghz3()).to_dot();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("->"));
    }

    #[test]
    fn test_export_serializes() {
        let export = DependencyGraph::build(&ghz3()).export();
        let json = serde_json::to_string(&export).unwrap();
        assert!(json.contains("\"gate\":\"cx\""));
        assert_eq!(export.nodes.len(), 3);
    }
}
