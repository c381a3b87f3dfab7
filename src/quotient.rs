use crate::{MoleculeGraph, Partition, SignatureError};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap};

/// One node of a quotient graph: an orbit's label and member count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrbitNode {
    pub label: String,
    pub size: usize,
}

/// A molecule collapsed to its orbits. Edge weights count the molecule bonds
/// running between the two orbits; a self-edge counts bonds inside one orbit.
pub type QuotientGraph = petgraph::graph::UnGraph<OrbitNode, usize>;

/// Collapses a molecule onto a partition of its atoms.
///
/// The partition must cover exactly the molecule's atoms; anything else is
/// reported as a malformed input.
pub fn quotient_graph(
    graph: &MoleculeGraph,
    partition: &Partition,
) -> Result<QuotientGraph, SignatureError> {
    if partition.atom_count() != graph.node_count() {
        return Err(SignatureError::MalformedGraph(format!(
            "partition covers {} atoms but the molecule has {}",
            partition.atom_count(),
            graph.node_count()
        )));
    }

    let mut quotient = QuotientGraph::default();
    let mut node_of: HashMap<&str, NodeIndex> = HashMap::new();
    for orbit in partition.orbits() {
        let index = quotient.add_node(OrbitNode {
            label: orbit.label().to_string(),
            size: orbit.len(),
        });
        node_of.insert(orbit.label(), index);
    }

    let mut bond_counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for edge in graph.edge_references() {
        let a = partition
            .label_of(edge.source().index())
            .ok_or_else(|| SignatureError::InvalidIndex {
                index: edge.source().index(),
                atom_count: partition.atom_count(),
            })?;
        let b = partition
            .label_of(edge.target().index())
            .ok_or_else(|| SignatureError::InvalidIndex {
                index: edge.target().index(),
                atom_count: partition.atom_count(),
            })?;
        let key = if a <= b { (a, b) } else { (b, a) };
        *bond_counts.entry(key).or_insert(0) += 1;
    }

    for ((a, b), count) in bond_counts {
        quotient.add_edge(node_of[a], node_of[b], count);
    }

    Ok(quotient)
}
