use crate::{refine, Bond, MoleculeGraph, SignatureError};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

/// Computes a canonical atom ordering from stabilized signatures.
///
/// # Arguments
/// * `graph` - A reference to the molecule graph.
///
/// # Returns
/// The original atom indices sorted by (final signature, original index).
/// Atoms sharing an orbit keep their relative input order, so the ordering
/// is only unique up to automorphism.
pub fn canonical_ordering(graph: &MoleculeGraph) -> Result<Vec<usize>, SignatureError> {
    let refinement = refine(graph, graph.node_count())?;
    let mut order: Vec<usize> = (0..graph.node_count()).collect();
    order.sort_by_key(|&atom| (refinement.signatures[atom].clone(), atom));
    Ok(order)
}

/// Rebuilds the molecule with atoms renumbered into canonical order and
/// edges re-added smallest endpoint first.
///
/// # Arguments
/// * `graph` - A reference to the original molecule graph.
///
/// # Returns
/// A new molecule graph with nodes and edges ordered canonically. Two
/// numberings of one molecule rebuild identically whenever the final
/// partition is discrete.
pub fn rebuild_canonical_graph(graph: &MoleculeGraph) -> Result<MoleculeGraph, SignatureError> {
    let order = canonical_ordering(graph)?;

    // Build a mapping from the old atom index to its canonical position.
    let mut mapping = vec![0usize; graph.node_count()];
    let mut canonical = MoleculeGraph::default();
    for &old in &order {
        let new_index = canonical.add_node(graph[NodeIndex::new(old)]);
        mapping[old] = new_index.index();
    }

    // Rebuild the edges under the new numbering, in sorted order.
    let mut edges: Vec<(usize, usize, Bond)> = graph
        .edge_references()
        .map(|edge| {
            let a = mapping[edge.source().index()];
            let b = mapping[edge.target().index()];
            (a.min(b), a.max(b), *edge.weight())
        })
        .collect();
    edges.sort();
    for (a, b, bond) in edges {
        canonical.add_edge(NodeIndex::new(a), NodeIndex::new(b), bond);
    }

    Ok(canonical)
}

/// Structural equality of two graphs under their current numbering: same
/// atom list, same edge list.
pub fn graphs_identical(left: &MoleculeGraph, right: &MoleculeGraph) -> bool {
    if left.node_count() != right.node_count() || left.edge_count() != right.edge_count() {
        return false;
    }
    let same_nodes = left
        .node_indices()
        .zip(right.node_indices())
        .all(|(l, r)| left[l] == right[r]);
    if !same_nodes {
        return false;
    }
    let edge_list = |graph: &MoleculeGraph| {
        let mut edges: Vec<(usize, usize, Bond)> = graph
            .edge_references()
            .map(|edge| {
                let a = edge.source().index();
                let b = edge.target().index();
                (a.min(b), a.max(b), *edge.weight())
            })
            .collect();
        edges.sort();
        edges
    };
    edge_list(left) == edge_list(right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{molecule_from_parts, Atom, Element};

    fn ethanol(flipped: bool) -> MoleculeGraph {
        let atoms = if flipped {
            vec![
                Atom::new(Element::O),
                Atom::new(Element::C),
                Atom::new(Element::C),
            ]
        } else {
            vec![
                Atom::new(Element::C),
                Atom::new(Element::C),
                Atom::new(Element::O),
            ]
        };
        let bonds = [(0, 1, Bond::Single), (1, 2, Bond::Single)];
        molecule_from_parts(&atoms, &bonds).unwrap()
    }

    #[test]
    fn ordering_sorts_by_signature() {
        // C-C-C-O
        let atoms = [
            Atom::new(Element::C),
            Atom::new(Element::C),
            Atom::new(Element::C),
            Atom::new(Element::O),
        ];
        let bonds = [
            (0, 1, Bond::Single),
            (1, 2, Bond::Single),
            (2, 3, Bond::Single),
        ];
        let mol = molecule_from_parts(&atoms, &bonds).unwrap();
        assert_eq!(canonical_ordering(&mol).unwrap(), vec![1, 2, 0, 3]);
    }

    #[test]
    fn numbering_variants_rebuild_identically() {
        let rebuilt = rebuild_canonical_graph(&ethanol(false)).unwrap();
        let rebuilt_flipped = rebuild_canonical_graph(&ethanol(true)).unwrap();
        assert!(graphs_identical(&rebuilt, &rebuilt_flipped));
    }

    #[test]
    fn ring_rotations_rebuild_identically() {
        let ring = |start: usize| {
            let atoms = vec![Atom::new(Element::C); 4];
            let bonds: Vec<(usize, usize, Bond)> = (0..4)
                .map(|i| ((start + i) % 4, (start + i + 1) % 4, Bond::Single))
                .collect();
            molecule_from_parts(&atoms, &bonds).unwrap()
        };
        let rebuilt = rebuild_canonical_graph(&ring(0)).unwrap();
        for start in 1..4 {
            assert!(graphs_identical(
                &rebuilt,
                &rebuild_canonical_graph(&ring(start)).unwrap()
            ));
        }
    }

    #[test]
    fn reversed_numbering_rebuilds_identically() {
        // C-C-C-O numbered from either end
        let forward = molecule_from_parts(
            &[
                Atom::new(Element::C),
                Atom::new(Element::C),
                Atom::new(Element::C),
                Atom::new(Element::O),
            ],
            &[
                (0, 1, Bond::Single),
                (1, 2, Bond::Single),
                (2, 3, Bond::Single),
            ],
        )
        .unwrap();
        let reversed = molecule_from_parts(
            &[
                Atom::new(Element::O),
                Atom::new(Element::C),
                Atom::new(Element::C),
                Atom::new(Element::C),
            ],
            &[
                (0, 1, Bond::Single),
                (1, 2, Bond::Single),
                (2, 3, Bond::Single),
            ],
        )
        .unwrap();
        assert!(graphs_identical(
            &rebuild_canonical_graph(&forward).unwrap(),
            &rebuild_canonical_graph(&reversed).unwrap()
        ));
    }

    #[test]
    fn identity_helper_sees_differences() {
        let mol = ethanol(false);
        assert!(graphs_identical(&mol, &mol.clone()));
        assert!(!graphs_identical(&mol, &ethanol(true)));
    }
}
