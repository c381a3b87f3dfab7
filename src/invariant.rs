use crate::{Bond, MoleculeGraph};
use petgraph::visit::EdgeRef;
use std::fmt;

/// The structural invariant of one atom: element symbol, formal charge,
/// degree, and the multiset of incident bond orders. Two atoms are
/// indistinguishable at height 0 exactly when their invariants are equal.
///
/// Aromatic and aliphatic variants of an element share a symbol, so
/// atom-level aromaticity only reaches the invariant through aromatic bonds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AtomInvariant {
    pub symbol: &'static str,
    pub charge: i8,
    pub degree: usize,
    pub bonds: Vec<Bond>,
}

impl fmt::Display for AtomInvariant {
    // Renders the height-0 color: symbol, bracketed charge when nonzero,
    // then the sorted bond markers. Never contains `~ ( ) , . *`, which
    // keeps signature strings unambiguous.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol)?;
        if self.charge != 0 {
            write!(f, "[{:+}]", self.charge)?;
        }
        for bond in &self.bonds {
            write!(f, "{}", bond.symbol())?;
        }
        Ok(())
    }
}

/// Computes the invariant of every atom, indexed by atom position.
pub fn atom_invariants(graph: &MoleculeGraph) -> Vec<AtomInvariant> {
    graph
        .node_indices()
        .map(|idx| {
            let atom = graph[idx];
            let mut bonds: Vec<Bond> = graph.edges(idx).map(|edge| *edge.weight()).collect();
            bonds.sort();
            AtomInvariant {
                symbol: atom.element.symbol(),
                charge: atom.charge,
                degree: bonds.len(),
                bonds,
            }
        })
        .collect()
}
