use crate::MoleculeGraph;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

/// Encodes the neighborhood tree of one atom as a canonical string, walking
/// `height` bonds deep over the given per-atom color strings.
///
/// Grammar: a height-0 signature is the atom's color; above that it is
/// `color ~height ( child , child , ... )` where each child is a bond marker
/// followed by the neighbor's signature one level shallower. Children are
/// sorted before joining, which is the canonicalization step. Recursion is
/// bounded by the remaining height alone, so ring bonds walk back through
/// already-seen atoms and the parent reappears among its child's children.
///
/// Atoms with no neighbors keep their bare color at every height.
///
/// `atom` must be a valid index into the graph; public entry points validate
/// before calling.
pub fn atom_signature(
    graph: &MoleculeGraph,
    colors: &[String],
    atom: usize,
    height: usize,
) -> String {
    signature_node(graph, colors, NodeIndex::new(atom), height)
}

fn signature_node(
    graph: &MoleculeGraph,
    colors: &[String],
    atom: NodeIndex,
    height: usize,
) -> String {
    if height == 0 {
        return colors[atom.index()].clone();
    }
    let mut children: Vec<String> = graph
        .edges(atom)
        .map(|edge| {
            let neighbor = if edge.source() == atom {
                edge.target()
            } else {
                edge.source()
            };
            format!(
                "{}{}",
                edge.weight().symbol(),
                signature_node(graph, colors, neighbor, height - 1)
            )
        })
        .collect();
    if children.is_empty() {
        return colors[atom.index()].clone();
    }
    children.sort();
    format!("{}~{}({})", colors[atom.index()], height, children.join(","))
}

/// One refinement round: lifts every atom's signature from height-1 strings
/// to height-`height` strings. Equivalent to running [`atom_signature`] at
/// `height` for every atom, but reuses the previous round instead of
/// recursing.
pub fn refine_step(
    graph: &MoleculeGraph,
    colors: &[String],
    previous: &[String],
    height: usize,
) -> Vec<String> {
    graph
        .node_indices()
        .map(|idx| {
            let mut children: Vec<String> = graph
                .edges(idx)
                .map(|edge| {
                    let neighbor = if edge.source() == idx {
                        edge.target()
                    } else {
                        edge.source()
                    };
                    format!("{}{}", edge.weight().symbol(), previous[neighbor.index()])
                })
                .collect();
            if children.is_empty() {
                return colors[idx.index()].clone();
            }
            children.sort();
            format!("{}~{}({})", colors[idx.index()], height, children.join(","))
        })
        .collect()
}
