use crate::{Bond, MoleculeGraph, Partition};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

/// Generates a DOT representation of the molecule with nodes filled by orbit
/// membership, so symmetric atoms share a color.
///
/// # Arguments
///
/// * `graph` - The molecule to render.
/// * `partition` - An orbit partition of the same molecule.
///
/// # Returns
///
/// * `String` - The DOT format string. Atoms the partition does not cover
///   are filled gray.
pub fn orbit_dot(graph: &MoleculeGraph, partition: &Partition) -> String {
    let mut dot_output = String::new();
    writeln!(dot_output, "graph Molecule {{").unwrap();
    writeln!(dot_output, "    layout=neato; rankdir=LR;").unwrap();

    // One palette slot per orbit, in label order.
    let color_of: HashMap<&str, &'static str> = partition
        .orbits()
        .enumerate()
        .map(|(rank, orbit)| (orbit.label(), orbit_color(rank)))
        .collect();

    for node in graph.node_indices() {
        let atom = &graph[node];
        let fill = partition
            .label_of(node.index())
            .and_then(|label| color_of.get(label).copied())
            .unwrap_or("gray");
        writeln!(
            dot_output,
            "    {} [label=\"{}{}\", fontcolor=white, shape=circle, style=filled, fillcolor={fill}];",
            node.index(),
            atom.element.symbol(),
            node.index(),
        )
        .unwrap();
    }

    // Output double and triple bonds as parallel edge statements.
    for edge in graph.edge_references() {
        let source = edge.source().index();
        let target = edge.target().index();
        let bond = edge.weight();
        let (style, extra) = bond_to_style(bond);

        let count = match bond {
            Bond::Double => 2,
            Bond::Triple => 3,
            _ => 1,
        };

        for _ in 0..count {
            writeln!(
                dot_output,
                "    {source} -- {target} [style={style}, penwidth=2.0{extra}];"
            )
            .unwrap();
        }
    }

    writeln!(dot_output, "}}").unwrap();

    dot_output
}

fn orbit_color(rank: usize) -> &'static str {
    const PALETTE: [&str; 10] = [
        "black",
        "red",
        "blue",
        "darkgreen",
        "brown",
        "purple",
        "darkorange",
        "teal",
        "crimson",
        "navy",
    ];
    PALETTE[rank % PALETTE.len()]
}

fn bond_to_style(bond: &Bond) -> (&'static str, &'static str) {
    match bond {
        Bond::Single | Bond::Double | Bond::Triple => ("solid", ""),
        Bond::Aromatic => ("dashed", ", color=purple"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{molecule_from_parts, Atom, Element, SignatureEngine};

    #[test]
    fn symmetric_atoms_share_a_fill_color() {
        let atoms = vec![Atom::new(Element::C); 4];
        let bonds: Vec<(usize, usize, Bond)> =
            (0..4).map(|i| (i, (i + 1) % 4, Bond::Single)).collect();
        let ring = molecule_from_parts(&atoms, &bonds).unwrap();
        let partition = SignatureEngine::new().atom_orbits(&ring).unwrap();
        let dot = orbit_dot(&ring, &partition);
        assert_eq!(dot.matches("fillcolor=black").count(), 4);
        assert_eq!(dot.matches(" -- ").count(), 4);
    }

    #[test]
    fn distinct_orbits_get_distinct_fill_colors() {
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
        let partition = SignatureEngine::new().atom_orbits(&mol).unwrap();
        let dot = orbit_dot(&mol, &partition);
        for color in ["black", "red", "blue", "darkgreen"] {
            assert_eq!(dot.matches(&format!("fillcolor={color}")).count(), 1);
        }
    }

    #[test]
    fn double_bonds_render_as_parallel_edges() {
        let atoms = [Atom::new(Element::C), Atom::new(Element::O)];
        let bonds = [(0, 1, Bond::Double)];
        let mol = molecule_from_parts(&atoms, &bonds).unwrap();
        let partition = SignatureEngine::new().atom_orbits(&mol).unwrap();
        let dot = orbit_dot(&mol, &partition);
        assert_eq!(dot.matches("0 -- 1").count(), 2);
    }

    #[test]
    fn uncovered_atoms_fall_back_to_gray() {
        let mol = molecule_from_parts(&[Atom::new(Element::C)], &[]).unwrap();
        let empty = Partition::from_labels(vec![], 0);
        let dot = orbit_dot(&mol, &empty);
        assert!(dot.contains("fillcolor=gray"));
    }
}
