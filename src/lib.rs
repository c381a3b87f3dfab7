use lazy_static::lazy_static;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::Level;

mod invariant;
pub use invariant::*;

mod orbit;
pub use orbit::*;

mod signature;
pub use signature::*;

mod refine;
pub use refine::*;

mod engine;
pub use engine::*;

mod canon;
pub use canon::*;

mod quotient;
pub use quotient::*;

mod parse;
pub use parse::*;

mod dot;
pub use dot::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    C,
    CAromatic,
    H,
    N,
    NAromatic,
    O,
    OAromatic,
    F,
    P,
    S,
    SAromatic,
    Cl,
    Br,
    I,
}

lazy_static! {
    static ref SYMBOL_TABLE: HashMap<&'static str, Element> = {
        let mut table = HashMap::new();
        table.insert("C", Element::C);
        table.insert("c", Element::CAromatic);
        table.insert("H", Element::H);
        table.insert("N", Element::N);
        table.insert("n", Element::NAromatic);
        table.insert("O", Element::O);
        table.insert("o", Element::OAromatic);
        table.insert("F", Element::F);
        table.insert("P", Element::P);
        table.insert("S", Element::S);
        table.insert("s", Element::SAromatic);
        table.insert("Cl", Element::Cl);
        table.insert("Br", Element::Br);
        table.insert("I", Element::I);
        table
    };
}

impl Element {
    /// The element symbol. Aromatic variants share the symbol of their
    /// aliphatic form, so `C` and `CAromatic` both render as `"C"`.
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::C | Element::CAromatic => "C",
            Element::H => "H",
            Element::N | Element::NAromatic => "N",
            Element::O | Element::OAromatic => "O",
            Element::F => "F",
            Element::P => "P",
            Element::S | Element::SAromatic => "S",
            Element::Cl => "Cl",
            Element::Br => "Br",
            Element::I => "I",
        }
    }

    /// Looks up an element by symbol. Lowercase single-letter symbols name
    /// the aromatic variants, as in SMILES.
    pub fn from_symbol(symbol: &str) -> Option<Element> {
        SYMBOL_TABLE.get(symbol).copied()
    }

    pub fn is_aromatic(&self) -> bool {
        matches!(
            self,
            Element::CAromatic | Element::NAromatic | Element::OAromatic | Element::SAromatic
        )
    }

    pub fn atomic_number(&self) -> u8 {
        match self {
            Element::H => 1,
            Element::C | Element::CAromatic => 6,
            Element::N | Element::NAromatic => 7,
            Element::O | Element::OAromatic => 8,
            Element::F => 9,
            Element::P => 15,
            Element::S | Element::SAromatic => 16,
            Element::Cl => 17,
            Element::Br => 35,
            Element::I => 53,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bond {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl Bond {
    /// The one-character bond marker used in signature strings.
    pub fn symbol(&self) -> char {
        match self {
            Bond::Single => '-',
            Bond::Double => '=',
            Bond::Triple => '#',
            Bond::Aromatic => ':',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Bond> {
        match symbol {
            '-' => Some(Bond::Single),
            '=' => Some(Bond::Double),
            '#' => Some(Bond::Triple),
            ':' => Some(Bond::Aromatic),
            _ => None,
        }
    }
}

/// A graph node: an element together with its formal charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atom {
    pub element: Element,
    pub charge: i8,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Atom { element, charge: 0 }
    }

    pub fn with_charge(element: Element, charge: i8) -> Self {
        Atom { element, charge }
    }
}

pub type MoleculeGraph = petgraph::graph::UnGraph<Atom, Bond>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("atom index {index} out of range for molecule with {atom_count} atoms")]
    InvalidIndex { index: usize, atom_count: usize },
    #[error("malformed molecule graph: {0}")]
    MalformedGraph(String),
}

/// Builds a molecule graph from an atom list and `(from, to, bond)` triples.
/// Bond endpoints are checked against the atom list before anything is added.
pub fn molecule_from_parts(
    atoms: &[Atom],
    bonds: &[(usize, usize, Bond)],
) -> Result<MoleculeGraph, SignatureError> {
    let mut graph = MoleculeGraph::default();
    for atom in atoms {
        graph.add_node(*atom);
    }
    for &(from, to, bond) in bonds {
        if from >= atoms.len() || to >= atoms.len() {
            return Err(SignatureError::MalformedGraph(format!(
                "bond ({from}, {to}) references an atom outside 0..{}",
                atoms.len()
            )));
        }
        graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), bond);
    }
    validate_molecule(&graph)?;
    Ok(graph)
}

/// Checks the adjacency structure: no self-loop bonds, and at most one bond
/// between any atom pair.
pub fn validate_molecule(graph: &MoleculeGraph) -> Result<(), SignatureError> {
    let mut seen = HashSet::new();
    for edge in graph.edge_references() {
        let a = edge.source().index();
        let b = edge.target().index();
        if a == b {
            return Err(SignatureError::MalformedGraph(format!(
                "atom {a} is bonded to itself"
            )));
        }
        let pair = (a.min(b), a.max(b));
        if !seen.insert(pair) {
            return Err(SignatureError::MalformedGraph(format!(
                "duplicate bond between atoms {} and {}",
                pair.0, pair.1
            )));
        }
    }
    Ok(())
}

pub fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let _ = tracing_subscriber::fmt().with_max_level(level).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_ignore_aromaticity() {
        assert_eq!(Element::C.symbol(), "C");
        assert_eq!(Element::CAromatic.symbol(), "C");
        assert_eq!(Element::Cl.symbol(), "Cl");
        assert!(Element::NAromatic.is_aromatic());
        assert!(!Element::N.is_aromatic());
    }

    #[test]
    fn symbol_lookup_round_trips() {
        assert_eq!(Element::from_symbol("C"), Some(Element::C));
        assert_eq!(Element::from_symbol("c"), Some(Element::CAromatic));
        assert_eq!(Element::from_symbol("Br"), Some(Element::Br));
        assert_eq!(Element::from_symbol("Xx"), None);
        assert_eq!(Bond::from_symbol('='), Some(Bond::Double));
        assert_eq!(Bond::from_symbol('?'), None);
    }

    #[test]
    fn from_parts_builds_ethanol() {
        // CCO
        let atoms = [
            Atom::new(Element::C),
            Atom::new(Element::C),
            Atom::new(Element::O),
        ];
        let bonds = [(0, 1, Bond::Single), (1, 2, Bond::Single)];
        let mol = molecule_from_parts(&atoms, &bonds).unwrap();
        assert_eq!(mol.node_count(), 3);
        assert_eq!(mol.edge_count(), 2);
    }

    #[test]
    fn from_parts_rejects_dangling_bond() {
        let atoms = [Atom::new(Element::C), Atom::new(Element::C)];
        let bonds = [(0, 5, Bond::Single)];
        let err = molecule_from_parts(&atoms, &bonds).unwrap_err();
        assert!(matches!(err, SignatureError::MalformedGraph(_)));
    }

    #[test]
    fn validate_rejects_self_loop() {
        let mut mol = MoleculeGraph::default();
        let c = mol.add_node(Atom::new(Element::C));
        mol.add_edge(c, c, Bond::Single);
        let err = validate_molecule(&mol).unwrap_err();
        assert!(matches!(err, SignatureError::MalformedGraph(_)));
    }

    #[test]
    fn validate_rejects_duplicate_bond() {
        let mut mol = MoleculeGraph::default();
        let a = mol.add_node(Atom::new(Element::C));
        let b = mol.add_node(Atom::new(Element::O));
        mol.add_edge(a, b, Bond::Single);
        mol.add_edge(b, a, Bond::Single);
        let err = validate_molecule(&mol).unwrap_err();
        assert!(matches!(err, SignatureError::MalformedGraph(_)));
    }
}
