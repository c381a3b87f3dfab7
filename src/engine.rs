use crate::{
    atom_invariants, atom_signature, refine, validate_molecule, MoleculeGraph, Partition,
    Refinement, SignatureError,
};
use anyhow::{Context, Result};
use tracing::info;

/// Entry point for signature and orbit computation. One engine can serve any
/// number of molecules; each call is an independent run over a read-only
/// graph.
///
/// The height ceiling defaults to the molecule's atom count, which bounds the
/// graph diameter, so refinement always stabilizes before reaching it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureEngine {
    max_height: Option<usize>,
}

impl SignatureEngine {
    pub fn new() -> Self {
        SignatureEngine::default()
    }

    /// An engine with an explicit height ceiling. Runs that hit the ceiling
    /// come back with `exact() == false`.
    pub fn with_max_height(max_height: usize) -> Self {
        SignatureEngine {
            max_height: Some(max_height),
        }
    }

    fn ceiling(&self, graph: &MoleculeGraph) -> usize {
        self.max_height.unwrap_or_else(|| graph.node_count())
    }

    /// Runs refinement to stabilization (or the ceiling) and returns the full
    /// outcome.
    pub fn refine(&self, graph: &MoleculeGraph) -> Result<Refinement> {
        let refinement =
            refine(graph, self.ceiling(graph)).context("refinement rejected the molecule")?;
        info!(
            atoms = graph.node_count(),
            height = refinement.height,
            orbits = refinement.partition.orbit_count(),
            exact = refinement.exact(),
            "refinement complete"
        );
        Ok(refinement)
    }

    /// The canonical whole-molecule signature: one `count*signature` entry
    /// per final orbit, sorted and joined with `.`. Equal strings are
    /// necessary but not sufficient for isomorphism. An empty molecule yields
    /// an empty string.
    pub fn molecule_signature(&self, graph: &MoleculeGraph) -> Result<String> {
        let refinement = self.refine(graph)?;
        let mut entries: Vec<String> = refinement
            .partition
            .orbits()
            .filter_map(|orbit| {
                let representative = orbit.representative()?;
                Some(format!(
                    "{}*{}",
                    orbit.len(),
                    refinement.signatures[representative]
                ))
            })
            .collect();
        entries.sort();
        Ok(entries.join("."))
    }

    /// Groups the molecule's atoms into equivalence classes.
    pub fn atom_orbits(&self, graph: &MoleculeGraph) -> Result<Partition> {
        Ok(self.refine(graph)?.partition)
    }

    /// Whether two molecules share a whole-molecule signature.
    pub fn same_signature(&self, left: &MoleculeGraph, right: &MoleculeGraph) -> Result<bool> {
        Ok(self.molecule_signature(left)? == self.molecule_signature(right)?)
    }

    /// The signature of one atom at an explicit height, computed over the
    /// invariant colors without running refinement.
    pub fn atom_signature_at(
        &self,
        graph: &MoleculeGraph,
        atom: usize,
        height: usize,
    ) -> Result<String> {
        validate_molecule(graph).context("molecule failed validation")?;
        if atom >= graph.node_count() {
            return Err(SignatureError::InvalidIndex {
                index: atom,
                atom_count: graph.node_count(),
            })
            .context(format!("cannot compute a signature rooted at atom {atom}"));
        }
        let colors: Vec<String> = atom_invariants(graph)
            .iter()
            .map(|invariant| invariant.to_string())
            .collect();
        Ok(atom_signature(graph, &colors, atom, height))
    }
}

/// Convenience surface on the graph itself, using a default engine.
pub trait CanonicalSignature {
    fn canonical_signature(&self) -> Result<String>;
    fn canonical_orbits(&self) -> Result<Partition>;
}

impl CanonicalSignature for MoleculeGraph {
    fn canonical_signature(&self) -> Result<String> {
        SignatureEngine::new().molecule_signature(self)
    }

    fn canonical_orbits(&self) -> Result<Partition> {
        SignatureEngine::new().atom_orbits(self)
    }
}
