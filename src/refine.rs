use crate::{
    atom_invariants, refine_step, validate_molecule, MoleculeGraph, Partition, SignatureError,
};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace};

/// Why a refinement run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Orbit membership stopped changing between consecutive heights, or the
    /// partition became discrete.
    Stabilized,
    /// The height ceiling was hit first; the partition may still be refinable.
    MaxHeightReached,
}

/// The outcome of iterative refinement: the final partition, every atom's
/// signature at the final height, and the per-height orbit counts.
#[derive(Debug, Clone)]
pub struct Refinement {
    pub partition: Partition,
    pub signatures: Vec<String>,
    pub height: usize,
    pub termination: Termination,
    pub history: Vec<usize>,
}

impl Refinement {
    /// False when the run hit the height ceiling, in which case atoms grouped
    /// together might still be distinguishable at greater heights.
    pub fn exact(&self) -> bool {
        matches!(self.termination, Termination::Stabilized)
    }

    pub fn signature_of(&self, atom: usize) -> Option<&str> {
        self.signatures.get(atom).map(|s| s.as_str())
    }
}

/// Labels a round's signatures by rank among the round's sorted distinct
/// strings. Equal signatures get equal labels, and the labels depend only on
/// the signature multiset, never on atom numbering.
fn rank_labels(signatures: &[String], height: usize) -> Vec<String> {
    let distinct: BTreeSet<&str> = signatures.iter().map(|s| s.as_str()).collect();
    let ranks: HashMap<&str, usize> = distinct
        .into_iter()
        .enumerate()
        .map(|(rank, signature)| (signature, rank))
        .collect();
    signatures
        .iter()
        .map(|signature| format!("h{height}o{}", ranks[signature.as_str()]))
        .collect()
}

fn partition_round(signatures: &[String], height: usize) -> Partition {
    Partition::from_labels(rank_labels(signatures, height), height)
}

/// Runs iterative partition refinement up to `max_height`.
///
/// Height 0 groups atoms by invariant alone; each later round lifts
/// signatures one bond deeper and regroups. Refinement only ever splits
/// orbits, so the orbit count grows monotonically and the loop stops at the
/// first height whose membership matches the previous one. A discrete
/// partition stops it early, and the ceiling stops it with a
/// `MaxHeightReached` flag.
pub fn refine(graph: &MoleculeGraph, max_height: usize) -> Result<Refinement, SignatureError> {
    validate_molecule(graph)?;
    let colors: Vec<String> = atom_invariants(graph)
        .iter()
        .map(|invariant| invariant.to_string())
        .collect();
    let mut signatures = colors.clone();
    let mut partition = partition_round(&signatures, 0);
    let mut history = vec![partition.orbit_count()];
    let mut height = 0;
    debug!(
        atoms = graph.node_count(),
        orbits = partition.orbit_count(),
        "initial invariant partition"
    );

    loop {
        if partition.is_discrete() {
            debug!(height, "partition discrete, stabilized");
            return Ok(Refinement {
                partition,
                signatures,
                height,
                termination: Termination::Stabilized,
                history,
            });
        }
        if height >= max_height {
            debug!(height, "height ceiling reached before stabilization");
            return Ok(Refinement {
                partition,
                signatures,
                height,
                termination: Termination::MaxHeightReached,
                history,
            });
        }
        let next_signatures = refine_step(graph, &colors, &signatures, height + 1);
        let next_partition = partition_round(&next_signatures, height + 1);
        history.push(next_partition.orbit_count());
        trace!(
            height = height + 1,
            orbits = next_partition.orbit_count(),
            "refinement round"
        );
        if next_partition.same_membership(&partition) {
            debug!(height, orbits = partition.orbit_count(), "membership stable");
            return Ok(Refinement {
                partition,
                signatures,
                height,
                termination: Termination::Stabilized,
                history,
            });
        }
        partition = next_partition;
        signatures = next_signatures;
        height += 1;
    }
}
