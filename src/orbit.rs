use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// One equivalence class of atoms: a label, the neighborhood height the
/// class was formed at, and the member atom indices in insertion order.
///
/// Membership is a growable sequence paired with a presence set, so adding
/// a duplicate is a no-op and iteration order is the insertion order.
/// The orbit holds no reference to the molecule and does not range-check
/// indices; callers validate against the graph before adding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orbit {
    label: String,
    height: usize,
    atoms: Vec<usize>,
    present: HashSet<usize>,
}

impl Orbit {
    pub fn new(label: impl Into<String>, height: usize) -> Self {
        Orbit {
            label: label.into(),
            height,
            atoms: Vec::new(),
            present: HashSet::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn add_atom(&mut self, atom: usize) {
        if self.present.insert(atom) {
            self.atoms.push(atom);
        }
    }

    /// Removes an atom if present; absent members are a no-op. The order of
    /// the remaining members is unchanged.
    pub fn remove_atom(&mut self, atom: usize) {
        if self.present.remove(&atom) {
            self.atoms.retain(|&a| a != atom);
        }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.present.contains(&atom)
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Member atom indices in insertion order.
    pub fn atoms(&self) -> &[usize] {
        &self.atoms
    }

    /// The smallest member index, used as the orbit's representative.
    pub fn representative(&self) -> Option<usize> {
        self.atoms.iter().copied().min()
    }
}

impl fmt::Display for Orbit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut sorted = self.atoms.clone();
        sorted.sort_unstable();
        let members = sorted
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} [{}] {{{}}}", self.label, self.height, members)
    }
}

/// A set of orbits covering every atom of one molecule exactly once,
/// together with the height it was formed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    orbits: BTreeMap<String, Orbit>,
    labels: Vec<String>,
    height: usize,
}

impl Partition {
    /// Builds a partition from one label per atom. Atoms sharing a label
    /// land in one orbit, in ascending index order.
    pub fn from_labels(labels: Vec<String>, height: usize) -> Self {
        let mut orbits: BTreeMap<String, Orbit> = BTreeMap::new();
        for (atom, label) in labels.iter().enumerate() {
            orbits
                .entry(label.clone())
                .or_insert_with(|| Orbit::new(label.clone(), height))
                .add_atom(atom);
        }
        Partition {
            orbits,
            labels,
            height,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn orbit_count(&self) -> usize {
        self.orbits.len()
    }

    pub fn atom_count(&self) -> usize {
        self.labels.len()
    }

    /// Orbits in label order.
    pub fn orbits(&self) -> impl Iterator<Item = &Orbit> {
        self.orbits.values()
    }

    pub fn orbit(&self, label: &str) -> Option<&Orbit> {
        self.orbits.get(label)
    }

    pub fn label_of(&self, atom: usize) -> Option<&str> {
        self.labels.get(atom).map(|l| l.as_str())
    }

    /// True when every orbit is a singleton; a discrete partition cannot be
    /// refined further.
    pub fn is_discrete(&self) -> bool {
        self.orbits.values().all(|orbit| orbit.len() == 1)
    }

    /// Compares which atoms are grouped together, ignoring the labels.
    pub fn same_membership(&self, other: &Partition) -> bool {
        fn classes(partition: &Partition) -> Vec<Vec<usize>> {
            let mut classes: Vec<Vec<usize>> = partition
                .orbits
                .values()
                .map(|orbit| {
                    let mut members = orbit.atoms().to_vec();
                    members.sort_unstable();
                    members
                })
                .collect();
            classes.sort();
            classes
        }
        classes(self) == classes(other)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rendered = self
            .orbits
            .values()
            .map(|orbit| orbit.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{rendered}")
    }
}
