//! Execution results.

use std::collections::BTreeMap;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Measurement counts keyed by bitstring.
///
/// Bitstrings read the flat classical bits from highest index (leftmost) to
/// lowest (rightmost).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring` (0 if never seen).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Sum of all occurrences.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// The most frequent bitstring; ties go to the lexicographically smallest.
    pub fn most_frequent(&self) -> Option<(&String, &u64)> {
        self.counts
            .iter()
            .fold(None, |best: Option<(&String, &u64)>, (k, v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((k, v)),
            })
    }

    /// Relative frequencies.
    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        let total = self.total() as f64;
        if total == 0.0 {
            return BTreeMap::new();
        }
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total))
            .collect()
    }

    /// The underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }
}

impl<'a> IntoIterator for &'a Counts {
    type Item = (&'a String, &'a u64);
    type IntoIter = std::collections::btree_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

/// Recorded state vectors, label → one vector per recording in shot order.
pub type Snapshots = BTreeMap<String, Vec<Vec<Complex64>>>;

/// Outcome of executing a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    counts: Counts,
    snapshots: Snapshots,
    shots: u32,
    seed: u64,
    execution_time_ms: u64,
}

impl SimulationResult {
    pub(crate) fn new(
        counts: Counts,
        snapshots: Snapshots,
        shots: u32,
        seed: u64,
        execution_time_ms: u64,
    ) -> Self {
        Self {
            counts,
            snapshots,
            shots,
            seed,
            execution_time_ms,
        }
    }

    /// Measurement counts across all shots.
    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    /// The state vectors recorded under a snapshot label.
    ///
    /// With `None`, the single recorded label is used; it is an error if
    /// there are several ([`SimError::AmbiguousSnapshot`]) or none
    /// ([`SimError::NoSnapshots`]).
    pub fn snapshot(&self, label: Option<&str>) -> SimResult<&[Vec<Complex64>]> {
        match label {
            Some(label) => self
                .snapshots
                .get(label)
                .map(Vec::as_slice)
                .ok_or_else(|| SimError::SnapshotNotFound(label.to_string())),
            None => {
                let mut entries = self.snapshots.values();
                match (entries.next(), entries.next()) {
                    (None, _) => Err(SimError::NoSnapshots),
                    (Some(states), None) => Ok(states),
                    _ => Err(SimError::AmbiguousSnapshot {
                        labels: self.snapshot_labels(),
                    }),
                }
            }
        }
    }

    /// All snapshots.
    pub fn snapshots(&self) -> &Snapshots {
        &self.snapshots
    }

    /// Snapshot labels in sorted order.
    pub fn snapshot_labels(&self) -> Vec<String> {
        self.snapshots.keys().cloned().collect()
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Wall-clock time spent executing, in milliseconds.
    pub fn execution_time_ms(&self) -> u64 {
        self.execution_time_ms
    }
}
