//! Simulation and analysis result types

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Measurement outcome counts
///
/// Maps bitstrings (classical bit 0 rightmost) to the number of shots that
/// produced them. Serializes as a plain `{bitstring: count}` map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, usize>", into = "BTreeMap<String, usize>")]
pub struct MeasurementCounts {
    counts: BTreeMap<String, usize>,
    total_shots: usize,
}

impl MeasurementCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_counts(counts: BTreeMap<String, usize>) -> Self {
        let total_shots = counts.values().sum();
        Self {
            counts,
            total_shots,
        }
    }

    /// Record `count` more observations of `bitstring`
    pub fn add(&mut self, bitstring: String, count: usize) {
        *self.counts.entry(bitstring).or_insert(0) += count;
        self.total_shots += count;
    }

    pub fn get(&self, bitstring: &str) -> usize {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Observed frequency of `bitstring`
    pub fn probability(&self, bitstring: &str) -> f64 {
        if self.total_shots == 0 {
            0.0
        } else {
            self.get(bitstring) as f64 / self.total_shots as f64
        }
    }

    pub fn bitstrings(&self) -> impl Iterator<Item = &String> {
        self.counts.keys()
    }

    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    pub fn total_shots(&self) -> usize {
        self.total_shots
    }

    pub fn num_outcomes(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Most frequent outcome; ties go to the smallest bitstring
    pub fn most_common(&self) -> Option<(&str, usize)> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(bs, &count)| (bs.as_str(), count))
    }

    /// Outcomes by descending count, then ascending bitstring
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut outcomes: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(bs, &count)| (bs.as_str(), count))
            .collect();
        outcomes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        outcomes
    }
}

impl From<BTreeMap<String, usize>> for MeasurementCounts {
    fn from(counts: BTreeMap<String, usize>) -> Self {
        Self::from_counts(counts)
    }
}

impl From<MeasurementCounts> for BTreeMap<String, usize> {
    fn from(counts: MeasurementCounts) -> Self {
        counts.counts
    }
}

impl fmt::Display for MeasurementCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Measurement counts ({} shots):", self.total_shots)?;
        for (bitstring, count) in self.sorted() {
            writeln!(
                f,
                "  {}: {} ({:.2}%)",
                bitstring,
                count,
                self.probability(bitstring) * 100.0
            )?;
        }
        Ok(())
    }
}

/// Final pure state of a circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatevectorResult {
    pub num_qubits: usize,
    /// Amplitudes, serialized as `[re, im]` pairs
    pub statevector: Vec<Complex64>,
    pub probabilities: Vec<f64>,
}

/// Answer to a simulation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub statevector: Vec<Complex64>,
    pub probabilities: Vec<f64>,
    pub measurement_counts: MeasurementCounts,
}

/// Single-qubit Bloch vector from the reduced state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlochVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub qubit: usize,
    pub label: String,
}

impl BlochVector {
    /// 1 for a pure single-qubit marginal, 0 for a maximally mixed one
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// ⟨X_q⟩, ⟨Y_q⟩, ⟨Z_q⟩ for every qubit q
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpectationValues {
    #[serde(rename = "X")]
    pub x: Vec<f64>,
    #[serde(rename = "Y")]
    pub y: Vec<f64>,
    #[serde(rename = "Z")]
    pub z: Vec<f64>,
}

/// Aggregate state properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitAnalysis {
    pub probabilities: Vec<f64>,
    pub bloch_vectors: Vec<BlochVector>,
    /// Prefix-cut entropies keyed `cut_1` .. `cut_{n-1}`
    pub entanglement_entropies: BTreeMap<String, f64>,
    pub participation_ratio: f64,
    pub num_nonzero_amplitudes: usize,
}

/// Answer to an analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub statevector: Vec<Complex64>,
    pub probabilities: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fidelity: Option<f64>,
    pub expectation_values: ExpectationValues,
    pub bloch_vectors: Vec<BlochVector>,
    pub entanglement_entropies: BTreeMap<String, f64>,
    pub participation_ratio: f64,
    pub num_nonzero_amplitudes: usize,
    /// Rows of `[re, im]` pairs, present when requested and within limits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density_matrix: Option<Vec<Vec<Complex64>>>,
    /// Counts from a short noisy run, present for noisy requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noisy_counts: Option<MeasurementCounts>,
}
