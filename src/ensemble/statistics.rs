//! Aggregate statistics over the outcomes of an ensemble.

use super::OutcomeRecord;
use crate::{
    error::SimulationResult,
    tracing::{ftr, TerminationCause},
};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Histogram with uniformly sized bins over a closed range.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Histogram {
    lower: ftr,
    upper: ftr,
    counts: Vec<u64>,
    underflow: u64,
    overflow: u64,
}

impl Histogram {
    /// Creates a new empty histogram with the given number of bins over `[lower, upper]`.
    pub fn new(lower: ftr, upper: ftr, n_bins: usize) -> SimulationResult<Self> {
        crate::ensure_valid!(n_bins > 0, "Histogram must have at least one bin");
        crate::ensure_valid!(
            lower.is_finite() && upper.is_finite() && lower < upper,
            "Histogram range must be finite and increasing, got [{}, {}]",
            lower,
            upper
        );
        Ok(Self::from_counts(lower, upper, vec![0; n_bins], 0, 0))
    }

    pub(crate) fn from_counts(
        lower: ftr,
        upper: ftr,
        counts: Vec<u64>,
        underflow: u64,
        overflow: u64,
    ) -> Self {
        Self {
            lower,
            upper,
            counts,
            underflow,
            overflow,
        }
    }

    /// Returns the index of the bin containing the given value, if it is
    /// inside the range. The upper bound belongs to the last bin.
    pub fn bin_index(&self, value: ftr) -> Option<usize> {
        if !(value >= self.lower && value <= self.upper) {
            return None;
        }
        let n_bins = self.counts.len();
        let idx = ((value - self.lower) / (self.upper - self.lower) * n_bins as ftr) as usize;
        Some(idx.min(n_bins - 1))
    }

    /// Adds the given value to the histogram.
    pub fn add(&mut self, value: ftr) {
        match self.bin_index(value) {
            Some(idx) => self.counts[idx] += 1,
            None if value < self.lower => self.underflow += 1,
            None => self.overflow += 1,
        }
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// Returns the number of values inside the range.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Returns the `n_bins + 1` bin edges.
    pub fn bin_edges(&self) -> Vec<ftr> {
        let n_bins = self.counts.len();
        let width = (self.upper - self.lower) / n_bins as ftr;
        (0..=n_bins).map(|i| self.lower + i as ftr * width).collect()
    }

    /// Returns the centers of the bins.
    pub fn bin_centers(&self) -> Vec<ftr> {
        let edges = self.bin_edges();
        edges.windows(2).map(|pair| 0.5 * (pair[0] + pair[1])).collect()
    }
}

/// Counts and energy distributions over the outcomes of an ensemble.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct EnsembleStatistics {
    n_time_limit: u64,
    n_boundary_escape: u64,
    n_absorbed: u64,
    n_detected: u64,
    n_failed: u64,
    kinetic_energy_all: Histogram,
    kinetic_energy_detected: Histogram,
    detected_energy_sum: ftr,
    detected_energy_squared_sum: ftr,
}

impl EnsembleStatistics {
    /// Creates new empty statistics with kinetic energy histograms over the
    /// given range [eV].
    pub fn new(energy_range: (ftr, ftr), n_bins: usize) -> SimulationResult<Self> {
        let histogram = Histogram::new(energy_range.0, energy_range.1, n_bins)?;
        Ok(Self {
            n_time_limit: 0,
            n_boundary_escape: 0,
            n_absorbed: 0,
            n_detected: 0,
            n_failed: 0,
            kinetic_energy_all: histogram.clone(),
            kinetic_energy_detected: histogram,
            detected_energy_sum: 0.0,
            detected_energy_squared_sum: 0.0,
        })
    }

    /// Adds the outcome of a single particle.
    pub fn add_record(&mut self, record: &OutcomeRecord) {
        match record.cause {
            TerminationCause::TimeLimit => self.n_time_limit += 1,
            TerminationCause::BoundaryEscape => self.n_boundary_escape += 1,
            TerminationCause::Absorbed(_) if record.cause.is_detected() => {
                self.n_detected += 1;
                self.kinetic_energy_detected.add(record.kinetic_energy);
                self.detected_energy_sum += record.kinetic_energy;
                self.detected_energy_squared_sum += record.kinetic_energy * record.kinetic_energy;
            }
            TerminationCause::Absorbed(_) => self.n_absorbed += 1,
        }
        self.kinetic_energy_all.add(record.kinetic_energy);
    }

    /// Counts a particle whose simulation failed.
    pub fn add_failure(&mut self) {
        self.n_failed += 1;
    }

    /// Returns the number of particles whose simulation completed.
    pub fn n_completed(&self) -> u64 {
        self.n_time_limit + self.n_boundary_escape + self.n_absorbed + self.n_detected
    }

    pub fn n_time_limit(&self) -> u64 {
        self.n_time_limit
    }

    pub fn n_boundary_escape(&self) -> u64 {
        self.n_boundary_escape
    }

    pub fn n_absorbed(&self) -> u64 {
        self.n_absorbed
    }

    pub fn n_detected(&self) -> u64 {
        self.n_detected
    }

    pub fn n_failed(&self) -> u64 {
        self.n_failed
    }

    /// Returns the fraction of completed particles that were detected.
    pub fn detection_efficiency(&self) -> Option<ftr> {
        let n_completed = self.n_completed();
        if n_completed == 0 {
            None
        } else {
            Some(self.n_detected as ftr / n_completed as ftr)
        }
    }

    /// Returns the mean kinetic energy of detected particles [eV].
    pub fn mean_detected_energy(&self) -> Option<ftr> {
        if self.n_detected == 0 {
            None
        } else {
            Some(self.detected_energy_sum / self.n_detected as ftr)
        }
    }

    /// Returns the standard deviation of the kinetic energy of detected particles [eV].
    pub fn detected_energy_std(&self) -> Option<ftr> {
        self.mean_detected_energy().map(|mean| {
            let mean_squared = self.detected_energy_squared_sum / self.n_detected as ftr;
            (mean_squared - mean * mean).max(0.0).sqrt()
        })
    }

    pub fn kinetic_energy_all(&self) -> &Histogram {
        &self.kinetic_energy_all
    }

    pub fn kinetic_energy_detected(&self) -> &Histogram {
        &self.kinetic_energy_detected
    }
}
