// Batch-level event tallies. Each history reports its counts into a
// BatchCounts accumulator; at the batch barrier the accumulated counts
// are pushed into per-quantity tallies normalized per source particle.

use std::fmt;

use crate::stats::RunningStat;

/// Event counts accumulated over one batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchCounts {
    pub leaked: usize,
    pub absorbed: usize,
    pub collisions: usize,
    /// Total fission-neutron weight banked this batch.
    pub fission_weight: f64,
}

impl BatchCounts {
    pub fn new() -> Self {
        BatchCounts::default()
    }

    pub fn merge(&mut self, other: &BatchCounts) {
        self.leaked += other.leaked;
        self.absorbed += other.absorbed;
        self.collisions += other.collisions;
        self.fission_weight += other.fission_weight;
    }
}

/// Per-source-particle tally of one scored quantity across batches.
#[derive(Debug, Clone)]
pub struct Tally {
    pub name: String,
    pub units: String,
    pub batch_data: Vec<f64>,
    stat: RunningStat,
}

impl Tally {
    pub fn new(name: &str, units: &str) -> Self {
        Tally {
            name: name.to_string(),
            units: units.to_string(),
            batch_data: Vec::new(),
            stat: RunningStat::new(),
        }
    }

    /// Record one batch's raw count, normalized by particles per batch.
    pub fn add_batch(&mut self, count: f64, particles: usize) {
        let value = count / particles as f64;
        self.batch_data.push(value);
        self.stat.push(value);
    }

    pub fn n_batches(&self) -> usize {
        self.stat.count()
    }

    /// Mean per source particle.
    pub fn mean(&self) -> f64 {
        self.stat.mean()
    }

    pub fn std_dev(&self) -> f64 {
        self.stat.std_dev()
    }

    /// Coefficient of variation; zero when the mean is zero.
    pub fn rel_error(&self) -> f64 {
        let mean = self.stat.mean();
        if mean > 0.0 {
            self.stat.std_dev() / mean
        } else {
            0.0
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tally: {}", self.name)?;
        writeln!(f, "  Mean: {:.6} {} per particle", self.mean(), self.units)?;
        writeln!(f, "  Std Dev: {:.6}", self.std_dev())?;
        writeln!(
            f,
            "  Rel Error: {:.4} ({:.2}%)",
            self.rel_error(),
            self.rel_error() * 100.0
        )?;
        write!(f, "  Batches: {}", self.n_batches())
    }
}

/// The standard tally set scored on every run.
#[derive(Debug, Clone)]
pub struct TallySet {
    pub leakage: Tally,
    pub absorption: Tally,
    pub collision: Tally,
}

impl TallySet {
    pub fn new() -> Self {
        TallySet {
            leakage: Tally::new("Leakage", "particles"),
            absorption: Tally::new("Absorption", "particles"),
            collision: Tally::new("Collision", "collisions"),
        }
    }

    pub fn add_batch(&mut self, counts: &BatchCounts, particles: usize) {
        self.leakage.add_batch(counts.leaked as f64, particles);
        self.absorption.add_batch(counts.absorbed as f64, particles);
        self.collision.add_batch(counts.collisions as f64, particles);
    }
}

impl Default for TallySet {
    fn default() -> Self {
        TallySet::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_counts_merge() {
        let mut a = BatchCounts {
            leaked: 1,
            absorbed: 2,
            collisions: 10,
            fission_weight: 3.0,
        };
        let b = BatchCounts {
            leaked: 4,
            absorbed: 1,
            collisions: 5,
            fission_weight: 2.5,
        };
        a.merge(&b);
        assert_eq!(a.leaked, 5);
        assert_eq!(a.absorbed, 3);
        assert_eq!(a.collisions, 15);
        assert_eq!(a.fission_weight, 5.5);
    }

    #[test]
    fn test_tally_normalizes_per_particle() {
        let mut tally = Tally::new("Leakage", "particles");
        tally.add_batch(50.0, 100);
        tally.add_batch(70.0, 100);
        assert_eq!(tally.n_batches(), 2);
        assert!((tally.mean() - 0.6).abs() < 1e-12);
        assert!(tally.std_dev() > 0.0);
        assert!(tally.rel_error() > 0.0);
    }

    #[test]
    fn test_zero_mean_has_zero_rel_error() {
        let mut tally = Tally::new("Absorption", "particles");
        tally.add_batch(0.0, 100);
        tally.add_batch(0.0, 100);
        assert_eq!(tally.rel_error(), 0.0);
    }

    #[test]
    fn test_tally_set_scores_all_quantities() {
        let mut set = TallySet::new();
        let counts = BatchCounts {
            leaked: 20,
            absorbed: 80,
            collisions: 300,
            fission_weight: 95.0,
        };
        set.add_batch(&counts, 100);
        assert!((set.leakage.mean() - 0.2).abs() < 1e-12);
        assert!((set.absorption.mean() - 0.8).abs() < 1e-12);
        assert!((set.collision.mean() - 3.0).abs() < 1e-12);
    }
}
