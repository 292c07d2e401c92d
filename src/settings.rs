use crate::error::{Result, TransportError};
use crate::source::IndependentSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    FixedSource,
    Eigenvalue,
}

/// Only multi-group transport is supported; the variant exists so the
/// in-memory model can state its energy treatment explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnergyMode {
    MultiGroup,
}

/// How scattering angles are sampled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScatteringTreatment {
    Isotropic,
    /// Sample the cosine from a tabularized truncated Legendre expansion
    /// of the given order, falling back to isotropic for materials that
    /// carry no angular moments.
    Legendre(usize),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub run_mode: RunMode,
    pub particles: usize,
    pub batches: usize,
    pub inactive: usize,
    pub seed: u64,
    pub source: IndependentSource,
    pub energy_mode: EnergyMode,
    pub scattering: ScatteringTreatment,
}

impl Settings {
    pub fn eigenvalue(
        particles: usize,
        batches: usize,
        inactive: usize,
        source: IndependentSource,
    ) -> Self {
        Settings {
            run_mode: RunMode::Eigenvalue,
            particles,
            batches,
            inactive,
            seed: 1,
            source,
            energy_mode: EnergyMode::MultiGroup,
            scattering: ScatteringTreatment::Isotropic,
        }
    }

    pub fn fixed_source(particles: usize, batches: usize, source: IndependentSource) -> Self {
        Settings {
            run_mode: RunMode::FixedSource,
            particles,
            batches,
            inactive: 0,
            seed: 1,
            source,
            energy_mode: EnergyMode::MultiGroup,
            scattering: ScatteringTreatment::Isotropic,
        }
    }

    /// Validate run counts. Called before any batch runs; violations are
    /// fatal configuration errors.
    pub fn validate(&self) -> Result<()> {
        if self.particles < 1 {
            return Err(TransportError::Configuration(format!(
                "particles must be >= 1, got {}",
                self.particles
            )));
        }
        if self.batches < 1 {
            return Err(TransportError::Configuration(format!(
                "batches must be >= 1, got {}",
                self.batches
            )));
        }
        if self.run_mode == RunMode::Eigenvalue && self.inactive >= self.batches {
            return Err(TransportError::Configuration(format!(
                "inactive batches ({}) must be fewer than total batches ({})",
                self.inactive, self.batches
            )));
        }
        Ok(())
    }
}
