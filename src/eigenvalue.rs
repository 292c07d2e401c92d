// Batch drivers for the two run modes. One batch runs its histories in
// parallel over a rayon pool; every history draws an independent random
// stream keyed by (seed, batch, history), and results are merged in
// history order, so output is bit-identical for any worker count.
//
// The barrier between batches is the only synchronization point: the
// fission bank is merged and resampled there, the k estimate is scored
// there, and the external stop flag is checked there. Histories are
// never interrupted mid-flight.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::bank::FissionBank;
use crate::error::{Result, TransportError};
use crate::geometry::Geometry;
use crate::material::MaterialTable;
use crate::particle::Particle;
use crate::physics;
use crate::rng::FastRng;
use crate::settings::Settings;
use crate::stats::RunningStat;
use crate::tally::{BatchCounts, TallySet};
use crate::transport::{transport_history, HistoryResult, TerminationCause};

/// Results of an eigenvalue run. Statistics cover active batches only;
/// `k_by_batch` keeps the full sequence including inactive batches.
#[derive(Debug, Clone)]
pub struct EigenvalueResults {
    pub k_by_batch: Vec<f64>,
    pub k_mean: f64,
    pub k_std_dev: f64,
    pub k_std_err: f64,
    pub inactive: usize,
    pub completed_batches: usize,
    pub tallies: TallySet,
    /// True if the run stopped early at a batch barrier via the stop flag.
    pub aborted: bool,
}

/// Results of a fixed-source run. Every batch is active.
#[derive(Debug, Clone)]
pub struct FixedSourceResults {
    pub completed_batches: usize,
    pub tallies: TallySet,
    pub aborted: bool,
}

/// Run all histories of one batch in parallel and return their results
/// in history order. Batch 1 of an eigenvalue run (and every fixed-source
/// batch) passes an empty bank and draws from the configured source.
fn run_batch(
    geometry: &Geometry,
    materials: &MaterialTable,
    settings: &Settings,
    bank: &FissionBank,
    batch: usize,
) -> Result<Vec<HistoryResult>> {
    (0..settings.particles)
        .into_par_iter()
        .map(|history| {
            let mut rng = FastRng::stream(settings.seed, batch as u64, history as u64);
            let particle = if bank.is_empty() {
                settings.source.sample(&mut rng)
            } else {
                // The bank was resampled to exactly `particles` sites at
                // the previous barrier. Fission neutrons are emitted
                // isotropically at unit weight.
                let site = bank.site(history);
                Particle::new(
                    site.position,
                    physics::isotropic_direction(&mut rng),
                    site.group,
                )
            };
            transport_history(
                geometry,
                materials,
                &settings.scattering,
                particle,
                batch,
                &mut rng,
            )
        })
        .collect()
}

/// Fold one batch's history results into event counts and the raw
/// next-generation bank, preserving history order in the bank.
fn merge_batch(results: Vec<HistoryResult>, next_bank: &mut FissionBank) -> BatchCounts {
    let mut counts = BatchCounts::new();
    for result in results {
        match result.cause {
            TerminationCause::Leaked => counts.leaked += 1,
            TerminationCause::Absorbed | TerminationCause::Cutoff => counts.absorbed += 1,
        }
        counts.collisions += result.collisions;
        counts.fission_weight += result.fission_weight;
        next_bank.extend(result.sites);
    }
    counts
}

fn stop_requested(stop: Option<&AtomicBool>) -> bool {
    stop.map(|flag| flag.load(Ordering::Relaxed)).unwrap_or(false)
}

/// Power-iteration eigenvalue run: `batches` generations of `particles`
/// histories each, with the fission bank carried between generations and
/// the first `inactive` batches excluded from final statistics.
pub fn run_eigenvalue(
    geometry: &Geometry,
    materials: &MaterialTable,
    settings: &Settings,
    stop: Option<&AtomicBool>,
) -> Result<EigenvalueResults> {
    settings.validate()?;

    info!(
        "eigenvalue run: {} particles, {} batches ({} inactive), seed {}",
        settings.particles, settings.batches, settings.inactive, settings.seed
    );

    let mut bank = FissionBank::new();
    let mut k_by_batch = Vec::with_capacity(settings.batches);
    let mut k_stat = RunningStat::new();
    let mut tallies = TallySet::new();
    let mut completed = 0usize;
    let mut aborted = false;

    for batch in 1..=settings.batches {
        if stop_requested(stop) {
            warn!("stop requested; aborting before batch {}", batch);
            aborted = true;
            break;
        }

        let results = run_batch(geometry, materials, settings, &bank, batch)?;

        let mut next_bank = FissionBank::with_capacity(settings.particles);
        let counts = merge_batch(results, &mut next_bank);

        let k_batch = counts.fission_weight / settings.particles as f64;
        k_by_batch.push(k_batch);
        completed = batch;

        if batch > settings.inactive {
            k_stat.push(k_batch);
            tallies.add_batch(&counts, settings.particles);
            info!("batch {:>4}: k = {:.5}", batch, k_batch);
        } else {
            debug!("batch {:>4}: k = {:.5} (inactive)", batch, k_batch);
        }

        if batch < settings.batches {
            if next_bank.is_empty() {
                return Err(TransportError::DeadFissionChain { batch });
            }
            // Stabilize the generation size before the next batch
            let mut rng = FastRng::stream(settings.seed, batch as u64, u64::MAX);
            next_bank.resample(settings.particles, &mut rng);
        }
        bank = next_bank;
    }

    info!(
        "final k-effective: {:.5} +/- {:.5} over {} active batches",
        k_stat.mean(),
        k_stat.std_err(),
        k_stat.count()
    );

    Ok(EigenvalueResults {
        k_by_batch,
        k_mean: k_stat.mean(),
        k_std_dev: k_stat.std_dev(),
        k_std_err: k_stat.std_err(),
        inactive: settings.inactive,
        completed_batches: completed,
        tallies,
        aborted,
    })
}

/// Fixed-source run: every batch draws all histories from the configured
/// source, and every batch contributes to the tallies.
pub fn run_fixed_source(
    geometry: &Geometry,
    materials: &MaterialTable,
    settings: &Settings,
    stop: Option<&AtomicBool>,
) -> Result<FixedSourceResults> {
    settings.validate()?;

    info!(
        "fixed-source run: {} particles, {} batches, seed {}",
        settings.particles, settings.batches, settings.seed
    );

    let empty = FissionBank::new();
    let mut tallies = TallySet::new();
    let mut completed = 0usize;
    let mut aborted = false;

    for batch in 1..=settings.batches {
        if stop_requested(stop) {
            warn!("stop requested; aborting before batch {}", batch);
            aborted = true;
            break;
        }

        let results = run_batch(geometry, materials, settings, &empty, batch)?;
        let mut discard = FissionBank::new();
        let counts = merge_batch(results, &mut discard);
        tallies.add_batch(&counts, settings.particles);
        completed = batch;
        debug!(
            "batch {:>4}: {} leaked, {} absorbed",
            batch, counts.leaked, counts.absorbed
        );
    }

    Ok(FixedSourceResults {
        completed_batches: completed,
        tallies,
        aborted,
    })
}
