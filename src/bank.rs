// Fission bank: fission sites produced by one generation, consumed as the
// source of the next. Histories collect sites into private buffers that
// are merged in history order at the batch barrier, then the merged bank
// is resampled back to the configured population size.

use rand::Rng;

/// One banked fission site.
#[derive(Debug, Clone, PartialEq)]
pub struct FissionSite {
    pub position: [f64; 3],
    pub group: usize,
    pub weight: f64,
    /// Delayed precursor family that produced this neutron, None if prompt.
    pub delayed_family: Option<usize>,
}

/// Ordered collection of fission sites for one generation.
#[derive(Debug, Clone, Default)]
pub struct FissionBank {
    sites: Vec<FissionSite>,
}

impl FissionBank {
    pub fn new() -> Self {
        FissionBank { sites: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        FissionBank {
            sites: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, site: FissionSite) {
        self.sites.push(site);
    }

    /// Merge a history's private site buffer, preserving order.
    pub fn extend(&mut self, sites: Vec<FissionSite>) {
        self.sites.extend(sites);
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn clear(&mut self) {
        self.sites.clear();
    }

    pub fn site(&self, index: usize) -> &FissionSite {
        &self.sites[index]
    }

    pub fn sites(&self) -> &[FissionSite] {
        &self.sites
    }

    pub fn total_weight(&self) -> f64 {
        self.sites.iter().map(|s| s.weight).sum()
    }

    /// Normalize the population to exactly `target` sites by uniform
    /// sampling with replacement. Raw fission production fluctuates batch
    /// to batch; this keeps the generation size stable. Resampled sites
    /// restart at unit weight. Panics if the bank is empty (the driver
    /// reports an empty bank as a dead fission chain before calling).
    pub fn resample<R: Rng + ?Sized>(&mut self, target: usize, rng: &mut R) {
        assert!(!self.sites.is_empty(), "cannot resample an empty bank");
        if self.sites.len() == target {
            for site in &mut self.sites {
                site.weight = 1.0;
            }
            return;
        }
        let mut resampled = Vec::with_capacity(target);
        for _ in 0..target {
            let mut site = self.sites[rng.gen_range(0..self.sites.len())].clone();
            site.weight = 1.0;
            resampled.push(site);
        }
        self.sites = resampled;
    }
}
