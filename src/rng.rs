// PCG-LCG pseudo-random generator with deterministic per-history streams.
//
// The base generator is an LCG with PCG RXS-M-XS output permutation; state
// is a single u64 so reseeding a fresh stream per history is free. Stream
// seeds derive from (run seed, batch, history) via SplitMix64 so results
// are bit-identical regardless of how histories are scheduled.

use rand::{RngCore, SeedableRng};

/// LCG multiplier
const PRN_MULT: u64 = 6364136223846793005;
/// LCG additive constant
const PRN_ADD: u64 = 1442695040888963407;

/// Fast PCG-variant RNG with O(1) stream derivation.
///
/// Reference: Melissa E. O'Neill, "PCG: A Family of Simple Fast
/// Space-Efficient Statistically Good Algorithms for Random Number
/// Generation"
#[derive(Clone, Copy, Debug)]
pub struct FastRng {
    seed: u64,
}

impl FastRng {
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Private stream for one particle history. The mapping from
    /// (seed, batch, history) to stream is fixed, which is what makes
    /// runs reproducible independent of worker count.
    pub fn stream(seed: u64, batch: u64, history: u64) -> Self {
        let mut z = splitmix64(seed ^ batch.wrapping_mul(0x9E3779B97F4A7C15));
        z = splitmix64(z ^ history.wrapping_mul(0xD1B54A32D192ED03));
        Self::new(z)
    }

    /// Generate a random f64 in [0, 1)
    #[inline(always)]
    pub fn random(&mut self) -> f64 {
        // Equivalent to ldexp(next_u64(), -64)
        (self.next_u64() as f64) * 5.421010862427522e-20
    }

    /// Reseed the RNG (for reuse across particles)
    #[inline]
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
    }
}

#[inline]
fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

impl SeedableRng for FastRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            seed: u64::from_le_bytes(seed),
        }
    }
}

impl RngCore for FastRng {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        // Advance the LCG
        self.seed = PRN_MULT.wrapping_mul(self.seed).wrapping_add(PRN_ADD);

        // PCG output permutation (RXS-M-XS variant)
        let word = ((self.seed >> ((self.seed >> 59) + 5)) ^ self.seed)
            .wrapping_mul(12605985483714917081);
        (word >> 43) ^ word
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut left = dest;
        while left.len() >= 8 {
            let bytes = self.next_u64().to_le_bytes();
            left[..8].copy_from_slice(&bytes);
            left = &mut left[8..];
        }
        if !left.is_empty() {
            let bytes = self.next_u64().to_le_bytes();
            left.copy_from_slice(&bytes[..left.len()]);
        }
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
