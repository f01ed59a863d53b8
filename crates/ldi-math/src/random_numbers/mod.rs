//! Seedable random number generation.
//!
//! Every simulator takes its generator as `&mut R where R: Rng + ?Sized`, so
//! callers own the stream. [`MersenneTwisterRng`] is the reproducible
//! default: two generators built from the same seed yield identical paths.

use ldi_core::Real;
use rand::RngCore;
use rand_mt::Mt19937GenRand64;

/// Mersenne Twister MT19937-64 behind the `rand` generator interface.
#[derive(Clone)]
pub struct MersenneTwisterRng {
    rng: Mt19937GenRand64,
}

impl MersenneTwisterRng {
    /// Create a new generator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mt19937GenRand64::new(seed),
        }
    }

    /// Next uniform deviate in `[0, 1)`.
    pub fn next_real(&mut self) -> Real {
        // top 53 bits -> exactly representable multiples of 2^-53
        (self.rng.next_u64() >> 11) as Real / (1u64 << 53) as Real
    }
}

impl std::fmt::Debug for MersenneTwisterRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MersenneTwisterRng").finish_non_exhaustive()
    }
}

impl RngCore for MersenneTwisterRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.fill_bytes(dest);
        Ok(())
    }
}
