//! Placeholder randomness.
//!
//! # Security
//!
//! [`NonCryptoRandom`] is **not** a cryptographically secure generator. It exists so that
//! parameter objects and paddings which want *some* randomness (ISO 10126-2 fill bytes) have a
//! deterministic, dependency free source. Never use it for keys or nonces.
use rand_core::{impls, Error as RngError, RngCore, SeedableRng};

/// A `SplitMix64` generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NonCryptoRandom {
    state: u64,
}

impl NonCryptoRandom {
    const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

    /// Creates a generator from a 64 bit seed.
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_add(Self::GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

impl Default for NonCryptoRandom {
    fn default() -> Self {
        Self::new(Self::GOLDEN_GAMMA)
    }
}

impl RngCore for NonCryptoRandom {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        (self.next() >> 32) as u32
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.next()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RngError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for NonCryptoRandom {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitmix_reference_output() {
        // first outputs of SplitMix64 seeded with 0
        let mut rng = NonCryptoRandom::new(0);
        assert_eq!(rng.next_u64(), 0xe220_a839_7b1d_cdaf);
        assert_eq!(rng.next_u64(), 0x6e78_9e6a_a1b9_65f4);
    }

    #[test]
    fn deterministic_per_seed() {
        let mut a = NonCryptoRandom::seed_from_u64(42);
        let mut b = NonCryptoRandom::seed_from_u64(42);

        let mut out_a = [0u8; 37];
        let mut out_b = [0u8; 37];
        a.fill_bytes(&mut out_a);
        b.fill_bytes(&mut out_b);

        assert_eq!(out_a, out_b);
        assert_ne!(out_a, [0u8; 37]);
    }

    #[test]
    fn clones_share_position() {
        let mut a = NonCryptoRandom::default();
        a.next_u32();
        let mut b = a.clone();
        assert_eq!(a.next_u64(), b.next_u64());
    }
}
