// This module provides helpers shared by the unit and integration tests.
#![allow(clippy::panic, clippy::missing_panics_doc, clippy::unwrap_used)]

use std::num::NonZeroU32;

use rand_chacha::ChaCha12Rng;
use rand_core::{CryptoRng, RngCore, SeedableRng};

/// Used for deterministic Rngs and only in testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCryptoRng(ChaCha12Rng);

impl SeedableRng for MockCryptoRng {
    type Seed = [u8; 32];
    fn seed_from_u64(seed: u64) -> Self {
        Self(ChaCha12Rng::seed_from_u64(seed))
    }

    fn from_seed(seed: Self::Seed) -> Self {
        Self(ChaCha12Rng::from_seed(seed))
    }
}

impl RngCore for MockCryptoRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest);
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for MockCryptoRng {}

/// An entropy source that is always exhausted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingRng;

impl FailingRng {
    fn error() -> rand_core::Error {
        rand_core::Error::from(NonZeroU32::new(rand_core::Error::CUSTOM_START).unwrap())
    }
}

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        panic!("{}", Self::error())
    }
    fn next_u64(&mut self) -> u64 {
        panic!("{}", Self::error())
    }
    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("{}", Self::error())
    }
    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand_core::Error> {
        Err(Self::error())
    }
}

impl CryptoRng for FailingRng {}

/// Yields zero bytes for the first `zero_draws` requests, then defers to a
/// seeded RNG. Drives the blinding resample loop.
#[derive(Debug, Clone)]
pub struct ZeroThenRandomRng {
    zero_draws: usize,
    inner: MockCryptoRng,
}

impl ZeroThenRandomRng {
    pub fn new(zero_draws: usize, seed: u64) -> Self {
        Self {
            zero_draws,
            inner: MockCryptoRng::seed_from_u64(seed),
        }
    }
}

impl RngCore for ZeroThenRandomRng {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }
    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.try_fill_bytes(dest).unwrap();
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        if self.zero_draws > 0 {
            self.zero_draws -= 1;
            dest.fill(0);
            Ok(())
        } else {
            self.inner.try_fill_bytes(dest)
        }
    }
}

impl CryptoRng for ZeroThenRandomRng {}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn test_zero_then_random() {
        let mut rng = ZeroThenRandomRng::new(2, 1);
        let mut buf = [0xffu8; 8];
        rng.fill_bytes(&mut buf);
        assert_eq!(buf, [0u8; 8]);
        rng.fill_bytes(&mut buf);
        assert_eq!(buf, [0u8; 8]);
        rng.fill_bytes(&mut buf);
        assert_ne!(buf, [0u8; 8]);
    }
}
