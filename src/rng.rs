//! Deterministic random number generation
//!
//! Every batch gets its own ChaCha8 stream derived from (master seed, batch
//! serial), so batch N is reproducible without replaying batches 1..N.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub struct RngManager {
    master_seed: u64,
    current_batch: u64,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master_seed: seed,
            current_batch: 0,
        }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn current_batch(&self) -> u64 {
        self.current_batch
    }

    /// Moves to the next batch and returns its stream.
    pub fn next_batch(&mut self) -> ChaCha8Rng {
        self.current_batch += 1;
        self.batch_rng(self.current_batch)
    }

    pub fn batch_rng(&self, batch: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.derive_seed(batch))
    }

    fn derive_seed(&self, batch: u64) -> u64 {
        let mut seed = self.master_seed;
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed ^= batch.wrapping_mul(69069);
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed
    }
}

impl Default for RngManager {
    fn default() -> Self {
        Self::new(42)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_deterministic_rng() {
        let mut rng1 = RngManager::new(42);
        let mut rng2 = RngManager::new(42);

        let val1: u64 = rng1.next_batch().gen();
        let val2: u64 = rng2.next_batch().gen();

        assert_eq!(val1, val2, "Same seed should produce same values");
    }

    #[test]
    fn test_batch_advance() {
        let mut rng = RngManager::new(42);
        assert_eq!(rng.current_batch(), 0);

        let val1: u64 = rng.next_batch().gen();
        assert_eq!(rng.current_batch(), 1);
        let val2: u64 = rng.next_batch().gen();
        assert_eq!(rng.current_batch(), 2);

        assert_ne!(val1, val2);
    }

    #[test]
    fn test_batch_rng_is_random_access() {
        let mut rng = RngManager::new(7);
        rng.next_batch();
        let mut third = rng.batch_rng(3);
        rng.next_batch();
        let mut replay = rng.next_batch();

        let a: u64 = third.gen();
        let b: u64 = replay.gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a: u64 = RngManager::new(1).batch_rng(1).gen();
        let b: u64 = RngManager::new(2).batch_rng(1).gen();
        assert_ne!(a, b);
    }
}
