//! Random source for generation and simulation; seedable for reproducible runs.

use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

static ENTROPY_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self::seeded(runtime_seed())
    }

    /// Independent stream seeded from this one, for a subsystem that owns its own RNG.
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.inner.next_u64())
    }

    /// Uniform draw in `[0, 1)` with 53 bits of precision.
    pub fn unit(&mut self) -> f64 {
        (self.inner.next_u64() >> 11) as f64 * (1.0 / (1_u64 << 53) as f64)
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.unit() <= probability
    }

    pub fn range(&mut self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.unit() as f32
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.inner.next_u64() % len as u64) as usize
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let picked = self.index(items.len());
        items.get(picked)
    }
}

fn runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(process::id());
    let counter = ENTROPY_COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut value = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_draws_stay_in_half_open_interval() {
        let mut rng = GameRng::seeded(7);
        for _ in 0..10_000 {
            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn same_seed_replays_same_stream() {
        let mut a = GameRng::seeded(99);
        let mut b = GameRng::seeded(99);
        for _ in 0..32 {
            assert_eq!(a.unit().to_bits(), b.unit().to_bits());
        }
    }

    #[test]
    fn chance_of_zero_and_one() {
        let mut rng = GameRng::seeded(3);
        assert!((0..100).all(|_| rng.chance(1.0)));
        assert!((0..100).filter(|_| rng.chance(0.0)).count() <= 1);
    }

    #[test]
    fn choose_handles_empty_slices() {
        let mut rng = GameRng::seeded(1);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[5]), Some(&5));
    }

    #[test]
    fn forks_are_reproducible_from_the_parent_seed() {
        let mut a = GameRng::seeded(5);
        let mut b = GameRng::seeded(5);
        assert_eq!(a.fork().unit().to_bits(), b.fork().unit().to_bits());
    }

    #[test]
    fn entropy_seeds_differ_between_calls() {
        assert_ne!(runtime_seed(), runtime_seed());
    }
}
