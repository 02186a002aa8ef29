//! Xorshift64 stream used to shuffle the permutation tables of the
//! permutation-based primitives.
//!
//! Integer-only, so a given module seed yields the same table on every
//! platform.

/// Xorshift64 with shifts (13, 7, 17).
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Replaces a zero seed, which is a fixed point of xorshift.
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform index in `[0, max)`. `max` must be non-zero.
    pub fn next_usize(&mut self, max: usize) -> usize {
        (self.next_u64() % max as u64) as usize
    }

    /// Fisher-Yates shuffle of `items` in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_usize(i + 1);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // Permutation tables of every seeded primitive derive from this stream.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_stick_at_zero() {
        let mut rng = Xorshift64::new(0);
        for _ in 0..3 {
            assert_ne!(rng.next_u64(), 0);
        }
    }

    #[test]
    fn shuffle_keeps_every_element() {
        let mut rng = Xorshift64::new(99);
        let mut items: Vec<u32> = (0..64).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..64).collect::<Vec<_>>());
        assert_ne!(items, sorted, "64 elements should not shuffle to identity");
    }

    #[test]
    fn shuffle_of_empty_and_single_is_a_no_op() {
        let mut rng = Xorshift64::new(1);
        let mut empty: [u8; 0] = [];
        rng.shuffle(&mut empty);
        let mut one = [7u8];
        rng.shuffle(&mut one);
        assert_eq!(one, [7]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_usize_in_bounds(seed: u64, max in 1_usize..10_000) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_usize(max);
                    prop_assert!(v < max, "next_usize({max}) = {v} for seed {seed}");
                }
            }

            #[test]
            fn same_seed_same_shuffle(seed: u64) {
                let mut a: Vec<u16> = (0..256).collect();
                let mut b = a.clone();
                Xorshift64::new(seed).shuffle(&mut a);
                Xorshift64::new(seed).shuffle(&mut b);
                prop_assert_eq!(a, b);
            }
        }
    }
}
