use rand::SeedableRng;
use rand::rngs::StdRng;

/// Create a deterministic StdRng from a u64 seed.
/// This is the ONLY way to create an RNG in the scene.
/// Grass blades and anything else random draw from scene.rng.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngExt;

    #[test]
    fn same_seed_produces_same_sequence() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(42);

        let seq1: Vec<f32> = (0..10).map(|_| rng1.random_range(0.4..1.0)).collect();
        let seq2: Vec<f32> = (0..10).map(|_| rng2.random_range(0.4..1.0)).collect();

        assert_eq!(seq1, seq2);
    }

    #[test]
    fn different_seeds_produce_different_sequences() {
        let mut rng1 = create_rng(42);
        let mut rng2 = create_rng(99);

        let val1: u64 = rng1.random();
        let val2: u64 = rng2.random();

        assert_ne!(val1, val2);
    }
}
