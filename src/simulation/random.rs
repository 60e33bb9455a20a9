use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// The acceleration models consume noise from a generator the caller passes
/// in, so reproducibility is entirely a question of how these generators are
/// seeded. This derives one generator per vehicle from a single base seed:
/// the same base seed and vehicle id always yield the same noise stream, and
/// different vehicles get streams that are independent for all practical
/// purposes.
pub fn vehicle_rng<H: Hash>(base_seed: u64, vehicle: H) -> SmallRng {
    let mut hasher = DefaultHasher::new();
    vehicle.hash(&mut hasher);
    base_seed.hash(&mut hasher);
    SmallRng::seed_from_u64(hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_vehicle_same_stream() {
        let mut rng1 = vehicle_rng(42, "veh_1");
        let mut rng2 = vehicle_rng(42, "veh_1");

        for _ in 0..10 {
            assert_eq!(rng1.random::<u32>(), rng2.random::<u32>());
        }
    }

    #[test]
    fn different_vehicles_different_streams() {
        let mut rng1 = vehicle_rng(42, "veh_1");
        let mut rng2 = vehicle_rng(42, "veh_2");

        assert_ne!(rng1.random::<f64>(), rng2.random::<f64>());
    }

    #[test]
    fn different_base_seeds_different_streams() {
        let mut rng1 = vehicle_rng(42, "veh_1");
        let mut rng2 = vehicle_rng(43, "veh_1");

        assert_ne!(rng1.random::<f64>(), rng2.random::<f64>());
    }
}
