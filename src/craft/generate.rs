//! Random cloth generation
//!
//! Used by the CLI simulation, the grade distribution tool and the benchmarks
//! to produce plausible player submissions. Seed a `ChaCha8Rng` for repeatable runs.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::config::ScoringConfig;
use crate::craft::color::{ColorValue, Rgb};
use crate::craft::layer::{Layer, Technique, Transform};

/// Chance that a generated layer references a palette dye instead of a literal color
const PALETTE_CHANCE: f64 = 0.35;

/// Generate a cloth with between 1 and `max_layers` layers
pub fn random_cloth<R: Rng>(
    rng: &mut R,
    scoring: &ScoringConfig,
    max_layers: usize,
) -> Vec<Layer> {
    let count = rng.gen_range(1..=max_layers.max(1));

    // Sorted so the same seed picks the same dyes regardless of map iteration order
    let mut palette_names: Vec<&str> = scoring.palette.keys().map(String::as_str).collect();
    palette_names.sort_unstable();

    (0..count)
        .map(|z| {
            let technique = Technique::BUILT_IN
                .choose(rng)
                .copied()
                .unwrap_or(Technique::DIP);

            let color = match palette_names.choose(rng) {
                Some(name) if rng.gen_bool(PALETTE_CHANCE) => ColorValue::palette(name),
                _ => ColorValue::Rgb(Rgb::new(rng.gen(), rng.gen(), rng.gen())),
            };

            let transform = Transform {
                x: rng.gen_range(0.0..=1.0),
                y: rng.gen_range(0.0..=1.0),
                scale: rng.gen_range(0.25..=2.0),
                rotation: rng.gen_range(0.0..360.0),
            };

            Layer::new(technique, color)
                .with_transform(transform)
                .with_z_index(z as u32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_same_seed_same_cloth() {
        let config = ScoringConfig::default();
        let a = random_cloth(&mut ChaCha8Rng::seed_from_u64(42), &config, 6);
        let b = random_cloth(&mut ChaCha8Rng::seed_from_u64(42), &config, 6);
        assert_eq!(a, b);
    }

    #[test]
    fn test_layer_count_bounded() {
        let config = ScoringConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let cloth = random_cloth(&mut rng, &config, 4);
            assert!((1..=4).contains(&cloth.len()));
            for (z, layer) in cloth.iter().enumerate() {
                assert_eq!(layer.z_index, z as u32);
                assert!(layer.technique.is_built_in());
            }
        }
    }

    #[test]
    fn test_zero_max_layers_still_yields_one() {
        let config = ScoringConfig::default();
        let cloth = random_cloth(&mut ChaCha8Rng::seed_from_u64(1), &config, 0);
        assert_eq!(cloth.len(), 1);
    }
}
