//! Per-dimension scoring strategies
//!
//! Each dimension of a cloth's score is produced by a `DimensionScorer`. The
//! built-in strategies below reproduce the live balance; a `Scorer` can be
//! assembled with custom ones. Every strategy must be a pure function of the
//! layer sequence and config, bounded to [0, 100], and return 0 for an empty
//! cloth.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::core::config::ScoringConfig;
use crate::craft::color::{hue_distance, Rgb};
use crate::craft::layer::Layer;

/// Analogous colors sit within this many degrees of each other
const ANALOGOUS_SPAN: f32 = 30.0;

/// Triadic colors sit 120 degrees apart, give or take this tolerance
const TRIADIC_TOLERANCE: f32 = 15.0;

/// Complementary colors sit 180 degrees apart, give or take this tolerance
const COMPLEMENTARY_TOLERANCE: f32 = 20.0;

/// Mean distance from the centroid that counts as a fully spread arrangement
const FULL_SPREAD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Color,
    Pattern,
    Creativity,
    Technique,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Color,
        Dimension::Pattern,
        Dimension::Creativity,
        Dimension::Technique,
    ];
}

/// Strategy computing one dimension's sub-score
pub trait DimensionScorer: Send + Sync {
    fn dimension(&self) -> Dimension;

    /// Sub-score in [0, 100]
    fn score(&self, layers: &[Layer], config: &ScoringConfig) -> f32;
}

/// Ratio of `value` to `target`, saturating at 1.0
fn saturation(value: usize, target: u32) -> f32 {
    (value as f32 / target.max(1) as f32).min(1.0)
}

fn is_harmonious(a: f32, b: f32) -> bool {
    let d = hue_distance(a, b);
    d <= ANALOGOUS_SPAN
        || (d - 120.0).abs() <= TRIADIC_TOLERANCE
        || (d - 180.0).abs() <= COMPLEMENTARY_TOLERANCE
}

/// Palette diversity (60 points) and hue harmony (40 points)
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorHarmony;

impl ColorHarmony {
    /// Share of hued color pairs in a harmonious relationship
    ///
    /// Neutrals have no hue and go with anything; a cloth whose colors are all
    /// unknown palette references has nothing to judge and scores 0.
    fn harmony(resolved: &AHashSet<Rgb>) -> f32 {
        if resolved.is_empty() {
            return 0.0;
        }

        let hues: Vec<f32> = resolved.iter().filter_map(Rgb::hue).collect();

        let mut pairs = 0u32;
        let mut harmonious = 0u32;
        for (i, a) in hues.iter().enumerate() {
            for b in &hues[i + 1..] {
                pairs += 1;
                if is_harmonious(*a, *b) {
                    harmonious += 1;
                }
            }
        }

        if pairs == 0 {
            1.0
        } else {
            harmonious as f32 / pairs as f32
        }
    }
}

impl DimensionScorer for ColorHarmony {
    fn dimension(&self) -> Dimension {
        Dimension::Color
    }

    fn score(&self, layers: &[Layer], config: &ScoringConfig) -> f32 {
        if layers.is_empty() {
            return 0.0;
        }

        let mut resolved = AHashSet::new();
        let mut unresolved = AHashSet::new();
        for layer in layers {
            match layer.color.resolve(&config.palette) {
                Some(rgb) => {
                    resolved.insert(rgb);
                }
                None => {
                    unresolved.insert(&layer.color);
                }
            }
        }

        let diversity = saturation(resolved.len() + unresolved.len(), config.color_diversity_target);
        diversity * 60.0 + Self::harmony(&resolved) * 40.0
    }
}

/// Technique variety (70 points) and spatial spread of layers (30 points)
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternVariety;

impl PatternVariety {
    fn spread(layers: &[Layer]) -> f32 {
        if layers.len() < 2 {
            return 0.0;
        }

        let n = layers.len() as f32;
        let cx = layers.iter().map(|l| l.transform.x).sum::<f32>() / n;
        let cy = layers.iter().map(|l| l.transform.y).sum::<f32>() / n;

        let mean_distance = layers
            .iter()
            .map(|l| {
                let dx = l.transform.x - cx;
                let dy = l.transform.y - cy;
                (dx * dx + dy * dy).sqrt()
            })
            .sum::<f32>()
            / n;

        (mean_distance / FULL_SPREAD).clamp(0.0, 1.0)
    }
}

impl DimensionScorer for PatternVariety {
    fn dimension(&self) -> Dimension {
        Dimension::Pattern
    }

    fn score(&self, layers: &[Layer], config: &ScoringConfig) -> f32 {
        if layers.is_empty() {
            return 0.0;
        }

        let techniques: AHashSet<_> = layers.iter().map(|l| &l.technique).collect();
        let variety = saturation(techniques.len(), config.technique_variety_target);
        variety * 70.0 + Self::spread(layers) * 30.0
    }
}

/// Entropy of technique/color combinations (70 points) and composition size (30 points)
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositionEntropy;

impl CompositionEntropy {
    /// Shannon entropy of combination frequencies, normalized to [0, 1]
    fn normalized_entropy(layers: &[Layer]) -> f32 {
        if layers.len() < 2 {
            return 0.0;
        }

        let mut combos: AHashMap<_, usize> = AHashMap::new();
        for layer in layers {
            *combos.entry((&layer.technique, &layer.color)).or_insert(0) += 1;
        }

        // Fixed summation order keeps the result bit-identical across runs
        let mut counts: Vec<usize> = combos.into_iter().map(|(_, count)| count).collect();
        counts.sort_unstable();

        let n = layers.len() as f32;
        let entropy: f32 = counts
            .iter()
            .map(|&count| {
                let p = count as f32 / n;
                -p * p.log2()
            })
            .sum();

        (entropy / n.log2()).clamp(0.0, 1.0)
    }
}

impl DimensionScorer for CompositionEntropy {
    fn dimension(&self) -> Dimension {
        Dimension::Creativity
    }

    fn score(&self, layers: &[Layer], config: &ScoringConfig) -> f32 {
        if layers.is_empty() {
            return 0.0;
        }

        let size = saturation(layers.len(), config.layer_count_target);
        Self::normalized_entropy(layers) * 70.0 + size * 30.0
    }
}

/// Summed complexity of distinct techniques (80 points) and layer count (20 points)
#[derive(Debug, Clone, Copy, Default)]
pub struct TechniqueComplexity;

impl DimensionScorer for TechniqueComplexity {
    fn dimension(&self) -> Dimension {
        Dimension::Technique
    }

    fn score(&self, layers: &[Layer], config: &ScoringConfig) -> f32 {
        if layers.is_empty() {
            return 0.0;
        }

        let techniques: AHashSet<_> = layers.iter().map(|l| l.technique.name()).collect();
        let complexity: u32 = techniques.iter().map(|t| config.complexity_of(t)).sum();

        let depth = saturation(complexity as usize, config.complexity_target);
        let count = saturation(layers.len(), (config.layer_count_target / 2).max(1));
        depth * 80.0 + count * 20.0
    }
}

/// The built-in strategy for each dimension
pub fn default_scorers() -> Vec<Box<dyn DimensionScorer>> {
    vec![
        Box::new(ColorHarmony),
        Box::new(PatternVariety),
        Box::new(CompositionEntropy),
        Box::new(TechniqueComplexity),
    ]
}
