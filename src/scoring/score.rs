//! Cloth scoring
//!
//! Combines the four dimension sub-scores into a weighted total and grade.

use std::sync::OnceLock;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::config::{config, DimensionWeights, EngineConfig, ScoringConfig};
use crate::craft::layer::Layer;
use crate::scoring::dimensions::{default_scorers, Dimension, DimensionScorer};
use crate::scoring::grade::{Grade, GradeThresholds};

/// Score of one submitted cloth
///
/// Never mutated once computed; re-scoring produces a new result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub color: f32,
    pub pattern: f32,
    pub creativity: f32,
    pub technique: f32,
    /// Weighted total in [0, 100]
    pub total: u8,
    pub grade: Grade,
}

impl ScoreResult {
    pub fn sub_score(&self, dimension: Dimension) -> f32 {
        match dimension {
            Dimension::Color => self.color,
            Dimension::Pattern => self.pattern,
            Dimension::Creativity => self.creativity,
            Dimension::Technique => self.technique,
        }
    }
}

fn weight_of(weights: &DimensionWeights, dimension: Dimension) -> f32 {
    match dimension {
        Dimension::Color => weights.color,
        Dimension::Pattern => weights.pattern,
        Dimension::Creativity => weights.creativity,
        Dimension::Technique => weights.technique,
    }
}

/// Non-finite sub-scores from a misbehaving strategy count as 0
fn bounded(score: f32) -> f32 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Scores cloths with a fixed config and set of dimension strategies
///
/// Holds no mutable state, so one instance can be shared across threads.
pub struct Scorer {
    config: ScoringConfig,
    grades: GradeThresholds,
    strategies: Vec<Box<dyn DimensionScorer>>,
}

impl Scorer {
    pub fn new(config: ScoringConfig, grades: GradeThresholds) -> Self {
        Self {
            config,
            grades,
            strategies: default_scorers(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.scoring.clone(), config.grades)
    }

    /// Replace the strategy for the dimension `strategy` scores
    pub fn with_strategy(mut self, strategy: Box<dyn DimensionScorer>) -> Self {
        let dimension = strategy.dimension();
        self.strategies.retain(|s| s.dimension() != dimension);
        self.strategies.push(strategy);
        self
    }

    pub fn grades(&self) -> &GradeThresholds {
        &self.grades
    }

    fn sub_score(&self, dimension: Dimension, layers: &[Layer]) -> f32 {
        self.strategies
            .iter()
            .find(|s| s.dimension() == dimension)
            .map(|s| bounded(s.score(layers, &self.config)))
            .unwrap_or(0.0)
    }

    /// Score a cloth
    ///
    /// Total for any input, including an empty cloth, which scores 0 and grades C.
    pub fn score(&self, layers: &[Layer]) -> ScoreResult {
        let color = self.sub_score(Dimension::Color, layers);
        let pattern = self.sub_score(Dimension::Pattern, layers);
        let creativity = self.sub_score(Dimension::Creativity, layers);
        let technique = self.sub_score(Dimension::Technique, layers);

        let weights = &self.config.weights;
        let weighted: f32 = [
            (Dimension::Color, color),
            (Dimension::Pattern, pattern),
            (Dimension::Creativity, creativity),
            (Dimension::Technique, technique),
        ]
        .iter()
        .map(|(dimension, score)| weight_of(weights, *dimension) * score)
        .sum();

        let weight_sum = weights.sum();
        let total = if weight_sum > 0.0 {
            (weighted / weight_sum).round().clamp(0.0, 100.0) as u8
        } else {
            0
        };

        ScoreResult {
            color,
            pattern,
            creativity,
            technique,
            total,
            grade: self.grades.grade_for(total),
        }
    }

    /// Score many cloths in parallel, preserving input order
    pub fn score_batch(&self, cloths: &[Vec<Layer>]) -> Vec<ScoreResult> {
        cloths.par_iter().map(|layers| self.score(layers)).collect()
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

static GLOBAL_SCORER: OnceLock<Scorer> = OnceLock::new();

fn global_scorer() -> &'static Scorer {
    GLOBAL_SCORER.get_or_init(|| Scorer::from_config(config()))
}

/// Score a cloth with the global engine config
pub fn score_cloth(layers: &[Layer]) -> ScoreResult {
    global_scorer().score(layers)
}

/// Score many cloths in parallel with the global engine config
pub fn score_batch(cloths: &[Vec<Layer>]) -> Vec<ScoreResult> {
    global_scorer().score_batch(cloths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::craft::color::Rgb;

    struct Fixed(Dimension, f32);

    impl DimensionScorer for Fixed {
        fn dimension(&self) -> Dimension {
            self.0
        }

        fn score(&self, _layers: &[Layer], _config: &ScoringConfig) -> f32 {
            self.1
        }
    }

    fn sample_cloth() -> Vec<Layer> {
        vec![
            Layer::new("dip", Rgb::new(0x1e, 0x3a, 0x8a)).at(0.2, 0.2),
            Layer::new("shibori", Rgb::new(0x3b, 0x82, 0xf6)).at(0.5, 0.5),
            Layer::new("dip", Rgb::new(0xf5, 0x9e, 0x0b)).at(0.8, 0.8),
        ]
    }

    #[test]
    fn test_empty_cloth_is_minimum() {
        let result = Scorer::default().score(&[]);
        assert_eq!(result.total, 0);
        assert_eq!(result.grade, Grade::C);
        for dimension in Dimension::ALL {
            assert_eq!(result.sub_score(dimension), 0.0);
        }
    }

    #[test]
    fn test_sample_cloth_grades_a() {
        let result = Scorer::default().score(&sample_cloth());
        assert_eq!(result.total, 61);
        assert_eq!(result.grade, Grade::A);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let scorer = Scorer::default();
        let cloth = sample_cloth();
        assert_eq!(scorer.score(&cloth), scorer.score(&cloth));
    }

    #[test]
    fn test_custom_strategy_replaces_default() {
        let scorer = Scorer::default()
            .with_strategy(Box::new(Fixed(Dimension::Color, 100.0)))
            .with_strategy(Box::new(Fixed(Dimension::Pattern, 100.0)))
            .with_strategy(Box::new(Fixed(Dimension::Creativity, 100.0)))
            .with_strategy(Box::new(Fixed(Dimension::Technique, 100.0)));

        let result = scorer.score(&[]);
        assert_eq!(result.total, 100);
        assert_eq!(result.grade, Grade::SSS);
    }

    #[test]
    fn test_out_of_range_strategy_is_clamped() {
        let scorer = Scorer::default()
            .with_strategy(Box::new(Fixed(Dimension::Color, 250.0)))
            .with_strategy(Box::new(Fixed(Dimension::Pattern, f32::NAN)))
            .with_strategy(Box::new(Fixed(Dimension::Creativity, -40.0)));

        let result = scorer.score(&[]);
        assert_eq!(result.color, 100.0);
        assert_eq!(result.pattern, 0.0);
        assert_eq!(result.creativity, 0.0);
        // 0.30 * 100 / 1.0
        assert_eq!(result.total, 30);
    }

    #[test]
    fn test_weights_are_normalized() {
        let mut config = ScoringConfig::default();
        config.weights = DimensionWeights {
            color: 2.0,
            pattern: 0.0,
            creativity: 0.0,
            technique: 0.0,
        };
        let scorer = Scorer::new(config, GradeThresholds::default())
            .with_strategy(Box::new(Fixed(Dimension::Color, 80.0)));

        assert_eq!(scorer.score(&[]).total, 80);
    }

    #[test]
    fn test_batch_preserves_order() {
        let scorer = Scorer::default();
        let cloths = vec![sample_cloth(), Vec::new(), sample_cloth()];
        let results = scorer.score_batch(&cloths);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0], scorer.score(&cloths[0]));
        assert_eq!(results[1].total, 0);
        assert_eq!(results[2], results[0]);
    }

    #[test]
    fn test_global_score_cloth_matches_default_scorer() {
        let cloth = sample_cloth();
        assert_eq!(score_cloth(&cloth), Scorer::default().score(&cloth));
    }
}
