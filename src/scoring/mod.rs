//! Cloth scoring
//!
//! A submitted cloth is judged on four dimensions (color, pattern, creativity,
//! technique). Each sub-score lies in [0, 100]; the weighted total maps to a
//! letter grade through contiguous thresholds.

pub mod dimensions;
pub mod grade;
pub mod score;

pub use dimensions::{
    default_scorers, ColorHarmony, CompositionEntropy, Dimension, DimensionScorer, PatternVariety,
    TechniqueComplexity,
};
pub use grade::{Grade, GradeThresholds};
pub use score::{score_batch, score_cloth, ScoreResult, Scorer};
