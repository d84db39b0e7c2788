//! Engine configuration with documented constants
//!
//! Every tunable number of the scoring, progression and retention systems lives
//! here. The defaults reproduce the live game's balance; a TOML file (see
//! `data/engine.toml`) can override any section.

use std::fs;
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{DyeError, Result};
use crate::craft::color::Rgb;
use crate::progression::level::LevelCurve;
use crate::progression::reward::RewardTable;
use crate::scoring::grade::GradeThresholds;

/// Relative weight of each scoring dimension in the total score
///
/// Weights are normalised by their sum, so they do not have to add up to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionWeights {
    pub color: f32,
    pub pattern: f32,
    pub creativity: f32,
    pub technique: f32,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            color: 0.30,
            pattern: 0.25,
            creativity: 0.20,
            technique: 0.25,
        }
    }
}

impl DimensionWeights {
    pub fn sum(&self) -> f32 {
        self.color + self.pattern + self.creativity + self.technique
    }
}

/// Configuration for the default dimension scorers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: DimensionWeights,

    /// Distinct colors at which color diversity saturates
    pub color_diversity_target: u32,

    /// Distinct techniques at which pattern variety saturates
    pub technique_variety_target: u32,

    /// Layer count at which composition size saturates
    ///
    /// The technique dimension saturates its layer-count term at half of this.
    pub layer_count_target: u32,

    /// Summed technique complexity at which the technique dimension saturates
    pub complexity_target: u32,

    /// Complexity rating per technique name (lowercase)
    ///
    /// Techniques missing from the table rate `default_complexity`.
    pub technique_complexity: AHashMap<String, u32>,

    pub default_complexity: u32,

    /// Named dye colors that layers may reference as `palette:<name>`
    pub palette: AHashMap<String, Rgb>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let technique_complexity = [
            ("dip", 1),
            ("ombre", 2),
            ("stencil", 2),
            ("tie-dye", 3),
            ("marbling", 3),
            ("shibori", 4),
            ("batik", 4),
            ("ikat", 5),
        ]
        .into_iter()
        .map(|(name, rating)| (name.to_string(), rating))
        .collect();

        let palette = [
            ("indigo", Rgb::new(0x4b, 0x00, 0x82)),
            ("woad", Rgb::new(0x1f, 0x4e, 0x79)),
            ("madder", Rgb::new(0xb7, 0x41, 0x0e)),
            ("cochineal", Rgb::new(0x9b, 0x1b, 0x30)),
            ("weld", Rgb::new(0xe3, 0xc1, 0x6f)),
            ("walnut", Rgb::new(0x5c, 0x40, 0x33)),
        ]
        .into_iter()
        .map(|(name, rgb)| (name.to_string(), rgb))
        .collect();

        Self {
            weights: DimensionWeights::default(),
            color_diversity_target: 5,
            technique_variety_target: 4,
            layer_count_target: 8,
            complexity_target: 20,
            technique_complexity,
            default_complexity: 1,
            palette,
        }
    }
}

impl ScoringConfig {
    /// Complexity rating of a technique, falling back to the default for custom ones
    pub fn complexity_of(&self, technique: &str) -> u32 {
        self.technique_complexity
            .get(technique)
            .copied()
            .unwrap_or(self.default_complexity)
    }

    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        if [w.color, w.pattern, w.creativity, w.technique]
            .iter()
            .any(|weight| !weight.is_finite() || *weight < 0.0)
        {
            return Err(DyeError::InvalidConfig(
                "dimension weights must be finite and non-negative".into(),
            ));
        }
        if w.sum() <= 0.0 {
            return Err(DyeError::InvalidConfig(
                "at least one dimension weight must be positive".into(),
            ));
        }

        let targets = [
            ("color_diversity_target", self.color_diversity_target),
            ("technique_variety_target", self.technique_variety_target),
            ("layer_count_target", self.layer_count_target),
            ("complexity_target", self.complexity_target),
        ];
        for (name, value) in targets {
            if value == 0 {
                return Err(DyeError::InvalidConfig(format!("{} must be positive", name)));
            }
        }

        Ok(())
    }
}

/// Recent-creations window settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Maximum creations an owner keeps tagged "recent"
    pub recent_cap: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self { recent_cap: 5 }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub grades: GradeThresholds,
    pub level_curve: LevelCurve,
    pub rewards: RewardTable,
    pub retention: RetentionConfig,
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    ///
    /// Sections and fields left out keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        self.grades.validate()?;
        self.level_curve.validate()?;
        self.rewards.validate()?;

        if self.retention.recent_cap == 0 {
            return Err(DyeError::InvalidConfig("recent_cap must be at least 1".into()));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Get the global engine config (initializes with defaults if not set)
pub fn config() -> &'static EngineConfig {
    CONFIG.get_or_init(EngineConfig::default)
}

/// Set the global engine config (can only be called once)
///
/// Returns Err with the rejected config if one was already set.
pub fn set_config(config: EngineConfig) -> std::result::Result<(), EngineConfig> {
    CONFIG.set(config)
}
