//! Layers placed on the dye canvas

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::craft::color::ColorValue;

/// Dyeing technique applied by a layer
///
/// Names are case-insensitive; anything outside the built-in set is a custom
/// technique and still scores.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Technique(String);

impl Technique {
    pub const DIP: &'static str = "dip";
    pub const OMBRE: &'static str = "ombre";
    pub const STENCIL: &'static str = "stencil";
    pub const TIE_DYE: &'static str = "tie-dye";
    pub const MARBLING: &'static str = "marbling";
    pub const SHIBORI: &'static str = "shibori";
    pub const BATIK: &'static str = "batik";
    pub const IKAT: &'static str = "ikat";

    /// Built-in techniques, simplest first
    pub const BUILT_IN: [&'static str; 8] = [
        Self::DIP,
        Self::OMBRE,
        Self::STENCIL,
        Self::TIE_DYE,
        Self::MARBLING,
        Self::SHIBORI,
        Self::BATIK,
        Self::IKAT,
    ];

    pub fn new(name: &str) -> Self {
        Self(name.trim().to_ascii_lowercase())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_built_in(&self) -> bool {
        Self::BUILT_IN.contains(&self.0.as_str())
    }
}

impl From<String> for Technique {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl From<&str> for Technique {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<Technique> for String {
    fn from(technique: Technique) -> Self {
        technique.0
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Placement of a layer on the canvas
///
/// `x` and `y` are normalized canvas coordinates in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// Degrees
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl Transform {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }
}

/// One visual element of a cloth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub technique: Technique,
    pub color: ColorValue,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub z_index: u32,
}

impl Layer {
    pub fn new(technique: impl Into<Technique>, color: impl Into<ColorValue>) -> Self {
        Self {
            technique: technique.into(),
            color: color.into(),
            transform: Transform::default(),
            z_index: 0,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.transform.x = x;
        self.transform.y = y;
        self
    }

    pub fn with_z_index(mut self, z_index: u32) -> Self {
        self.z_index = z_index;
        self
    }
}
