//! Dye colors
//!
//! A layer's color is either a literal RGB value or a reference to a named dye
//! from the configured palette. Accepted spellings:
//!
//! - `#rrggbb` and `#rgb`
//! - `rgb(r, g, b)` with decimal channels
//! - `palette:<name>`

use std::fmt;
use std::str::FromStr;

use ahash::AHashMap;
use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_while1, take_while_m_n};
use nom::character::complete::{char, multispace0, u8 as decimal_u8};
use nom::combinator::{all_consuming, map, map_res};
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};

use crate::core::error::{DyeError, Result};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hue angle in degrees [0, 360), or None for greys where hue is undefined
    pub fn hue(&self) -> Option<f32> {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        if delta < 1e-6 {
            return None;
        }

        let sector = if max == r {
            ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        Some((sector * 60.0).rem_euclid(360.0))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = DyeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.parse::<ColorValue>()? {
            ColorValue::Rgb(rgb) => Ok(rgb),
            ColorValue::Palette(_) => Err(DyeError::InvalidColor(format!(
                "{} is a palette reference, expected a literal color",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = DyeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

/// Color carried by a layer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColorValue {
    Rgb(Rgb),
    /// Lowercased palette name
    Palette(String),
}

impl ColorValue {
    pub fn palette(name: &str) -> Self {
        Self::Palette(name.to_ascii_lowercase())
    }

    /// Resolve to a concrete color; unknown palette names resolve to None
    pub fn resolve(&self, palette: &AHashMap<String, Rgb>) -> Option<Rgb> {
        match self {
            Self::Rgb(rgb) => Some(*rgb),
            Self::Palette(name) => palette.get(name).copied(),
        }
    }
}

impl From<Rgb> for ColorValue {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(rgb) => rgb.fmt(f),
            Self::Palette(name) => write!(f, "palette:{}", name),
        }
    }
}

impl FromStr for ColorValue {
    type Err = DyeError;

    fn from_str(s: &str) -> Result<Self> {
        all_consuming(color_value)
            .parse(s.trim())
            .map(|(_, value)| value)
            .map_err(|_| DyeError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for ColorValue {
    type Error = DyeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ColorValue> for String {
    fn from(value: ColorValue) -> Self {
        value.to_string()
    }
}

/// Shortest angular distance between two hues, in degrees [0, 180]
pub fn hue_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs().rem_euclid(360.0);
    d.min(360.0 - d)
}

// === PARSERS ===

fn color_value(input: &str) -> IResult<&str, ColorValue> {
    alt((
        map(hex_color, ColorValue::Rgb),
        map(rgb_function, ColorValue::Rgb),
        map(palette_reference, ColorValue::palette),
    ))
    .parse(input)
}

fn hex_color(input: &str) -> IResult<&str, Rgb> {
    preceded(char('#'), alt((all_consuming(long_hex), all_consuming(short_hex)))).parse(input)
}

fn long_hex(input: &str) -> IResult<&str, Rgb> {
    map((hex_byte, hex_byte, hex_byte), |(r, g, b)| Rgb::new(r, g, b)).parse(input)
}

fn short_hex(input: &str) -> IResult<&str, Rgb> {
    map((hex_nibble, hex_nibble, hex_nibble), |(r, g, b)| Rgb::new(r, g, b)).parse(input)
}

fn hex_byte(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |digits: &str| u8::from_str_radix(digits, 16),
    )
    .parse(input)
}

// `#abc` expands to `#aabbcc`
fn hex_nibble(input: &str) -> IResult<&str, u8> {
    map_res(
        take_while_m_n(1, 1, |c: char| c.is_ascii_hexdigit()),
        |digit: &str| u8::from_str_radix(digit, 16).map(|v| v * 17),
    )
    .parse(input)
}

fn rgb_function(input: &str) -> IResult<&str, Rgb> {
    map(
        delimited(
            tag_no_case("rgb("),
            (channel, char(','), channel, char(','), channel),
            char(')'),
        ),
        |(r, _, g, _, b)| Rgb::new(r, g, b),
    )
    .parse(input)
}

fn channel(input: &str) -> IResult<&str, u8> {
    delimited(multispace0, decimal_u8, multispace0).parse(input)
}

fn palette_reference(input: &str) -> IResult<&str, &str> {
    preceded(
        tag_no_case("palette:"),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
    )
    .parse(input)
}
