//! Cloth composition: layers, colors and techniques
//!
//! A cloth is an ordered sequence of layers. The engine reads layers to derive
//! scores and never mutates them.

pub mod color;
pub mod generate;
pub mod layer;

pub use color::{hue_distance, ColorValue, Rgb};
pub use generate::random_cloth;
pub use layer::{Layer, Technique, Transform};
