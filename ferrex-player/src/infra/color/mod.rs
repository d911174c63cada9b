//! Color utilities for perceptually uniform color handling
//!
//! This module provides HSLuv color space support and color harmony algorithms
//! for generating aesthetically pleasing color palettes.

pub mod harmony;
pub mod hsluv;

pub use harmony::{ColorPoint, HarmonyMode};
pub use hsluv::HsluvColor;
