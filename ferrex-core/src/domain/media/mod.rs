//! Media-domain boundary.
//!
//! Groups media-centric types and utilities under a cohesive namespace so
//! dependent layers can import via a single entry module instead of scattered
//! root-level exports.

pub mod extras;
pub mod image;
pub mod tv_parser;
