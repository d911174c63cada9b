//! Metadata update handlers
//!
//! Contains specific update logic for metadata-related messages

pub mod unified_image;

// Re-export update functions
pub use unified_image::*;
