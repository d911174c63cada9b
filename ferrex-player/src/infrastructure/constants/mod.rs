//! Constants module for centralized configuration values

pub mod layout;

// Re-export commonly used items
pub use layout::{animation, calculations, grid, player_controls, poster, scale_presets, virtual_grid};
