//! Unified media card system using macros for consistent UI components
//!
//! This module provides a macro-based approach to creating media cards for
//! movies, TV shows, seasons, and episodes with consistent styling, animations,
//! and loading states.

// Module organization
pub mod components;
pub mod styles;
pub mod types;
