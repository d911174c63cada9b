//! Ferrex Player Library
//!
//! This module exposes all application components.

// Application modules
pub mod common;
pub mod domains;
pub mod infrastructure;
pub mod state_refactored;
pub mod subscriptions;
pub mod update;
pub mod view;