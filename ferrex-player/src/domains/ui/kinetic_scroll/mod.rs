pub mod controller;
pub mod messages;
pub mod update;

// Re-export primary types for convenience
pub use controller::KineticScroller;
pub use messages::{Direction, KineticMessage};
