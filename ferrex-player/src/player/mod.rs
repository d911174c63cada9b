// Player module - contains all video player functionality

pub mod controls;
pub mod messages;
pub mod state;
pub mod theme;
pub mod track_selection;
pub mod update;
pub mod view;

pub use messages::PlayerMessage;
pub use state::PlayerState;
