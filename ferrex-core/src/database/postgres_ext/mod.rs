pub mod folder_inventory;
pub mod processing_status;
pub mod rbac;
pub mod sync_sessions;
pub mod tmdb_metadata;
pub mod users;
pub mod watch_status;

// Re-export the implementations
pub use tmdb_metadata::*;
