pub mod admin_handlers;
pub mod admin_user_management;
pub mod auth;
pub mod role_handlers;
pub mod security_settings_handlers;
pub mod session_handlers;
pub mod setup;
pub mod user_handlers;
pub mod user_management;
pub mod user_service;
pub mod watch_status_handlers;

pub use user_management::*;
pub use user_service::{CreateUserParams, UpdateUserParams, UserService};
