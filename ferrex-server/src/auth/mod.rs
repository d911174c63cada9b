pub mod device_simple;
pub mod device_handlers;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod permission_middleware;
pub mod pin_handlers;
pub mod user_preferences;

pub use jwt::{generate_access_token, generate_refresh_token, validate_token, validate_token_sync};
pub use middleware::{auth_middleware, optional_auth_middleware, admin_middleware};
pub use permission_middleware::{require_permission, require_any_permission, require_permission_async, permission_layer};