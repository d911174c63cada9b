pub mod auth_event_repository;
pub mod device_session_repository;
pub mod refresh_token_repository;
pub mod session_repository;
pub mod user_authentication_repository;

pub use auth_event_repository::PostgresAuthEventRepository;
pub use device_session_repository::PostgresDeviceSessionRepository;
pub use refresh_token_repository::PostgresRefreshTokenRepository;
pub use session_repository::PostgresAuthSessionRepository;
pub use user_authentication_repository::PostgresUserAuthRepository;
