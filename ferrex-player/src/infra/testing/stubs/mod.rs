pub mod api;
pub mod auth;
pub mod settings;

pub use api::TestApiService;
pub use auth::StubAuthService;
pub use settings::TestSettingsService;
