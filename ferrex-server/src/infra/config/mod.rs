pub mod cli;
mod loader;
mod models;
mod rate_limits;
mod scanner;
mod sources;
mod validation;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader};
pub use models::{
    AuthConfig, CacheConfig, Config, ConfigMetadata, CorsConfig,
    DatabaseConfig, FfmpegConfig, HstsSettings, MediaConfig,
    RateLimiterSettings, RedisConfig, SecurityConfig, ServerConfig,
};
pub use rate_limits::{RateLimitSource, RateLimitSpec};
pub use scanner::{ScannerConfig, ScannerConfigSource};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
