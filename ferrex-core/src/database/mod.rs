pub mod cache;
pub mod context;
pub mod infrastructure;
pub mod ports;
pub mod postgres;
pub mod postgres_ext;
pub mod traits;

pub use cache::RedisCache;
pub use context::DatabaseContext;
pub use postgres::{PoolStats, PostgresDatabase};
