pub mod tmdb;
pub mod traits;

pub use traits::{MetadataProvider, ProviderError};
pub use tmdb::TmdbProvider;