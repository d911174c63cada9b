pub mod tmdb_api_provider;
pub mod tmdb_discover;

pub use tmdb_api_provider::{ProviderError, TmdbApiProvider};
pub use tmdb_discover::{DiscoverMovieItem, DiscoverPage, DiscoverTvItem};
