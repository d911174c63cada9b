//! Intentional query crate surface consumed by UI/search clients.

pub use super::builder::MediaQueryBuilder;
pub use super::filtering::hash_filter_spec;
pub use super::sorting::compare_media;
pub use super::types::{
    MediaFilters, MediaQuery, MediaTypeFilter, MediaWithStatus, Pagination,
    QueryEndpoint, QueryError, QueryResult, SearchField, SearchQuery, SortBy,
    SortCriteria, SortOrder,
};
