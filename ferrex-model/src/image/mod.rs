pub mod dimensions;
pub mod fetch;
pub mod metadata;
pub mod query;
pub mod request;
pub mod sizes;

pub use dimensions::*;
pub use fetch::*;
pub use metadata::*;
pub use query::*;
pub use request::*;
pub use sizes::*;
