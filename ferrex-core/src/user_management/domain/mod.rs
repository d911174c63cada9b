pub mod aggregates;
pub mod value_objects;
pub mod repositories;

pub use aggregates::*;
pub use value_objects::*;
pub use repositories::*;