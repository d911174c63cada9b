pub mod builder;
pub mod complexity_guard;
pub mod decision_engine;
pub mod filtering;
pub mod prelude;
pub mod sorting;
pub mod types;

pub use builder::MediaQueryBuilder;
pub use complexity_guard::{ComplexityConfig, QueryComplexityGuard};
