//! Testing utilities
//!
//! Provides helpers for building test data, custom assertions, and fixtures.

pub mod assertions;
pub mod builders;
pub mod fixtures;

pub use assertions::{AsyncAssertions, EventuallyExt, StateAssertions};
pub use builders::{Builder, RequiredField};
pub use fixtures::{FixtureGenerator, Scenario, TestData};
