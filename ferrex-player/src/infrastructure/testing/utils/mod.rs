//! Testing utilities
//!
//! Provides helpers for building test data, custom assertions, and fixtures.

pub mod builders;
pub mod assertions;
pub mod fixtures;

pub use builders::{Builder, RequiredField};
pub use assertions::{AsyncAssertions, EventuallyExt, StateAssertions};
pub use fixtures::{FixtureGenerator, TestData, Scenario};