pub mod error;
pub mod library;
pub mod loading;

pub use error::*;
pub use loading::*;
