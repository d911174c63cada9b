#[cfg(feature = "rkyv")]
pub mod archive;
pub mod cache;
pub mod media;

#[cfg(feature = "rkyv")]
pub use archive::*;
pub use cache::*;
pub use media::*;
