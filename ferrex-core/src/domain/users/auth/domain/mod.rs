pub mod aggregates;
pub mod events;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use aggregates::{DeviceSession, UserAuthentication};
pub use events::*;
pub use repositories::{DeviceSessionRepository, UserAuthenticationRepository};
pub use services::*;
pub use value_objects::{DeviceFingerprint, PinCode, SessionToken};
