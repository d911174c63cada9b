pub mod aggregates;
pub mod value_objects;
pub mod services;
pub mod events;
pub mod repositories;

pub use aggregates::{UserAuthentication, DeviceSession};
pub use value_objects::{SessionToken, DeviceFingerprint, PinCode};
pub use repositories::{UserAuthenticationRepository, DeviceSessionRepository};
pub use services::*;
pub use events::*;