// Authentication domain value objects
// These types represent core authentication concepts that are immutable
// and validated upon creation. They implement Send + Sync for async usage.

mod device_fingerprint;
mod pin_code;
mod session_token;

pub use device_fingerprint::{DeviceFingerprint, DeviceFingerprintError};
pub use pin_code::{PinCode, PinCodeError, PinPolicy};
pub use session_token::{SessionToken, SessionTokenError};
