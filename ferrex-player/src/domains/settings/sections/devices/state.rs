//! Devices section state
//!
//! Re-exports existing DeviceManagementState for compatibility.

// Re-export existing types
pub use crate::domains::ui::views::settings::device_management::{
    DeviceManagementState as DevicesState, UserDevice,
};
