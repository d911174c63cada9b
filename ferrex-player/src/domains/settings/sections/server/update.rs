//! Server section update handlers (Admin)

use super::messages::ServerMessage;
use super::state::{PasswordPolicy, ServerState};
use crate::common::messages::DomainUpdateResult;
use crate::state::State;

/// Main message handler for server section
pub fn handle_message(
    state: &mut State,
    message: ServerMessage,
) -> DomainUpdateResult {
    match message {
        ServerMessage::LoadSettings => handle_load_settings(state),
        ServerMessage::SettingsLoaded(result) => {
            handle_settings_loaded(state, result)
        }
        ServerMessage::SaveSettings => handle_save_settings(state),
        ServerMessage::SaveResult(result) => handle_save_result(state, result),

        // Session Policies
        ServerMessage::SetSessionAccessTokenLifetime(v) => {
            set_session_access_token_lifetime(state, v)
        }
        ServerMessage::SetSessionRefreshTokenLifetime(v) => {
            set_session_refresh_token_lifetime(state, v)
        }
        ServerMessage::SetSessionMaxConcurrent(v) => {
            set_session_max_concurrent(state, v)
        }

        // Device Policies
        ServerMessage::SetDeviceTrustDuration(v) => {
            set_device_trust_duration(state, v)
        }
        ServerMessage::SetDeviceMaxTrusted(v) => {
            set_device_max_trusted(state, v)
        }
        ServerMessage::SetDeviceRequirePinForNew(v) => {
            set_device_require_pin_for_new(state, v)
        }

        // Password Policies (full)
        ServerMessage::SetAdminPasswordPolicy(p) => {
            set_admin_password_policy(state, p)
        }
        ServerMessage::SetUserPasswordPolicy(p) => {
            set_user_password_policy(state, p)
        }

        // Admin policy fields
        ServerMessage::SetAdminPolicyEnforce(v) => {
            set_admin_policy_enforce(state, v)
        }
        ServerMessage::SetAdminPolicyMinLength(v) => {
            set_admin_policy_min_length(state, v)
        }
        ServerMessage::SetAdminPolicyRequireUppercase(v) => {
            set_admin_policy_require_uppercase(state, v)
        }
        ServerMessage::SetAdminPolicyRequireLowercase(v) => {
            set_admin_policy_require_lowercase(state, v)
        }
        ServerMessage::SetAdminPolicyRequireNumber(v) => {
            set_admin_policy_require_number(state, v)
        }
        ServerMessage::SetAdminPolicyRequireSpecial(v) => {
            set_admin_policy_require_special(state, v)
        }

        // User policy fields
        ServerMessage::SetUserPolicyEnforce(v) => {
            set_user_policy_enforce(state, v)
        }
        ServerMessage::SetUserPolicyMinLength(v) => {
            set_user_policy_min_length(state, v)
        }
        ServerMessage::SetUserPolicyRequireUppercase(v) => {
            set_user_policy_require_uppercase(state, v)
        }
        ServerMessage::SetUserPolicyRequireLowercase(v) => {
            set_user_policy_require_lowercase(state, v)
        }
        ServerMessage::SetUserPolicyRequireNumber(v) => {
            set_user_policy_require_number(state, v)
        }
        ServerMessage::SetUserPolicyRequireSpecial(v) => {
            set_user_policy_require_special(state, v)
        }

        // Curated Content
        ServerMessage::SetCuratedMaxCarouselItems(v) => {
            set_curated_max_carousel_items(state, v)
        }
        ServerMessage::SetCuratedHeadWindow(v) => {
            set_curated_head_window(state, v)
        }
    }
}

// Load/Save handlers
fn handle_load_settings(state: &mut State) -> DomainUpdateResult {
    let _ = state;
    DomainUpdateResult::none()
}

fn handle_settings_loaded(
    state: &mut State,
    result: Result<ServerState, String>,
) -> DomainUpdateResult {
    let _ = (state, result);
    DomainUpdateResult::none()
}

fn handle_save_settings(state: &mut State) -> DomainUpdateResult {
    let _ = state;
    DomainUpdateResult::none()
}

fn handle_save_result(
    state: &mut State,
    result: Result<(), String>,
) -> DomainUpdateResult {
    let _ = (state, result);
    DomainUpdateResult::none()
}

// Session Policy handlers
fn set_session_access_token_lifetime(
    state: &mut State,
    v: u32,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_session_refresh_token_lifetime(
    state: &mut State,
    v: u32,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_session_max_concurrent(
    state: &mut State,
    v: Option<u32>,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

// Device Policy handlers
fn set_device_trust_duration(state: &mut State, v: u32) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_device_max_trusted(
    state: &mut State,
    v: Option<u32>,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_device_require_pin_for_new(
    state: &mut State,
    v: bool,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

// Password Policy handlers
fn set_admin_password_policy(
    state: &mut State,
    p: PasswordPolicy,
) -> DomainUpdateResult {
    let _ = (state, p);
    DomainUpdateResult::none()
}

fn set_user_password_policy(
    state: &mut State,
    p: PasswordPolicy,
) -> DomainUpdateResult {
    let _ = (state, p);
    DomainUpdateResult::none()
}

fn set_admin_policy_enforce(state: &mut State, v: bool) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_admin_policy_min_length(
    state: &mut State,
    v: u16,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_admin_policy_require_uppercase(
    state: &mut State,
    v: bool,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_admin_policy_require_lowercase(
    state: &mut State,
    v: bool,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_admin_policy_require_number(
    state: &mut State,
    v: bool,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_admin_policy_require_special(
    state: &mut State,
    v: bool,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_user_policy_enforce(state: &mut State, v: bool) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_user_policy_min_length(state: &mut State, v: u16) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_user_policy_require_uppercase(
    state: &mut State,
    v: bool,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_user_policy_require_lowercase(
    state: &mut State,
    v: bool,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_user_policy_require_number(
    state: &mut State,
    v: bool,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_user_policy_require_special(
    state: &mut State,
    v: bool,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

// Curated Content handlers
fn set_curated_max_carousel_items(
    state: &mut State,
    v: usize,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn set_curated_head_window(state: &mut State, v: usize) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}
