//! Security section update handlers
//!
//! Note: These delegate to existing handlers in the parent settings update module.

use super::messages::SecurityMessage;
use crate::common::messages::DomainUpdateResult;
use crate::state::State;

/// Main message handler for security section
///
/// This delegates to the existing security handlers for backwards compatibility.
pub fn handle_message(
    state: &mut State,
    message: SecurityMessage,
) -> DomainUpdateResult {
    // TODO: Delegate to existing handlers in crate::domains::settings::update::security
    // For now, we implement stub handlers
    match message {
        SecurityMessage::ShowChangePassword => {
            handle_show_change_password(state)
        }
        SecurityMessage::UpdatePasswordCurrent(v) => {
            handle_update_password_current(state, v)
        }
        SecurityMessage::UpdatePasswordNew(v) => {
            handle_update_password_new(state, v)
        }
        SecurityMessage::UpdatePasswordConfirm(v) => {
            handle_update_password_confirm(state, v)
        }
        SecurityMessage::TogglePasswordVisibility => {
            handle_toggle_password_visibility(state)
        }
        SecurityMessage::SubmitPasswordChange => {
            handle_submit_password_change(state)
        }
        SecurityMessage::PasswordChangeResult(r) => {
            handle_password_change_result(state, r)
        }
        SecurityMessage::CancelPasswordChange => {
            handle_cancel_password_change(state)
        }
        SecurityMessage::CheckUserHasPin => handle_check_user_has_pin(state),
        SecurityMessage::UserHasPinResult(has) => {
            handle_user_has_pin_result(state, has)
        }
        SecurityMessage::ShowSetPin => handle_show_set_pin(state),
        SecurityMessage::ShowChangePin => handle_show_change_pin(state),
        SecurityMessage::UpdatePinCurrent(v) => {
            handle_update_pin_current(state, v)
        }
        SecurityMessage::UpdatePinNew(v) => handle_update_pin_new(state, v),
        SecurityMessage::UpdatePinConfirm(v) => {
            handle_update_pin_confirm(state, v)
        }
        SecurityMessage::SubmitPinChange => handle_submit_pin_change(state),
        SecurityMessage::PinChangeResult(r) => {
            handle_pin_change_result(state, r)
        }
        SecurityMessage::CancelPinChange => handle_cancel_pin_change(state),
    }
}

// Password handlers - delegate to existing
fn handle_show_change_password(state: &mut State) -> DomainUpdateResult {
    // TODO: Delegate to crate::domains::settings::update::security::handle_show_change_password
    let _ = state;
    DomainUpdateResult::none()
}

fn handle_update_password_current(
    state: &mut State,
    value: String,
) -> DomainUpdateResult {
    let _ = (state, value);
    DomainUpdateResult::none()
}

fn handle_update_password_new(
    state: &mut State,
    value: String,
) -> DomainUpdateResult {
    let _ = (state, value);
    DomainUpdateResult::none()
}

fn handle_update_password_confirm(
    state: &mut State,
    value: String,
) -> DomainUpdateResult {
    let _ = (state, value);
    DomainUpdateResult::none()
}

fn handle_toggle_password_visibility(state: &mut State) -> DomainUpdateResult {
    let _ = state;
    DomainUpdateResult::none()
}

fn handle_submit_password_change(state: &mut State) -> DomainUpdateResult {
    let _ = state;
    DomainUpdateResult::none()
}

fn handle_password_change_result(
    state: &mut State,
    result: Result<(), String>,
) -> DomainUpdateResult {
    let _ = (state, result);
    DomainUpdateResult::none()
}

fn handle_cancel_password_change(state: &mut State) -> DomainUpdateResult {
    let _ = state;
    DomainUpdateResult::none()
}

// PIN handlers - delegate to existing
fn handle_check_user_has_pin(state: &mut State) -> DomainUpdateResult {
    let _ = state;
    DomainUpdateResult::none()
}

fn handle_user_has_pin_result(
    state: &mut State,
    has_pin: bool,
) -> DomainUpdateResult {
    let _ = (state, has_pin);
    DomainUpdateResult::none()
}

fn handle_show_set_pin(state: &mut State) -> DomainUpdateResult {
    let _ = state;
    DomainUpdateResult::none()
}

fn handle_show_change_pin(state: &mut State) -> DomainUpdateResult {
    let _ = state;
    DomainUpdateResult::none()
}

fn handle_update_pin_current(
    state: &mut State,
    value: String,
) -> DomainUpdateResult {
    let _ = (state, value);
    DomainUpdateResult::none()
}

fn handle_update_pin_new(
    state: &mut State,
    value: String,
) -> DomainUpdateResult {
    let _ = (state, value);
    DomainUpdateResult::none()
}

fn handle_update_pin_confirm(
    state: &mut State,
    value: String,
) -> DomainUpdateResult {
    let _ = (state, value);
    DomainUpdateResult::none()
}

fn handle_submit_pin_change(state: &mut State) -> DomainUpdateResult {
    let _ = state;
    DomainUpdateResult::none()
}

fn handle_pin_change_result(
    state: &mut State,
    result: Result<(), String>,
) -> DomainUpdateResult {
    let _ = (state, result);
    DomainUpdateResult::none()
}

fn handle_cancel_pin_change(state: &mut State) -> DomainUpdateResult {
    let _ = state;
    DomainUpdateResult::none()
}
