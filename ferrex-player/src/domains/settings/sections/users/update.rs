//! Users section update handlers (Admin)

use super::messages::UsersMessage;
use super::state::{UserRole, UserSummary};
use crate::common::messages::DomainUpdateResult;
use crate::state::State;
use uuid::Uuid;

/// Main message handler for users section
pub fn handle_message(
    state: &mut State,
    message: UsersMessage,
) -> DomainUpdateResult {
    match message {
        // User List
        UsersMessage::LoadUsers => handle_load_users(state),
        UsersMessage::UsersLoaded(result) => handle_users_loaded(state, result),
        UsersMessage::SelectUser(id) => handle_select_user(state, id),
        UsersMessage::DeleteUser(id) => handle_delete_user(state, id),
        UsersMessage::DeleteResult(result) => {
            handle_delete_result(state, result)
        }
        UsersMessage::ToggleUserActive(id, active) => {
            handle_toggle_user_active(state, id, active)
        }
        UsersMessage::ToggleActiveResult(result) => {
            handle_toggle_active_result(state, result)
        }

        // User Form
        UsersMessage::ShowAddForm => handle_show_add_form(state),
        UsersMessage::ShowEditForm(id) => handle_show_edit_form(state, id),
        UsersMessage::UpdateFormUsername(v) => {
            handle_update_form_username(state, v)
        }
        UsersMessage::UpdateFormDisplayName(v) => {
            handle_update_form_display_name(state, v)
        }
        UsersMessage::UpdateFormEmail(v) => handle_update_form_email(state, v),
        UsersMessage::UpdateFormPassword(v) => {
            handle_update_form_password(state, v)
        }
        UsersMessage::UpdateFormConfirmPassword(v) => {
            handle_update_form_confirm_password(state, v)
        }
        UsersMessage::UpdateFormRole(role) => {
            handle_update_form_role(state, role)
        }
        UsersMessage::UpdateFormActive(active) => {
            handle_update_form_active(state, active)
        }
        UsersMessage::SubmitForm => handle_submit_form(state),
        UsersMessage::FormResult(result) => handle_form_result(state, result),
        UsersMessage::CancelForm => handle_cancel_form(state),
    }
}

// User List handlers
fn handle_load_users(state: &mut State) -> DomainUpdateResult {
    let _ = state;
    DomainUpdateResult::none()
}

fn handle_users_loaded(
    state: &mut State,
    result: Result<Vec<UserSummary>, String>,
) -> DomainUpdateResult {
    let _ = (state, result);
    DomainUpdateResult::none()
}

fn handle_select_user(state: &mut State, id: Uuid) -> DomainUpdateResult {
    let _ = (state, id);
    DomainUpdateResult::none()
}

fn handle_delete_user(state: &mut State, id: Uuid) -> DomainUpdateResult {
    let _ = (state, id);
    DomainUpdateResult::none()
}

fn handle_delete_result(
    state: &mut State,
    result: Result<Uuid, String>,
) -> DomainUpdateResult {
    let _ = (state, result);
    DomainUpdateResult::none()
}

fn handle_toggle_user_active(
    state: &mut State,
    id: Uuid,
    active: bool,
) -> DomainUpdateResult {
    let _ = (state, id, active);
    DomainUpdateResult::none()
}

fn handle_toggle_active_result(
    state: &mut State,
    result: Result<(Uuid, bool), String>,
) -> DomainUpdateResult {
    let _ = (state, result);
    DomainUpdateResult::none()
}

// User Form handlers
fn handle_show_add_form(state: &mut State) -> DomainUpdateResult {
    let _ = state;
    DomainUpdateResult::none()
}

fn handle_show_edit_form(state: &mut State, id: Uuid) -> DomainUpdateResult {
    let _ = (state, id);
    DomainUpdateResult::none()
}

fn handle_update_form_username(
    state: &mut State,
    v: String,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn handle_update_form_display_name(
    state: &mut State,
    v: String,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn handle_update_form_email(
    state: &mut State,
    v: String,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn handle_update_form_password(
    state: &mut State,
    v: String,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn handle_update_form_confirm_password(
    state: &mut State,
    v: String,
) -> DomainUpdateResult {
    let _ = (state, v);
    DomainUpdateResult::none()
}

fn handle_update_form_role(
    state: &mut State,
    role: UserRole,
) -> DomainUpdateResult {
    let _ = (state, role);
    DomainUpdateResult::none()
}

fn handle_update_form_active(
    state: &mut State,
    active: bool,
) -> DomainUpdateResult {
    let _ = (state, active);
    DomainUpdateResult::none()
}

fn handle_submit_form(state: &mut State) -> DomainUpdateResult {
    let _ = state;
    DomainUpdateResult::none()
}

fn handle_form_result(
    state: &mut State,
    result: Result<Uuid, String>,
) -> DomainUpdateResult {
    let _ = (state, result);
    DomainUpdateResult::none()
}

fn handle_cancel_form(state: &mut State) -> DomainUpdateResult {
    let _ = state;
    DomainUpdateResult::none()
}
