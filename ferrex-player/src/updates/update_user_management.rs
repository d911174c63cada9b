use ferrex_core::{user::User, rbac::UserPermissions};
use iced::Task;
use log::{debug, error, info};
use uuid::Uuid;

use crate::{
    messages::{user_management, DomainMessage, CrossDomainEvent},
    state::State,
};

/// Handle user management domain messages
pub fn update_user_management(
    state: &mut State,
    message: user_management::Message,
) -> Task<DomainMessage> {
    debug!("User management update: {}", message.name());
    
    match message {
        // User CRUD operations
        user_management::Message::LoadUsers => {
            info!("Loading users from server");
            // TODO: Implement actual API call to load users
            Task::none()
        }
        
        user_management::Message::UsersLoaded(result) => {
            match result {
                Ok(users) => {
                    info!("Successfully loaded {} users", users.len());
                    // TODO: Update state with loaded users
                    Task::none()
                }
                Err(error) => {
                    error!("Failed to load users: {}", error);
                    // TODO: Handle error state
                    Task::none()
                }
            }
        }
        
        // User selection
        user_management::Message::SelectUser(user_id) => {
            info!("Selecting user: {}", user_id);
            // TODO: Implement user selection logic
            Task::none()
        }
        
        user_management::Message::UserSelected(user) => {
            info!("User selected: {} ({})", user.display_name, user.username);
            // TODO: Update state with selected user
            // Emit cross-domain event
            Task::done(DomainMessage::Event(CrossDomainEvent::UserAuthenticated(
                user.clone(), 
                UserPermissions {
                    user_id: user.id,
                    roles: Vec::new(),
                    permissions: std::collections::HashMap::new(),
                    permission_details: None,
                } // TODO: Load actual permissions
            )))
        }
        
        // User creation
        user_management::Message::CreateUser => {
            info!("Starting user creation flow");
            // TODO: Initialize user creation form state
            Task::none()
        }
        
        user_management::Message::CreateUserFormUpdateUsername(username) => {
            debug!("Updating create user form username");
            // TODO: Update form state
            Task::none()
        }
        
        user_management::Message::CreateUserFormUpdateDisplayName(display_name) => {
            debug!("Updating create user form display name");
            // TODO: Update form state
            Task::none()
        }
        
        user_management::Message::CreateUserFormUpdatePassword(_password) => {
            debug!("Updating create user form password");
            // TODO: Update form state (password will be SecureCredential)
            Task::none()
        }
        
        user_management::Message::CreateUserFormUpdateConfirmPassword(_confirm_password) => {
            debug!("Updating create user form confirm password");
            // TODO: Update form state (password will be SecureCredential)
            Task::none()
        }
        
        user_management::Message::CreateUserFormTogglePasswordVisibility => {
            debug!("Toggling create user form password visibility");
            // TODO: Toggle password visibility state
            Task::none()
        }
        
        user_management::Message::CreateUserFormSubmit => {
            info!("Submitting create user form");
            // TODO: Validate form and submit to API
            Task::none()
        }
        
        user_management::Message::CreateUserSuccess(user) => {
            info!("User created successfully: {} ({})", user.display_name, user.username);
            // TODO: Update state and emit event
            Task::done(DomainMessage::Event(CrossDomainEvent::LibraryUpdated)) // TODO: Create proper UserCreated event
        }
        
        user_management::Message::CreateUserError(error) => {
            error!("Failed to create user: {}", error);
            // TODO: Handle error state
            Task::none()
        }
        
        user_management::Message::CreateUserCancel => {
            info!("User creation cancelled");
            // TODO: Reset form state
            Task::none()
        }
        
        // User updates
        user_management::Message::UpdateUser(user_id) => {
            info!("Starting user update flow for: {}", user_id);
            // TODO: Load user data and initialize update form
            Task::none()
        }
        
        user_management::Message::UpdateUserFormUpdateUsername(username) => {
            debug!("Updating user update form username");
            // TODO: Update form state
            Task::none()
        }
        
        user_management::Message::UpdateUserFormUpdateDisplayName(display_name) => {
            debug!("Updating user update form display name");
            // TODO: Update form state
            Task::none()
        }
        
        user_management::Message::UpdateUserFormUpdatePassword(_password) => {
            debug!("Updating user update form password");
            // TODO: Update form state (password will be SecureCredential)
            Task::none()
        }
        
        user_management::Message::UpdateUserFormUpdateConfirmPassword(_confirm_password) => {
            debug!("Updating user update form confirm password");
            // TODO: Update form state (password will be SecureCredential)
            Task::none()
        }
        
        user_management::Message::UpdateUserFormTogglePasswordVisibility => {
            debug!("Toggling user update form password visibility");
            // TODO: Toggle password visibility state
            Task::none()
        }
        
        user_management::Message::UpdateUserFormSubmit => {
            info!("Submitting user update form");
            // TODO: Validate form and submit to API
            Task::none()
        }
        
        user_management::Message::UpdateUserSuccess(user) => {
            info!("User updated successfully: {} ({})", user.display_name, user.username);
            // TODO: Update state and emit event
            Task::done(DomainMessage::Event(CrossDomainEvent::LibraryUpdated)) // TODO: Create proper UserUpdated event
        }
        
        user_management::Message::UpdateUserError(error) => {
            error!("Failed to update user: {}", error);
            // TODO: Handle error state
            Task::none()
        }
        
        user_management::Message::UpdateUserCancel => {
            info!("User update cancelled");
            // TODO: Reset form state
            Task::none()
        }
        
        // User deletion
        user_management::Message::DeleteUser(user_id) => {
            info!("Requesting user deletion confirmation for: {}", user_id);
            // TODO: Show confirmation dialog
            Task::none()
        }
        
        user_management::Message::DeleteUserConfirm(user_id) => {
            info!("Deleting user: {}", user_id);
            // TODO: Submit deletion request to API
            Task::none()
        }
        
        user_management::Message::DeleteUserSuccess(user_id) => {
            info!("User deleted successfully: {}", user_id);
            // TODO: Update state and emit event
            Task::done(DomainMessage::Event(CrossDomainEvent::LibraryUpdated)) // TODO: Create proper UserDeleted event
        }
        
        user_management::Message::DeleteUserError(error) => {
            error!("Failed to delete user: {}", error);
            // TODO: Handle error state
            Task::none()
        }
        
        user_management::Message::DeleteUserCancel => {
            info!("User deletion cancelled");
            // TODO: Close confirmation dialog
            Task::none()
        }
        
        // First-run user creation (moved from auth)
        user_management::Message::FirstRunCreateUser => {
            info!("Starting first-run user creation");
            // TODO: Initialize first-run user creation state
            Task::none()
        }
        
        user_management::Message::FirstRunUpdateUsername(username) => {
            debug!("Updating first-run username");
            // TODO: Update first-run form state
            Task::none()
        }
        
        user_management::Message::FirstRunUpdateDisplayName(display_name) => {
            debug!("Updating first-run display name");
            // TODO: Update first-run form state
            Task::none()
        }
        
        user_management::Message::FirstRunUpdatePassword(_password) => {
            debug!("Updating first-run password");
            // TODO: Update first-run form state (password will be SecureCredential)
            Task::none()
        }
        
        user_management::Message::FirstRunUpdateConfirmPassword(_confirm_password) => {
            debug!("Updating first-run confirm password");
            // TODO: Update first-run form state (password will be SecureCredential)
            Task::none()
        }
        
        user_management::Message::FirstRunTogglePasswordVisibility => {
            debug!("Toggling first-run password visibility");
            // TODO: Toggle password visibility state
            Task::none()
        }
        
        user_management::Message::FirstRunSubmit => {
            info!("Submitting first-run user creation");
            // TODO: Validate and submit first-run user creation
            Task::none()
        }
        
        user_management::Message::FirstRunSuccess(user) => {
            info!("First-run user creation successful: {} ({})", user.display_name, user.username);
            // TODO: Complete first-run setup
            Task::done(DomainMessage::Event(CrossDomainEvent::AuthenticationComplete))
        }
        
        user_management::Message::FirstRunError(error) => {
            error!("First-run user creation failed: {}", error);
            // TODO: Handle error state
            Task::none()
        }
        
        // Navigation
        user_management::Message::ShowUserList => {
            info!("Showing user list");
            // TODO: Navigate to user list view
            Task::none()
        }
        
        user_management::Message::BackToUserList => {
            info!("Navigating back to user list");
            // TODO: Navigate back to user list
            Task::none()
        }
        
        // Internal cross-domain coordination
        user_management::Message::_EmitCrossDomainEvent(event) => {
            debug!("Emitting cross-domain event: {:?}", event);
            Task::done(DomainMessage::Event(event))
        }
    }
}