pub mod admin_service;

pub use admin_service::{
    CreateUserCommand, DeleteUserCommand, ListUsersOptions, PaginatedUsers, UpdateUserCommand,
    UserAdminError, UserAdminRecord, UserAdministrationService,
};
