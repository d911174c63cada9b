mod view_admin;
mod view_library_form;
mod view_library_management;
mod view_admin_users;

pub use view_admin::view_admin_dashboard;
pub use view_library_form::view_library_form;
pub use view_library_management::view_library_management;
pub use view_admin_users::view_admin_users;
