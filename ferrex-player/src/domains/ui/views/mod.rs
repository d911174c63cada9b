pub mod admin;
pub mod all;
pub mod auth;
pub mod error;
pub mod first_run;
pub mod grid;
pub mod header;
pub mod library;
pub mod library_controls_bar;
pub mod library_filter_panel;
pub mod loading;
pub mod movies;
pub mod password_login;
pub mod pin_entry;
pub mod settings;
pub mod tv;
pub mod user_selection;

pub use auth::view_auth;
pub use error::*;
pub use loading::*;
pub use password_login::*;
pub use pin_entry::*;
pub use user_selection::*;

pub mod carousel;
pub mod components;
