#[macro_use]
pub mod macros;

pub mod grid_view;
pub mod virtual_list;

pub use grid_view::*;
pub use virtual_list::*;
