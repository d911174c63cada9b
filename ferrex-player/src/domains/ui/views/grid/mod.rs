#[macro_use]
pub mod macros;

pub mod cards;
pub mod macro_gen;
pub mod state;
pub mod types;
pub mod utils;
pub mod virtual_list;

pub use cards::*;
pub use macro_gen::*;
pub use state::*;
pub use types::*;
pub use utils::*;
pub use virtual_list::*;
