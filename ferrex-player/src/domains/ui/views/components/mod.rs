//! UI components module

pub mod search_dropdown;

pub use search_dropdown::{
    view_search_fullscreen, view_search_overlay, view_search_window,
};
