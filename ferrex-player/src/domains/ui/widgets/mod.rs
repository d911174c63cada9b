pub mod background_shader;
pub mod filter_button;
pub mod image_for;
pub mod library_menu;
pub mod rounded_image_shader;
pub mod sort_dropdown;
pub mod sort_order_toggle;
pub mod texture_preloader;
pub use background_shader::{
    BackgroundEffect, BackgroundTheme, DepthLayout, QualitySettings, background_shader,
};
pub use filter_button::filter_button;
pub use image_for::image_for;
pub use library_menu::library_sort_filter_menu;
pub use rounded_image_shader::{
    AnimatedPosterBounds, AnimationBehavior, AnimationType, rounded_image_shader,
};
pub use sort_dropdown::sort_dropdown;
pub use sort_order_toggle::sort_order_toggle;
pub use texture_preloader::{collect_cached_handles_for_media, texture_preloader};
