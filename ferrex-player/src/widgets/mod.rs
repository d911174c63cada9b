pub mod background_shader;
pub mod image_for;
pub mod progress_badge;
pub mod rounded_image_shader;

pub use background_shader::{
    background_shader, BackgroundEffect, BackgroundTheme, DepthLayout, QualitySettings,
};
pub use image_for::image_for;
pub use progress_badge::{
    create_progress_badge_element, episode_count_badge, new_badge, progress_badge, BadgePosition,
};
pub use rounded_image_shader::{rounded_image_shader, AnimatedPosterBounds, AnimationType};
