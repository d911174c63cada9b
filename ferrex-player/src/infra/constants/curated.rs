//! Curated content constants used by the All tab carousels

/// Maximum number of items to show in curated carousels on the All view
pub const MAX_CAROUSEL_ITEMS: usize = 50;
pub const HEAD_WINDOW: usize = 200;
