mod carousel;
mod state;
mod windowed_carousel;

pub use carousel::*;
pub use state::CarouselState;
pub use windowed_carousel::windowed_media_carousel;
