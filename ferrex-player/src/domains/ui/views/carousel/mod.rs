pub mod carousel;
pub mod state;
pub mod windowed_carousel;

pub use carousel::*;
pub use state::CarouselState;
pub use windowed_carousel::*;
pub use windowed_carousel::windowed_media_carousel;
