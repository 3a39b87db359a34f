mod image;
mod post;
pub use image::*;
pub use post::*;
