mod id_types;
mod image;
mod post;
pub use id_types::*;
pub use image::*;
pub use post::*;

pub mod repository;
pub mod util;
