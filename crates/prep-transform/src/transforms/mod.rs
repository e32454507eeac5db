//! Built-in transforms.

mod collect;
mod load_image;
mod normalize;

pub use collect::Collect;
pub use load_image::LoadImage;
pub use normalize::Normalize;
