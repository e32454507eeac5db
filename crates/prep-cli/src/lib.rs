//! Library components of the image classification demo.

pub mod image_io;
pub mod logging;
