//! Image decoding into classifier input.
//!
//! Files are decoded with the `image` crate, optionally downscaled so the
//! longest side fits `max_side`, and converted to an 8-bit BGR [`Mat`].

use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;
use image::imageops::FilterType;
use prep_model::{Mat, PixelFormat};
use tracing::debug;

/// Decode `path` into a BGR mat.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_mat(path: &Path, max_side: Option<u32>) -> Result<Mat> {
    let image = image::open(path).with_context(|| format!("decode {}", path.display()))?;
    let image = match max_side {
        Some(max_side) => downscale(image, max_side),
        None => image,
    };
    to_bgr_mat(&image)
}

/// Shrink `image` so its longest side is at most `max_side`, keeping the
/// aspect ratio. Smaller images are returned unchanged.
pub fn downscale(image: DynamicImage, max_side: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    if width.max(height) <= max_side {
        return image;
    }
    let resized = image.resize(max_side, max_side, FilterType::Triangle);
    debug!(
        from = ?(width, height),
        to = ?(resized.width(), resized.height()),
        "downscaled image"
    );
    resized
}

/// Interleaved BGR copy of `image`.
///
/// # Errors
///
/// Returns an error for an image with a zero dimension.
pub fn to_bgr_mat(image: &DynamicImage) -> Result<Mat> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut data = rgb.into_raw();
    for pixel in data.chunks_exact_mut(3) {
        pixel.swap(0, 2);
    }
    Mat::new(height as usize, width as usize, PixelFormat::Bgr, data)
        .context("convert decoded image")
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    #[test]
    fn converts_to_bgr() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 1, Rgb([10, 20, 30])));
        let mat = to_bgr_mat(&image).unwrap();
        assert_eq!((mat.height, mat.width, mat.channels), (1, 2, 3));
        assert_eq!(mat.data, vec![30, 20, 10, 30, 20, 10]);
    }

    #[test]
    fn downscale_keeps_aspect_ratio() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(400, 200));
        let resized = downscale(image, 100);
        assert_eq!((resized.width(), resized.height()), (100, 50));
    }

    #[test]
    fn small_images_are_untouched() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(40, 20));
        let resized = downscale(image, 100);
        assert_eq!((resized.width(), resized.height()), (40, 20));
    }
}
