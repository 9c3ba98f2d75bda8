//! Texture image decoding.
//!
//! Images are decoded with the `image` crate and kept in their native 3- or 4-channel
//! layout. Any other channel count is rejected so that a grayscale file loaded as a
//! colour texture is reported instead of silently reinterpreted.

use super::AssetError;
use image::DynamicImage;
use std::path::Path;

/// Pixel layout of a decoded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// 8-bit red, green, blue.
    Rgb,
    /// 8-bit red, green, blue, alpha.
    Rgba,
}

impl ChannelLayout {
    /// Bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }
}

/// A decoded texture ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channel layout of `pixels`.
    pub layout: ChannelLayout,
    /// Tightly packed rows, top row first.
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Converts an already decoded image, keeping RGB or RGBA as-is.
    ///
    /// 16-bit and float images with three or four channels are narrowed to 8 bits.
    ///
    /// # Errors
    /// [`AssetError::UnsupportedChannels`] for grayscale or gray-alpha images.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self, AssetError> {
        let (width, height) = (image.width(), image.height());
        match image.color().channel_count() {
            3 => Ok(Self {
                width,
                height,
                layout: ChannelLayout::Rgb,
                pixels: image.into_rgb8().into_raw(),
            }),
            4 => Ok(Self {
                width,
                height,
                layout: ChannelLayout::Rgba,
                pixels: image.into_rgba8().into_raw(),
            }),
            n => Err(AssetError::UnsupportedChannels(n)),
        }
    }

    /// Returns the pixels as RGBA, expanding RGB with an opaque alpha channel.
    pub fn to_rgba(&self) -> Vec<u8> {
        match self.layout {
            ChannelLayout::Rgba => self.pixels.clone(),
            ChannelLayout::Rgb => self
                .pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
                .collect(),
        }
    }
}

/// Reads and decodes a texture from `path`.
///
/// # Errors
/// - [`AssetError::Io`] if the file cannot be read
/// - [`AssetError::Image`] if it cannot be decoded
/// - [`AssetError::UnsupportedChannels`] if it is neither RGB nor RGBA
pub fn load_texture_image(path: &Path) -> Result<TextureImage, AssetError> {
    let bytes = std::fs::read(path).map_err(|e| AssetError::io(path, e))?;
    let image = image::load_from_memory(&bytes).map_err(|source| AssetError::Image {
        path: path.to_path_buf(),
        source,
    })?;

    let texture = TextureImage::from_dynamic(image)?;
    log::info!(
        "Loaded texture {} ({}x{}, {} channels)",
        path.display(),
        texture.width,
        texture.height,
        texture.layout.channels()
    );
    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage, RgbaImage};

    #[test]
    fn test_rgb_image_keeps_three_channels() {
        let img = RgbImage::from_pixel(2, 3, image::Rgb([10, 20, 30]));
        let tex = TextureImage::from_dynamic(DynamicImage::ImageRgb8(img)).expect("rgb is valid");
        assert_eq!(tex.layout, ChannelLayout::Rgb);
        assert_eq!((tex.width, tex.height), (2, 3));
        assert_eq!(tex.pixels.len(), 2 * 3 * 3);
    }

    /// RGB pixels gain an opaque alpha byte when expanded.
    #[test]
    fn test_to_rgba_expands_rgb() {
        let img = RgbImage::from_pixel(1, 2, image::Rgb([1, 2, 3]));
        let tex = TextureImage::from_dynamic(DynamicImage::ImageRgb8(img)).expect("rgb is valid");
        assert_eq!(tex.to_rgba(), vec![1, 2, 3, 255, 1, 2, 3, 255]);
    }

    #[test]
    fn test_rgba_image_is_passed_through() {
        let img = RgbaImage::from_pixel(1, 1, image::Rgba([9, 8, 7, 6]));
        let tex =
            TextureImage::from_dynamic(DynamicImage::ImageRgba8(img)).expect("rgba is valid");
        assert_eq!(tex.layout, ChannelLayout::Rgba);
        assert_eq!(tex.to_rgba(), vec![9, 8, 7, 6]);
    }

    /// Grayscale is not a valid colour texture.
    #[test]
    fn test_grayscale_is_rejected() {
        let img = GrayImage::new(4, 4);
        let err = TextureImage::from_dynamic(DynamicImage::ImageLuma8(img)).unwrap_err();
        assert!(matches!(err, AssetError::UnsupportedChannels(1)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_texture_image(Path::new("no/such/texture.png")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
