use crate::AssetError;
use image::DynamicImage;
use std::path::Path;

/// Channel layout of the image as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Rgb8,
    Rgba8,
}

impl SourceFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            SourceFormat::Rgb8 => 3,
            SourceFormat::Rgba8 => 4,
        }
    }
}

/// Decoded texture, always stored as tightly packed RGBA8 rows.
#[derive(Debug, Clone)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub source_format: SourceFormat,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Decode an image file.
    ///
    /// Only 8-bit RGB and RGBA images are accepted. RGB data is expanded to
    /// RGBA with an opaque alpha channel since GPUs have no packed RGB8 format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let texture = Self::from_image(image).map_err(|found| {
            AssetError::UnsupportedPixelFormat {
                path: path.to_path_buf(),
                found,
            }
        })?;
        tracing::info!(
            "loaded texture {}: {}x{} {:?}",
            path.display(),
            texture.width,
            texture.height,
            texture.source_format
        );
        Ok(texture)
    }

    /// Convert an already decoded image. On rejection the error carries the
    /// name of the offending color layout.
    pub fn from_image(image: DynamicImage) -> Result<Self, String> {
        let (source_format, rgba) = match image {
            DynamicImage::ImageRgb8(rgb) => (
                SourceFormat::Rgb8,
                DynamicImage::ImageRgb8(rgb).into_rgba8(),
            ),
            DynamicImage::ImageRgba8(rgba) => (SourceFormat::Rgba8, rgba),
            other => return Err(format!("{:?}", other.color())),
        };
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            source_format,
            pixels: rgba.into_raw(),
        })
    }

    /// Bytes in one row of the RGBA pixel data.
    pub fn row_bytes(&self) -> u32 {
        self.width * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn rgb_is_expanded_to_opaque_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        RgbImage::from_pixel(2, 3, Rgb([10, 20, 30])).save(&path).unwrap();

        let tex = TextureImage::load(&path).unwrap();
        assert_eq!((tex.width, tex.height), (2, 3));
        assert_eq!(tex.source_format, SourceFormat::Rgb8);
        assert_eq!(tex.pixels.len(), 2 * 3 * 4);
        assert_eq!(&tex.pixels[..4], &[10, 20, 30, 255]);
        assert_eq!(tex.row_bytes(), 8);
    }

    #[test]
    fn rgba_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.png");
        RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 128]))
            .save(&path)
            .unwrap();

        let tex = TextureImage::load(&path).unwrap();
        assert_eq!(tex.source_format, SourceFormat::Rgba8);
        assert_eq!(tex.source_format.bytes_per_pixel(), 4);
        assert_eq!(&tex.pixels[..4], &[1, 2, 3, 128]);
    }

    #[test]
    fn grayscale_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(2, 2, Luma([7])).save(&path).unwrap();

        let err = TextureImage::load(&path).unwrap_err();
        assert!(matches!(err, AssetError::UnsupportedPixelFormat { .. }));
    }

    #[test]
    fn missing_file_is_image_error() {
        let err = TextureImage::load("/no/such/texture.png").unwrap_err();
        assert!(matches!(err, AssetError::Image { .. }));
    }
}
