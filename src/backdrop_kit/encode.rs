//! Image file formats and the byte encoder used for downloads.

use std::fmt;

use image::{DynamicImage, ImageFormat};

use super::backend::{ImageCodec, StandardBackend};
use crate::error::CodecError;

/// File formats handled for uploads and downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFileFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFileFormat {
    /// Parse a user-facing format name (`png`, `jpg`/`jpeg`, `webp`), ignoring
    /// case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// * `CodecError::UnsupportedFormat` - For any other name
    pub fn parse(name: &str) -> Result<Self, CodecError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::WebP),
            _ => Err(CodecError::UnsupportedFormat {
                format: name.trim().to_owned(),
            }),
        }
    }

    /// Maps a format detected by the `image` crate, if it is one we handle.
    pub const fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::WebP => Some(Self::WebP),
            _ => None,
        }
    }

    pub const fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::WebP => ImageFormat::WebP,
        }
    }

    pub const fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Whether the container can store an alpha channel.
    pub const fn supports_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}

impl fmt::Display for ImageFileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::WebP => "WebP",
        };
        f.write_str(label)
    }
}

/// Detects the format of uploaded bytes from their signature.
///
/// # Errors
///
/// * `CodecError::InvalidImage` - When the bytes match no known image signature
/// * `CodecError::UnsupportedFormat` - When they are an image format we do not handle
pub fn sniff_format(bytes: &[u8]) -> Result<ImageFileFormat, CodecError> {
    let detected = image::guess_format(bytes).map_err(|e| CodecError::InvalidImage {
        reason: e.to_string(),
    })?;

    ImageFileFormat::from_image_format(detected).ok_or_else(|| CodecError::UnsupportedFormat {
        format: format!("{detected:?}"),
    })
}

/// Encodes an image into a byte buffer of the named format.
///
/// # Arguments
///
/// * `image` - Image to serialize
/// * `format` - Format name, e.g. `"PNG"`, `"jpeg"`, `"webp"`
///
/// # Errors
///
/// * `CodecError::UnsupportedFormat` - When `format` is not a supported name
/// * `CodecError::EncodeFailed` - When the encoder fails
///
/// # Examples
/// ```
/// use image::{DynamicImage, RgbImage};
/// use backdrop_kit::encode_image;
///
/// let image = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
/// let bytes = encode_image(&image, "PNG").unwrap();
/// assert!(bytes.starts_with(b"\x89PNG"));
/// ```
pub fn encode_image(image: &DynamicImage, format: &str) -> Result<Vec<u8>, CodecError> {
    let format = ImageFileFormat::parse(format)?;
    StandardBackend.encode(image, format)
}
