//! Collaborator interfaces for codecs and resampling, plus the default
//! implementation built on `image` and `libblur`.

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgb};
use imageproc::definitions::Image;
use log::trace;

use super::area_average::average_color;
use super::encode::ImageFileFormat;
use super::gaussian::gaussian_blur_rgb;
use crate::error::{CodecError, ResampleError};
use crate::utils::validate_non_empty_image;

/// Decodes uploads and encodes downloads.
pub trait ImageCodec {
    /// Decode image bytes in any supported container.
    ///
    /// # Errors
    ///
    /// * `CodecError::InvalidImage` - When decoding fails or yields an empty image
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError>;

    /// Encode an image into the given container.
    ///
    /// # Errors
    ///
    /// * `CodecError::EncodeFailed` - When the encoder fails
    fn encode(&self, image: &DynamicImage, format: ImageFileFormat) -> Result<Vec<u8>, CodecError>;
}

/// Resize, blur and average-color reduction for RGB images.
pub trait ResampleFilter {
    /// Resize to exactly `width` x `height` with a high-quality filter.
    /// Aspect ratio is not preserved.
    fn resize(
        &self,
        image: &Image<Rgb<u8>>,
        width: u32,
        height: u32,
    ) -> Result<Image<Rgb<u8>>, ResampleError>;

    /// Gaussian blur with standard deviation `sigma`.
    fn blur(&self, image: &Image<Rgb<u8>>, sigma: f32) -> Result<Image<Rgb<u8>>, ResampleError>;

    /// Single representative color from area-average reduction to 1x1.
    fn reduce_to_average(&self, image: &Image<Rgb<u8>>) -> Result<Rgb<u8>, ResampleError>;
}

impl<T: ResampleFilter + ?Sized> ResampleFilter for &T {
    fn resize(
        &self,
        image: &Image<Rgb<u8>>,
        width: u32,
        height: u32,
    ) -> Result<Image<Rgb<u8>>, ResampleError> {
        (**self).resize(image, width, height)
    }

    fn blur(&self, image: &Image<Rgb<u8>>, sigma: f32) -> Result<Image<Rgb<u8>>, ResampleError> {
        (**self).blur(image, sigma)
    }

    fn reduce_to_average(&self, image: &Image<Rgb<u8>>) -> Result<Rgb<u8>, ResampleError> {
        (**self).reduce_to_average(image)
    }
}

impl<T: ImageCodec + ?Sized> ImageCodec for &T {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError> {
        (**self).decode(bytes)
    }

    fn encode(&self, image: &DynamicImage, format: ImageFileFormat) -> Result<Vec<u8>, CodecError> {
        (**self).encode(image, format)
    }
}

/// Default backend: `image` codecs and Lanczos3 resampling, `libblur` box
/// passes for the Gaussian, and exact area averaging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardBackend;

impl ImageCodec for StandardBackend {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError> {
        let image = image::load_from_memory(bytes).map_err(|e| CodecError::InvalidImage {
            reason: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        validate_non_empty_image(width, height, |width, height| CodecError::InvalidImage {
            reason: format!("decoded image has no pixels ({width}x{height})"),
        })?;

        trace!("decoded {width}x{height} {:?} image", image.color());
        Ok(image)
    }

    fn encode(&self, image: &DynamicImage, format: ImageFileFormat) -> Result<Vec<u8>, CodecError> {
        let prepared = if format.supports_alpha() && image.color().has_alpha() {
            DynamicImage::ImageRgba8(image.to_rgba8())
        } else {
            DynamicImage::ImageRgb8(image.to_rgb8())
        };

        let mut buffer = Cursor::new(Vec::new());
        prepared
            .write_to(&mut buffer, format.image_format())
            .map_err(|e| CodecError::EncodeFailed {
                format: format.to_string(),
                reason: e.to_string(),
            })?;

        let bytes = buffer.into_inner();
        trace!("encoded {format} image into {} bytes", bytes.len());
        Ok(bytes)
    }
}

impl ResampleFilter for StandardBackend {
    fn resize(
        &self,
        image: &Image<Rgb<u8>>,
        width: u32,
        height: u32,
    ) -> Result<Image<Rgb<u8>>, ResampleError> {
        let (src_width, src_height) = image.dimensions();
        validate_non_empty_image(src_width, src_height, |width, height| {
            ResampleError::EmptyImage { width, height }
        })?;
        validate_non_empty_image(width, height, |width, height| {
            ResampleError::InvalidTargetDimensions { width, height }
        })?;

        if (src_width, src_height) == (width, height) {
            return Ok(image.clone());
        }

        Ok(imageops::resize(image, width, height, FilterType::Lanczos3))
    }

    fn blur(&self, image: &Image<Rgb<u8>>, sigma: f32) -> Result<Image<Rgb<u8>>, ResampleError> {
        gaussian_blur_rgb(image, sigma)
    }

    fn reduce_to_average(&self, image: &Image<Rgb<u8>>) -> Result<Rgb<u8>, ResampleError> {
        average_color(image)
    }
}
