use image::{ImageBuffer, Pixel, Primitive};
use imageproc::definitions::{Clamp, Image};
use itertools::Itertools;

use crate::error::ResampleError;
use crate::utils::validate_non_empty_image;

/// Area-average color of the whole image.
///
/// This is an area resize down to a single pixel: every source pixel
/// contributes with equal weight, channel by channel, and the mean is rounded
/// to the nearest representable value.
///
/// # Errors
///
/// * `ResampleError::EmptyImage` - When the image has zero width or height
pub fn average_color<P>(image: &Image<P>) -> Result<P, ResampleError>
where
    P: Pixel,
    P::Subpixel: Clamp<f32> + Primitive,
    f32: From<P::Subpixel>,
{
    let (width, height) = image.dimensions();
    validate_non_empty_image(width, height, |width, height| ResampleError::EmptyImage {
        width,
        height,
    })?;

    let channels = usize::from(P::CHANNEL_COUNT);
    let pixel_count = f64::from(width) * f64::from(height);

    // f64 keeps full-canvas sums exact; f32 loses integer precision past 2^24
    let mut channel_sums = vec![0.0f64; channels];
    for pixel in image.as_raw().chunks_exact(channels) {
        for (sum, &value) in channel_sums.iter_mut().zip(pixel) {
            *sum += f64::from(f32::from(value));
        }
    }

    let averaged = channel_sums
        .into_iter()
        .map(|sum| P::Subpixel::clamp((sum / pixel_count).round() as f32))
        .collect_vec();

    Ok(*P::from_slice(&averaged))
}

/// Extension trait for reducing an image to its average color.
///
/// Note: The result is always 1x1, so there is no `_mut` variant available.
pub trait AreaAverageExt<P: Pixel> {
    /// Reduce the image to a 1x1 image holding its area-average color.
    ///
    /// This consumes the original image.
    fn reduce_to_average(self) -> Result<Self, ResampleError>
    where
        Self: Sized;
}

impl<P> AreaAverageExt<P> for Image<P>
where
    P: Pixel,
    P::Subpixel: Clamp<f32> + Primitive,
    f32: From<P::Subpixel>,
{
    fn reduce_to_average(self) -> Result<Self, ResampleError> {
        let color = average_color(&self)?;
        Ok(ImageBuffer::from_pixel(1, 1, color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use image::{Luma, Rgb, Rgba};

    #[test]
    fn average_color_with_single_pixel_returns_that_pixel() {
        let image = Image::from_pixel(1, 1, Rgb([10u8, 20, 30]));
        assert_eq!(average_color(&image), Ok(Rgb([10, 20, 30])));
    }

    #[test]
    fn average_color_with_mixed_pixels_returns_channel_means() {
        // (200+10+40+70)/4 = 80, (150+20+50+80)/4 = 75, (100+30+60+90)/4 = 70
        let image = create_test_rgb_image();
        assert_eq!(average_color(&image), Ok(Rgb([80, 75, 70])));
    }

    #[test]
    fn average_color_rounds_to_nearest() {
        // (0 + 255) / 2 = 127.5 -> 128; (0 + 1 + 1) / 3 = 0.67 -> 1
        let halves = Image::from_fn(2, 1, |x, _| Luma([if x == 0 { 0u8 } else { 255 }]));
        assert_eq!(average_color(&halves), Ok(Luma([128])));

        let thirds = Image::from_fn(3, 1, |x, _| Luma([u8::from(x > 0)]));
        assert_eq!(average_color(&thirds), Ok(Luma([1])));
    }

    #[test]
    fn average_color_with_alpha_averages_every_channel() {
        let image = Image::from_fn(2, 2, |x, _| {
            if x == 0 {
                Rgba([0u8, 0, 0, 0])
            } else {
                Rgba([100u8, 200, 50, 255])
            }
        });
        assert_eq!(average_color(&image), Ok(Rgba([50, 100, 25, 128])));
    }

    #[test]
    fn average_color_with_large_uniform_image_is_exact() {
        let image = Image::from_pixel(1200, 2600, Rgb([255u8, 1, 254]));
        assert_eq!(average_color(&image), Ok(Rgb([255, 1, 254])));
    }

    #[test]
    fn average_color_with_empty_image_returns_error() {
        let image: Image<Rgb<u8>> = Image::new(0, 3);
        assert_eq!(
            average_color(&image),
            Err(ResampleError::EmptyImage {
                width: 0,
                height: 3
            })
        );
    }

    #[test]
    fn reduce_to_average_ext_produces_one_by_one_image() {
        let reduced = create_test_rgb_image().reduce_to_average().unwrap();

        assert_eq!(reduced.dimensions(), (1, 1));
        assert_eq!(*reduced.get_pixel(0, 0), Rgb([80, 75, 70]));
    }
}
