use image::{DynamicImage, Pixel, Rgb, Rgba};
use imageproc::definitions::Image;
use log::debug;

use super::random_color::ColorSource;
use crate::error::RecolorError;
use crate::utils::{rgb_distance_squared, validate_non_empty_image};

/// Per-pixel background mask built from color distance to a reference color.
///
/// An entry is `true` when the pixel's Euclidean RGB distance to the
/// reference is strictly below the threshold. Alpha never participates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDistanceMask {
    width: u32,
    height: u32,
    matches: Vec<bool>,
}

impl ColorDistanceMask {
    /// Builds the mask for `image` against `reference`.
    ///
    /// # Arguments
    ///
    /// * `image` - Image to classify
    /// * `reference` - Background color to compare against
    /// * `threshold` - Distance bound; pixels with distance `< threshold` match
    ///
    /// A threshold of zero, a negative threshold, or NaN matches nothing.
    pub fn from_reference<P>(image: &Image<P>, reference: Rgb<u8>, threshold: f32) -> Self
    where
        P: Pixel<Subpixel = u8>,
    {
        let (width, height) = image.dimensions();
        let threshold = f64::from(threshold);

        let matches = image
            .pixels()
            .map(|pixel| {
                let distance_sq = rgb_distance_squared(pixel.to_rgb().0, reference.0);
                f64::from(distance_sq).sqrt() < threshold
            })
            .collect();

        Self {
            width,
            height,
            matches,
        }
    }

    /// Mask dimensions as (width, height).
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the pixel at (x, y) is background.
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is outside the mask.
    pub fn get(&self, x: u32, y: u32) -> bool {
        assert!(
            x < self.width && y < self.height,
            "mask coordinate ({x}, {y}) out of bounds for {}x{}",
            self.width,
            self.height
        );
        self.matches[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Number of background pixels.
    pub fn count(&self) -> usize {
        self.matches.iter().filter(|&&m| m).count()
    }

    /// Entries in row-major order, matching `ImageBuffer::pixels`.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.matches.iter().copied()
    }
}

/// Trait for replacing a near-uniform background with a random color.
///
/// The background color is sampled from the top-left pixel. Every pixel whose
/// RGB distance to it is below the threshold receives one color drawn from
/// the supplied [`ColorSource`]; alpha is left as it was.
pub trait BackgroundRecolorExt {
    /// Recolors the background.
    ///
    /// This consumes the original image.
    ///
    /// # Arguments
    ///
    /// * `threshold` - Euclidean RGB distance bound (usable range is roughly 5-100)
    /// * `colors` - Source for the replacement color; drawn exactly once
    ///
    /// # Errors
    ///
    /// * `RecolorError::InvalidImage` - When the image has zero width or height
    ///
    /// # Examples
    /// ```no_run
    /// use backdrop_kit::{BackgroundRecolorExt, FixedColorSource, Image};
    /// use image::{Rgb, Rgba};
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let image: Image<Rgba<u8>> = Image::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
    /// let recolored = image.recolor_background(30.0, &mut FixedColorSource(Rgb([0, 128, 0])))?;
    /// # Ok(())
    /// # }
    /// ```
    fn recolor_background<C: ColorSource>(
        self,
        threshold: f32,
        colors: &mut C,
    ) -> Result<Self, RecolorError>
    where
        Self: Sized;

    /// Recolors the background in place.
    fn recolor_background_mut<C: ColorSource>(
        &mut self,
        threshold: f32,
        colors: &mut C,
    ) -> Result<&mut Self, RecolorError>;
}

impl BackgroundRecolorExt for Image<Rgba<u8>> {
    fn recolor_background<C: ColorSource>(
        mut self,
        threshold: f32,
        colors: &mut C,
    ) -> Result<Self, RecolorError> {
        self.recolor_background_mut(threshold, colors)?;
        Ok(self)
    }

    fn recolor_background_mut<C: ColorSource>(
        &mut self,
        threshold: f32,
        colors: &mut C,
    ) -> Result<&mut Self, RecolorError> {
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height, |width, height| {
            RecolorError::InvalidImage { width, height }
        })?;

        let reference = sample_background_impl(self);
        let mask = ColorDistanceMask::from_reference(self, reference, threshold);
        let replacement = colors.next_color();

        debug!(
            "recolor: reference {:?}, replacement {:?}, {} of {} pixels matched (threshold {threshold})",
            reference.0,
            replacement.0,
            mask.count(),
            u64::from(width) * u64::from(height)
        );

        apply_mask_impl(self, &mask, replacement);
        Ok(self)
    }
}

/// Recolors the background of any decoded image.
///
/// The image is first converted to RGBA (alpha 255 where the source has none);
/// the caller's image is left untouched and a new buffer is returned.
///
/// # Errors
///
/// * `RecolorError::InvalidImage` - When the image has zero width or height
pub fn recolor_background<C: ColorSource>(
    image: &DynamicImage,
    threshold: f32,
    colors: &mut C,
) -> Result<Image<Rgba<u8>>, RecolorError> {
    image.to_rgba8().recolor_background(threshold, colors)
}

/// Reference background color: RGB of the top-left pixel.
fn sample_background_impl(image: &Image<Rgba<u8>>) -> Rgb<u8> {
    image.get_pixel(0, 0).to_rgb()
}

/// Overwrites RGB of masked pixels, keeping alpha.
fn apply_mask_impl(image: &mut Image<Rgba<u8>>, mask: &ColorDistanceMask, color: Rgb<u8>) {
    image
        .pixels_mut()
        .zip(mask.iter())
        .filter(|(_, matched)| *matched)
        .for_each(|(pixel, _)| pixel.0[..3].copy_from_slice(&color.0));
}
