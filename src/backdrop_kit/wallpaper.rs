use image::{DynamicImage, GenericImageView, ImageBuffer, Rgb};
use imageproc::definitions::Image;
use log::debug;

use super::backend::{ResampleFilter, StandardBackend};
use super::placement::paste_centered;
use crate::error::WallpaperError;
use crate::utils::validate_non_empty_image;

/// Wallpaper canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 1200;

/// Wallpaper canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 2600;

/// Gaussian blur radius (standard deviation) for the blurred background.
pub const BACKGROUND_BLUR_RADIUS: f32 = 50.0;

/// How the canvas area around the foreground is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WallpaperMethod {
    /// The source stretched to the full canvas and heavily blurred.
    #[default]
    BlurredBackground,
    /// One flat color: the area average of the source.
    SolidAverageColor,
}

impl WallpaperMethod {
    pub const ALL: [Self; 2] = [Self::BlurredBackground, Self::SolidAverageColor];

    /// Label shown for the method in the selection control.
    pub const fn label(self) -> &'static str {
        match self {
            Self::BlurredBackground => "Blurred background",
            Self::SolidAverageColor => "Solid color (average)",
        }
    }

    /// Looks a method up by its label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == label.trim())
    }
}

/// Largest size that fits `size` inside `bounds` with the same aspect ratio.
///
/// Images that already fit are returned unchanged; nothing is ever enlarged.
/// On the constrained axis the floor or ceiling of the exact value is used,
/// whichever keeps the aspect ratio closer (floor on ties), and never less
/// than one pixel.
///
/// # Examples
/// ```
/// use backdrop_kit::fit_within;
///
/// assert_eq!(fit_within((3000, 1000), (1200, 2600)), (1200, 400));
/// assert_eq!(fit_within((600, 1300), (1200, 2600)), (600, 1300));
/// ```
pub fn fit_within(size: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (width, height) = size;
    let (max_width, max_height) = bounds;

    if width <= max_width && height <= max_height {
        return size;
    }

    let aspect = f64::from(width) / f64::from(height);
    let bound_w = f64::from(max_width);
    let bound_h = f64::from(max_height);

    if bound_w / bound_h >= aspect {
        let fitted_width = round_aspect_impl(bound_h * aspect, |n| (aspect - n / bound_h).abs());
        (fitted_width, max_height)
    } else {
        let fitted_height = round_aspect_impl(bound_w / aspect, |n| {
            if n == 0.0 { 0.0 } else { (aspect - bound_w / n).abs() }
        });
        (max_width, fitted_height)
    }
}

/// Picks floor or ceil of `exact`, whichever scores lower under `error`.
fn round_aspect_impl(exact: f64, error: impl Fn(f64) -> f64) -> u32 {
    let floor = exact.floor();
    let ceil = exact.ceil();
    let chosen = if error(ceil) < error(floor) { ceil } else { floor };
    (chosen as u32).max(1)
}

/// Composes fixed-size wallpapers from arbitrary source images.
///
/// The source is fitted (downscale only) and centered on a
/// `CANVAS_WIDTH` x `CANVAS_HEIGHT` canvas whose remaining area is filled
/// according to the chosen [`WallpaperMethod`].
#[derive(Debug, Clone, Default)]
pub struct WallpaperComposer<F = StandardBackend> {
    filter: F,
}

impl<F: ResampleFilter> WallpaperComposer<F> {
    /// Composer using the given resampling collaborator.
    pub const fn new(filter: F) -> Self {
        Self { filter }
    }

    /// Canvas size as (width, height).
    pub const fn canvas_size(&self) -> (u32, u32) {
        (CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    /// Compose a wallpaper.
    ///
    /// Alpha is discarded; the output is always opaque RGB of exactly the
    /// canvas size. The background is computed even when the foreground
    /// covers it completely.
    ///
    /// # Errors
    ///
    /// * `WallpaperError::InvalidImage` - When the image has zero width or height
    /// * `WallpaperError::Resample` - When the resampling collaborator fails
    /// * `WallpaperError::Placement` - When the foreground does not fit the canvas
    pub fn compose(
        &self,
        image: &DynamicImage,
        method: WallpaperMethod,
    ) -> Result<Image<Rgb<u8>>, WallpaperError> {
        let (width, height) = image.dimensions();
        validate_non_empty_image(width, height, |width, height| {
            WallpaperError::InvalidImage { width, height }
        })?;

        self.compose_rgb_impl(&image.to_rgb8(), method)
    }

    fn compose_rgb_impl(
        &self,
        source: &Image<Rgb<u8>>,
        method: WallpaperMethod,
    ) -> Result<Image<Rgb<u8>>, WallpaperError> {
        let foreground = self.fit_foreground_impl(source)?;

        let mut canvas = match method {
            WallpaperMethod::BlurredBackground => self.blurred_background_impl(source)?,
            WallpaperMethod::SolidAverageColor => self.solid_background_impl(source)?,
        };

        let offset = paste_centered(&mut canvas, &foreground)?;
        debug!(
            "wallpaper: {:?} source {:?} -> foreground {:?} at {offset:?}",
            method,
            source.dimensions(),
            foreground.dimensions()
        );

        Ok(canvas)
    }

    fn fit_foreground_impl(&self, source: &Image<Rgb<u8>>) -> Result<Image<Rgb<u8>>, WallpaperError> {
        let (fitted_width, fitted_height) = fit_within(source.dimensions(), self.canvas_size());

        if (fitted_width, fitted_height) == source.dimensions() {
            return Ok(source.clone());
        }

        Ok(self.filter.resize(source, fitted_width, fitted_height)?)
    }

    fn blurred_background_impl(
        &self,
        source: &Image<Rgb<u8>>,
    ) -> Result<Image<Rgb<u8>>, WallpaperError> {
        let stretched = self.filter.resize(source, CANVAS_WIDTH, CANVAS_HEIGHT)?;
        Ok(self.filter.blur(&stretched, BACKGROUND_BLUR_RADIUS)?)
    }

    fn solid_background_impl(
        &self,
        source: &Image<Rgb<u8>>,
    ) -> Result<Image<Rgb<u8>>, WallpaperError> {
        let average = self.filter.reduce_to_average(source)?;
        debug!("wallpaper: average background color {:?}", average.0);
        Ok(ImageBuffer::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, average))
    }
}

/// Compose a wallpaper with the standard backend.
///
/// # Errors
///
/// See [`WallpaperComposer::compose`].
pub fn compose_wallpaper(
    image: &DynamicImage,
    method: WallpaperMethod,
) -> Result<Image<Rgb<u8>>, WallpaperError> {
    WallpaperComposer::new(StandardBackend).compose(image, method)
}

/// Trait that provides wallpaper composition on RGB images.
///
/// Note: This operation changes the image dimensions, so there is no `_mut` variant
/// available.
pub trait WallpaperExt {
    /// Compose a `CANVAS_WIDTH` x `CANVAS_HEIGHT` wallpaper from this image.
    ///
    /// This consumes the original image.
    fn compose_wallpaper(self, method: WallpaperMethod) -> Result<Self, WallpaperError>
    where
        Self: Sized;
}

impl WallpaperExt for Image<Rgb<u8>> {
    fn compose_wallpaper(self, method: WallpaperMethod) -> Result<Self, WallpaperError> {
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height, |width, height| {
            WallpaperError::InvalidImage { width, height }
        })?;

        WallpaperComposer::new(StandardBackend).compose_rgb_impl(&self, method)
    }
}
