//! # backdrop-kit
//!
//! Two small image utilities built on `image` and `imageproc`:
//!
//! - **Background Recoloring**: Samples the top-left pixel as the background color and
//!   replaces every pixel within a Euclidean RGB distance threshold with one random color,
//!   leaving alpha untouched
//! - **Wallpaper Composition**: Fits an image into a fixed 1200x2600 canvas as a centered
//!   foreground over either a blurred stretch of itself or its average color
//! - **Upload/Download Tools**: Format-checked decoding of uploads and named PNG artifacts
//!
//! Codecs and resampling sit behind the [`ImageCodec`] and [`ResampleFilter`] traits;
//! [`StandardBackend`] implements both.
//!
//! ## Example Usage
//!
//! ```no_run
//! use backdrop_kit::{
//!     BackgroundRecolorExt, Image, RngColorSource, WallpaperExt, WallpaperMethod,
//! };
//! use image::{Rgb, Rgba};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Replace a white background with a random color
//! let image: Image<Rgba<u8>> = Image::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
//! let recolored = image.recolor_background(30.0, &mut RngColorSource::thread_local())?;
//!
//! // Compose a 1200x2600 wallpaper over the average color
//! let photo: Image<Rgb<u8>> = Image::new(800, 600);
//! let wallpaper = photo.compose_wallpaper(WallpaperMethod::SolidAverageColor)?;
//! assert_eq!(wallpaper.dimensions(), (1200, 2600));
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `serde`: Enables serialization support for parameters (optional)

mod backdrop_kit;
mod error;
mod utils;

#[cfg(test)]
mod test_utils;

pub use backdrop_kit::area_average::{AreaAverageExt, average_color};
pub use backdrop_kit::backend::{ImageCodec, ResampleFilter, StandardBackend};
pub use backdrop_kit::encode::{ImageFileFormat, encode_image, sniff_format};
pub use backdrop_kit::gaussian::gaussian_blur_rgb;
pub use backdrop_kit::placement::{OverlayCenteredExt, centered_offset, paste_centered};
pub use backdrop_kit::random_color::{ColorSource, FixedColorSource, RngColorSource};
pub use backdrop_kit::recolor::{BackgroundRecolorExt, ColorDistanceMask, recolor_background};
pub use backdrop_kit::tools::{
    DownloadArtifact, RECOLOR_ARTIFACT_NAME, RecolorTool, Threshold, ToolOutput,
    WALLPAPER_ARTIFACT_NAME, WallpaperTool,
};
pub use backdrop_kit::wallpaper::{
    BACKGROUND_BLUR_RADIUS, CANVAS_HEIGHT, CANVAS_WIDTH, WallpaperComposer, WallpaperExt,
    WallpaperMethod, compose_wallpaper, fit_within,
};
pub use error::{
    CodecError, PlacementError, RecolorError, ResampleError, ToolError, WallpaperError,
};

// Re-export imageproc::definitions::Image for convenience
pub use imageproc::definitions::Image;
