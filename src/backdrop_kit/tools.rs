//! Upload-to-download flows for the two utilities.
//!
//! A tool takes the raw bytes of an uploaded file plus the user's parameter,
//! runs the transformation, and returns both the decoded original (for a
//! before/after view) and a named PNG artifact ready to be offered for
//! download.

use std::str::FromStr;

use image::DynamicImage;
use log::info;

use super::backend::{ImageCodec, ResampleFilter, StandardBackend};
use super::encode::{ImageFileFormat, sniff_format};
use super::random_color::ColorSource;
use super::recolor::recolor_background;
use super::wallpaper::{WallpaperComposer, WallpaperMethod};
use crate::error::{CodecError, ToolError};

/// Download file name for recolored images.
pub const RECOLOR_ARTIFACT_NAME: &str = "random_bg_image.png";

/// Download file name for composed wallpapers.
pub const WALLPAPER_ARTIFACT_NAME: &str = "wallpaper_1200x2600.png";

/// Background-detection threshold as offered by the recolor form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct Threshold(u32);

impl Threshold {
    pub const MIN: u32 = 5;
    pub const MAX: u32 = 100;
    pub const STEP: u32 = 5;
    pub const DEFAULT: u32 = 30;

    /// Validates a threshold against the form's range and step.
    ///
    /// # Errors
    ///
    /// * `ToolError::ThresholdOutOfRange` - Outside `MIN..=MAX`
    /// * `ToolError::ThresholdStep` - Not a multiple of `STEP`
    pub fn new(value: u32) -> Result<Self, ToolError> {
        if value < Self::MIN || value > Self::MAX {
            return Err(ToolError::ThresholdOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        if value % Self::STEP != 0 {
            return Err(ToolError::ThresholdStep {
                value,
                step: Self::STEP,
            });
        }
        Ok(Self(value))
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// The threshold as a color distance bound.
    pub fn as_distance(self) -> f32 {
        self.0 as f32
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for Threshold {
    type Error = ToolError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for u32 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

impl FromStr for WallpaperMethod {
    type Err = ToolError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Self::from_label(label).ok_or_else(|| ToolError::UnknownMethod {
            label: label.to_owned(),
        })
    }
}

/// A named, typed byte buffer offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl DownloadArtifact {
    fn png(file_name: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            mime: ImageFileFormat::Png.mime(),
            bytes,
        }
    }
}

/// Result of running a tool: before, after, and the download.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub original: DynamicImage,
    pub result: DynamicImage,
    pub artifact: DownloadArtifact,
}

/// Decodes an upload after checking its format against `accepted`.
fn decode_upload<K: ImageCodec>(
    codec: &K,
    bytes: &[u8],
    accepted: &[ImageFileFormat],
) -> Result<DynamicImage, CodecError> {
    let format = sniff_format(bytes)?;
    if !accepted.contains(&format) {
        return Err(CodecError::UnsupportedFormat {
            format: format.to_string(),
        });
    }
    codec.decode(bytes)
}

/// Random background color replacement, upload to PNG download.
#[derive(Debug, Clone, Default)]
pub struct RecolorTool<K = StandardBackend> {
    codec: K,
}

impl<K: ImageCodec> RecolorTool<K> {
    /// Upload formats the recolor tool accepts.
    pub const ACCEPTED_FORMATS: [ImageFileFormat; 3] = [
        ImageFileFormat::Png,
        ImageFileFormat::Jpeg,
        ImageFileFormat::WebP,
    ];

    pub const fn new(codec: K) -> Self {
        Self { codec }
    }

    /// Recolor the background of an uploaded image.
    ///
    /// # Errors
    ///
    /// * `ToolError::Codec` - Unsupported upload, undecodable bytes, or encode failure
    /// * `ToolError::Recolor` - When the decoded image is empty
    pub fn run<C: ColorSource>(
        &self,
        upload: &[u8],
        threshold: Threshold,
        colors: &mut C,
    ) -> Result<ToolOutput, ToolError> {
        let original = decode_upload(&self.codec, upload, &Self::ACCEPTED_FORMATS)?;
        let recolored =
            DynamicImage::ImageRgba8(recolor_background(&original, threshold.as_distance(), colors)?);
        let bytes = self.codec.encode(&recolored, ImageFileFormat::Png)?;

        info!(
            "recolored {}x{} upload at threshold {} into {} ({} bytes)",
            original.width(),
            original.height(),
            threshold.get(),
            RECOLOR_ARTIFACT_NAME,
            bytes.len()
        );

        Ok(ToolOutput {
            original,
            result: recolored,
            artifact: DownloadArtifact::png(RECOLOR_ARTIFACT_NAME, bytes),
        })
    }
}

/// Fixed-canvas wallpaper composition, upload to PNG download.
#[derive(Debug, Clone, Default)]
pub struct WallpaperTool<K = StandardBackend, F = StandardBackend> {
    codec: K,
    composer: WallpaperComposer<F>,
}

impl<K: ImageCodec, F: ResampleFilter> WallpaperTool<K, F> {
    /// Upload formats the wallpaper tool accepts.
    pub const ACCEPTED_FORMATS: [ImageFileFormat; 2] = [ImageFileFormat::Jpeg, ImageFileFormat::Png];

    pub const fn new(codec: K, filter: F) -> Self {
        Self {
            codec,
            composer: WallpaperComposer::new(filter),
        }
    }

    /// Compose a wallpaper from an uploaded image.
    ///
    /// # Errors
    ///
    /// * `ToolError::Codec` - Unsupported upload, undecodable bytes, or encode failure
    /// * `ToolError::Wallpaper` - When composition fails
    pub fn run(&self, upload: &[u8], method: WallpaperMethod) -> Result<ToolOutput, ToolError> {
        let original = decode_upload(&self.codec, upload, &Self::ACCEPTED_FORMATS)?;
        let wallpaper = DynamicImage::ImageRgb8(self.composer.compose(&original, method)?);
        let bytes = self.codec.encode(&wallpaper, ImageFileFormat::Png)?;

        info!(
            "composed {} wallpaper from {}x{} upload into {} ({} bytes)",
            method.label(),
            original.width(),
            original.height(),
            WALLPAPER_ARTIFACT_NAME,
            bytes.len()
        );

        Ok(ToolOutput {
            original,
            result: wallpaper,
            artifact: DownloadArtifact::png(WALLPAPER_ARTIFACT_NAME, bytes),
        })
    }
}
