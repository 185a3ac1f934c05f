//! Error types for backdrop-kit operations.
//!
//! Each operation family has its own error enum so callers can match on the
//! failures that operation can actually produce.

use thiserror::Error;

/// Errors from background recoloring.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecolorError {
    /// The input image has no pixels.
    #[error("Invalid image: dimensions must be non-zero, got {width}x{height}")]
    InvalidImage { width: u32, height: u32 },
}

/// Errors from placing a foreground onto a canvas.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// Foreground is wider than the canvas.
    #[error("Foreground width ({width}) exceeds canvas width ({canvas_width})")]
    ForegroundTooWide { width: u32, canvas_width: u32 },

    /// Foreground is taller than the canvas.
    #[error("Foreground height ({height}) exceeds canvas height ({canvas_height})")]
    ForegroundTooTall { height: u32, canvas_height: u32 },
}

/// Errors from the resampling collaborator.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResampleError {
    /// The source image has no pixels.
    #[error("Cannot resample an empty image ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// The requested output size has a zero side.
    #[error("Invalid target dimensions: {width}x{height}")]
    InvalidTargetDimensions { width: u32, height: u32 },

    /// Blur strength must be finite and positive.
    #[error("Invalid blur sigma: {sigma}")]
    InvalidSigma { sigma: f32 },

    /// The blur backend rejected the request.
    #[error("Blur failed: {0}")]
    BlurFailed(String),
}

/// Errors from wallpaper composition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WallpaperError {
    /// The input image has no pixels.
    #[error("Invalid image: dimensions must be non-zero, got {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    #[error(transparent)]
    Resample(#[from] ResampleError),

    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Errors from decoding uploads and encoding downloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The format is not one the codec handles for this operation.
    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },

    /// The bytes could not be decoded, or decoded to an empty image.
    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },

    /// The encoder failed while writing the output buffer.
    #[error("Failed to encode {format} image: {reason}")]
    EncodeFailed { format: String, reason: String },
}

/// Errors from the upload-to-download tool flows.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ToolError {
    /// Threshold outside the range offered by the recolor form.
    #[error("Threshold {value} is outside the supported range {min}..={max}")]
    ThresholdOutOfRange { value: u32, min: u32, max: u32 },

    /// Threshold not on the slider step.
    #[error("Threshold {value} is not a multiple of {step}")]
    ThresholdStep { value: u32, step: u32 },

    /// Method label that matches neither wallpaper method.
    #[error("Unknown wallpaper method: {label}")]
    UnknownMethod { label: String },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Recolor(#[from] RecolorError),

    #[error(transparent)]
    Wallpaper(#[from] WallpaperError),
}
