//! Error types for image-level compression operations.

use thiserror::Error;

/// Errors that can occur during image-level compression or decompression.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// An image dimension is zero.
    #[error("Invalid dimensions: {width}x{height}. Both dimensions must be non-zero.")]
    InvalidDimensions {
        /// Image width in pixels
        width: usize,
        /// Image height in pixels
        height: usize,
    },

    /// The pixel buffer does not match the stated dimensions.
    #[error("Invalid pixel buffer length: {actual} bytes for {width}x{height} RGBA (need {needed} bytes).")]
    InvalidPixelBufferLength {
        /// The required size in bytes
        needed: usize,
        /// The actual size in bytes
        actual: usize,
        /// Image width in pixels
        width: usize,
        /// Image height in pixels
        height: usize,
    },

    /// The compressed buffer is too small for the operation.
    #[error("Compressed buffer too small: need {needed} bytes, but only {actual} bytes available.")]
    CompressedBufferTooSmall {
        /// The required size in bytes
        needed: usize,
        /// The actual size in bytes
        actual: usize,
    },
}
