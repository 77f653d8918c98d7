#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

// Module declarations
pub mod codec;
pub mod error;
pub mod params;

// Re-export main functionality at crate root
pub use codec::{compress, compressed_size, decompress};
pub use error::CodecError;
pub use params::CodecParams;

// Re-export the block-level types callers need to drive the API
pub use dxt_block_codec::{Algorithm, Format, WEIGHTS_PERCEPTUAL, WEIGHTS_UNIFORM};

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
