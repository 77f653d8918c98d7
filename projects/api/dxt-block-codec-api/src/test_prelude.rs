//! Common test imports and utilities for API tests
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.
#![allow(unused_imports)]

// External crates commonly used in tests
pub use rstest::rstest;

// Core functionality from this crate
pub use crate::codec::{compress, compressed_size, decompress};
pub use crate::error::CodecError;
pub use crate::params::CodecParams;

// Block-level types from the core codec
pub use dxt_block_codec::{Algorithm, Format, Params, WEIGHTS_PERCEPTUAL, WEIGHTS_UNIFORM};
