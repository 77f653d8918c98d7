//! Common test imports and utilities for codec tests
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.
#![allow(unused_imports)]

// External crates commonly used in tests
pub use rstest::rstest;

// Core functionality from this crate
pub use crate::{Algorithm, ColourSet, Format, Params, WEIGHTS_PERCEPTUAL, WEIGHTS_UNIFORM};

// Internal modules exercised directly by unit tests
pub(crate) use crate::alpha::{
    compress_alpha_bc2, compress_alpha_bc3, decompress_alpha_bc2, decompress_alpha_bc3,
};
pub(crate) use crate::colour_block::{
    decompress_colour, float_to_565, write_colour_block3, write_colour_block4,
};
pub(crate) use crate::colour_fit::{snap_to_grid, ClusterFit, ColourFit, RangeFit, SingleColourFit};
pub(crate) use crate::math::{
    compute_principal_component, compute_weighted_covariance, perceptible_reciprocal, Sym3x3, Vec3,
    Vec4,
};

// Re-export super for convenience in test modules
pub use super::*;
