//! Colour endpoint fitters.
//!
//! Three strategies, all producing the same 8-byte colour block:
//!
//! - [`SingleColourFit`]: exact table lookup for uniform blocks.
//! - [`RangeFit`]: bounding box along the principal axis, one pass.
//! - [`ClusterFit`]: exhaustive contiguous-partition search along an
//!   evolving principal axis.

mod cluster;
mod lookup;
mod range;
mod single_colour;

pub(crate) use cluster::ClusterFit;
pub(crate) use range::RangeFit;
pub(crate) use single_colour::SingleColourFit;

use crate::math::Vec3;

/// Consumes a colour set and emits the packed 8-byte colour block.
pub(crate) trait ColourFit {
    fn compress(&mut self, block: &mut [u8; 8]);
}

/// Snaps a [0,1] colour onto the representable 5:6:5 lattice, still in
/// [0,1] space. Both inexact fitters quantize their candidate endpoints
/// through this before measuring error, so the error they report is the
/// error of the block that will actually be written.
pub(super) fn snap_to_grid(colour: Vec3) -> Vec3 {
    const GRID: Vec3 = Vec3::new(31.0, 63.0, 31.0);
    const GRID_RCP: Vec3 = Vec3::new(1.0 / 31.0, 1.0 / 63.0, 1.0 / 31.0);
    const HALF: Vec3 = Vec3::splat(0.5);
    ((GRID * colour.clamp01() + HALF).truncate()) * GRID_RCP
}
