//! Block colour-set builder.
//!
//! Collapses the 16 pixels of a block into a compact set of distinct,
//! weighted colour points, while remembering which point each pixel slot
//! maps to so palette indices can be scattered back out after fitting.

use crate::math::Vec3;
use crate::Format;

/// The alpha cutoff below which a BC1 pixel becomes fully transparent.
const BC1_ALPHA_CUTOFF: u8 = 128;

/// A deduplicated, weighted point set extracted from one 4x4 block.
pub struct ColourSet {
    points: [Vec3; 16],
    weights: [f32; 16],
    remap: [i8; 16],
    count: usize,
    transparent: bool,
}

impl ColourSet {
    /// Builds the point set for one block.
    ///
    /// - `rgba`: 16 pixels in row-major order.
    /// - `mask`: bit `i` set means pixel slot `i` holds valid image data;
    ///   clear slots (edge padding) are excluded from fitting and forced
    ///   to index 3 by [`ColourSet::remap_indices`].
    /// - `format`: in BC1 mode, pixels with alpha below 128 are excluded
    ///   the same way and decode as transparent black.
    /// - `weight_by_alpha`: weight each occurrence by `(alpha + 1) / 256`
    ///   instead of 1.
    ///
    /// Point weights are replaced by their square roots once the set is
    /// complete; the fitters square them back inside their least-squares
    /// sums, which linearizes the weighting.
    pub fn new(rgba: &[[u8; 4]; 16], mask: u32, format: Format, weight_by_alpha: bool) -> Self {
        let is_bc1 = format == Format::Bc1;
        let mut set = Self {
            points: [Vec3::default(); 16],
            weights: [0.0; 16],
            remap: [-1; 16],
            count: 0,
            transparent: false,
        };

        for i in 0..16 {
            if mask & (1 << i) == 0 {
                continue;
            }
            if is_bc1 && rgba[i][3] < BC1_ALPHA_CUTOFF {
                set.transparent = true;
                continue;
            }

            let occurrence_weight = if weight_by_alpha {
                (rgba[i][3] as f32 + 1.0) / 256.0
            } else {
                1.0
            };

            // Match against earlier pixels; exact RGB equality only, and
            // in BC1 mode the earlier pixel must itself be opaque enough
            // to have produced a point.
            let mut matched = false;
            for j in 0..i {
                let is_match = mask & (1 << j) != 0
                    && rgba[i][0] == rgba[j][0]
                    && rgba[i][1] == rgba[j][1]
                    && rgba[i][2] == rgba[j][2]
                    && !(is_bc1 && rgba[j][3] < BC1_ALPHA_CUTOFF);
                if is_match {
                    let index = set.remap[j];
                    debug_assert!(index >= 0);
                    set.weights[index as usize] += occurrence_weight;
                    set.remap[i] = index;
                    matched = true;
                    break;
                }
            }

            if !matched {
                set.points[set.count] = Vec3::new(
                    rgba[i][0] as f32 / 255.0,
                    rgba[i][1] as f32 / 255.0,
                    rgba[i][2] as f32 / 255.0,
                );
                set.weights[set.count] = occurrence_weight;
                set.remap[i] = set.count as i8;
                set.count += 1;
            }
        }

        for weight in &mut set.weights[..set.count] {
            *weight = weight.sqrt();
        }

        set
    }

    /// Number of distinct points in the set (0..=16).
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// The distinct colour points, each channel in [0,1].
    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points[..self.count]
    }

    /// Square roots of the accumulated per-point weights.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights[..self.count]
    }

    /// Whether any BC1 pixel fell below the alpha cutoff. Transparent
    /// blocks must be serialized in three-colour mode so the forced
    /// index 3 slots decode as transparent black.
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    /// Scatters per-point palette indices back to the 16 pixel slots.
    ///
    /// Slots that produced no point (edge padding, BC1 transparent
    /// pixels) are forced to palette index 3.
    pub fn remap_indices(&self, source: &[u8; 16], target: &mut [u8; 16]) {
        for i in 0..16 {
            let j = self.remap[i];
            target[i] = if j < 0 { 3 } else { source[j as usize] };
        }
    }
}
