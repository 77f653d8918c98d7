#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

pub(crate) mod alpha;
pub(crate) mod colour_block;
pub(crate) mod colour_fit;
pub(crate) mod colour_set;
pub(crate) mod math;

pub use colour_set::ColourSet;

use alpha::{compress_alpha_bc2, compress_alpha_bc3, decompress_alpha_bc2, decompress_alpha_bc3};
use colour_block::decompress_colour;
use colour_fit::{ClusterFit, ColourFit, RangeFit, SingleColourFit};

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;

/// Uniform per-channel error weighting.
pub const WEIGHTS_UNIFORM: [f32; 3] = [1.0, 1.0, 1.0];

/// Perceptual per-channel error weighting, biased towards green the way
/// the eye is.
pub const WEIGHTS_PERCEPTUAL: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Block compression format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// DXT1: colour only, 8 bytes per block. Pixels with alpha below 128
    /// encode as transparent black via the three-colour palette mode.
    Bc1,
    /// DXT3: explicit 4-bit alpha block + colour block, 16 bytes.
    Bc2,
    /// DXT5: interpolated 3-bit alpha block + colour block, 16 bytes.
    Bc3,
}

impl Format {
    /// Compressed size of one 4x4 block in bytes.
    #[inline]
    pub const fn block_size(self) -> usize {
        match self {
            Format::Bc1 => 8,
            Format::Bc2 | Format::Bc3 => 16,
        }
    }

    /// Compresses one 4x4 block.
    ///
    /// `rgba` holds 16 pixels in row-major order. Bit `i` of `mask`
    /// marks pixel slot `i` as valid; clear it for padding slots in
    /// edge-clamped partial blocks. `block` must be at least
    /// [`Format::block_size`] bytes; only that prefix is written.
    ///
    /// # Panics
    ///
    /// Panics if `block` is shorter than [`Format::block_size`].
    pub fn compress_block_masked(
        self,
        rgba: &[[u8; 4]; 16],
        mask: u32,
        params: Params,
        block: &mut [u8],
    ) {
        let block = &mut block[..self.block_size()];
        let (alpha_block, colour_block) = match self {
            Format::Bc1 => (None, &mut block[..8]),
            Format::Bc2 | Format::Bc3 => {
                let (alpha, colour) = block.split_at_mut(8);
                (Some(alpha), colour)
            }
        };
        let colour_block: &mut [u8; 8] = colour_block.try_into().unwrap();

        if let Some(alpha_block) = alpha_block {
            let alpha_block: &mut [u8; 8] = alpha_block.try_into().unwrap();
            match self {
                Format::Bc2 => compress_alpha_bc2(rgba, mask, alpha_block),
                Format::Bc3 => compress_alpha_bc3(rgba, mask, alpha_block),
                Format::Bc1 => unreachable!(),
            }
        }

        let colours = ColourSet::new(rgba, mask, self, params.weigh_colour_by_alpha);
        let is_bc1 = self == Format::Bc1;

        if colours.count() == 1 {
            SingleColourFit::new(&colours, is_bc1).compress(colour_block);
        } else if params.algorithm == Algorithm::RangeFit || colours.count() == 0 {
            RangeFit::new(&colours, is_bc1, params.weights).compress(colour_block);
        } else {
            let iterate = params.algorithm == Algorithm::IterativeClusterFit;
            ClusterFit::new(&colours, params.weights, iterate).compress(colour_block);
        }
    }

    /// Decompresses one block back into 16 row-major RGBA pixels.
    ///
    /// # Panics
    ///
    /// Panics if `block` is shorter than [`Format::block_size`].
    pub fn decompress_block(self, block: &[u8]) -> [[u8; 4]; 16] {
        let block = &block[..self.block_size()];
        let (alpha_block, colour_block) = match self {
            Format::Bc1 => (None, &block[..8]),
            Format::Bc2 | Format::Bc3 => {
                let (alpha, colour) = block.split_at(8);
                (Some(alpha), colour)
            }
        };
        let colour_block: &[u8; 8] = colour_block.try_into().unwrap();

        // BC2/BC3 ignore the colour endpoint ordering and always decode
        // the four-colour palette; BC1 uses it as the 1-bit alpha signal.
        let mut rgba = decompress_colour(colour_block, self != Format::Bc1);

        if let Some(alpha_block) = alpha_block {
            let alpha_block: &[u8; 8] = alpha_block.try_into().unwrap();
            let alphas = match self {
                Format::Bc2 => decompress_alpha_bc2(alpha_block),
                Format::Bc3 => decompress_alpha_bc3(alpha_block),
                Format::Bc1 => unreachable!(),
            };
            for (pixel, alpha) in rgba.iter_mut().zip(alphas) {
                pixel[3] = alpha;
            }
        }

        rgba
    }
}

/// Colour fitter selection, in increasing order of cost and quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Single-pass bounding-box fit. Fastest, lowest quality.
    RangeFit,
    /// One full partition search along the initial principal axis.
    ClusterFit,
    /// Partition search repeated along a re-derived axis, up to eight
    /// rounds. Slowest, highest quality.
    IterativeClusterFit,
}

/// Compression parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    /// Colour fitter to use for blocks with more than one distinct colour.
    pub algorithm: Algorithm,
    /// Per-channel weights for the fitters' error metric. See
    /// [`WEIGHTS_UNIFORM`] and [`WEIGHTS_PERCEPTUAL`].
    pub weights: [f32; 3],
    /// Weight each colour's influence by its alpha value. Useful when the
    /// texture will be alpha-blended, so hidden colours matter less.
    pub weigh_colour_by_alpha: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::ClusterFit,
            weights: WEIGHTS_UNIFORM,
            weigh_colour_by_alpha: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_prelude::*;

    fn gradient_block() -> [[u8; 4]; 16] {
        let mut rgba = [[0u8; 4]; 16];
        for (i, pixel) in rgba.iter_mut().enumerate() {
            let v = (i * 255 / 15) as u8;
            *pixel = [v, 255 - v, v / 3, (40 + i * 12) as u8];
        }
        rgba
    }

    #[rstest]
    #[case(Format::Bc1, 8)]
    #[case(Format::Bc2, 16)]
    #[case(Format::Bc3, 16)]
    fn block_sizes(#[case] format: Format, #[case] size: usize) {
        assert_eq!(format.block_size(), size);
    }

    #[rstest]
    #[case(Format::Bc1)]
    #[case(Format::Bc2)]
    #[case(Format::Bc3)]
    fn known_palette_colours_round_trip_exactly(#[case] format: Format) {
        // Black/white endpoints with their exact integer thirds: the only
        // zero-error endpoints are black and white themselves, so the
        // decoded palette must reproduce every pixel bit-exactly.
        let palette = [[0u8, 0, 0], [255, 255, 255], [170, 170, 170], [85, 85, 85]];
        let mut rgba = [[0u8; 4]; 16];
        for (i, pixel) in rgba.iter_mut().enumerate() {
            let c = palette[i % 4];
            *pixel = [c[0], c[1], c[2], 255];
        }

        let mut block = vec![0u8; format.block_size()];
        format.compress_block_masked(&rgba, 0xFFFF, Params::default(), &mut block);
        let decoded = format.decompress_block(&block);
        for (out, original) in decoded.iter().zip(rgba.iter()) {
            assert_eq!(out[..3], original[..3]);
        }
    }

    #[rstest]
    #[case(Algorithm::RangeFit)]
    #[case(Algorithm::ClusterFit)]
    #[case(Algorithm::IterativeClusterFit)]
    fn all_algorithms_produce_valid_blocks(#[case] algorithm: Algorithm) {
        let rgba = gradient_block();
        let params = Params {
            algorithm,
            ..Params::default()
        };
        let mut block = [0u8; 16];
        Format::Bc3.compress_block_masked(&rgba, 0xFFFF, params, &mut block);
        let decoded = Format::Bc3.decompress_block(&block);
        // Alpha plane is independent of the colour fitter; its palette
        // graduates the 40..220 spread in at worst seven steps.
        for (out, original) in decoded.iter().zip(rgba.iter()) {
            assert!((out[3] as i16 - original[3] as i16).abs() <= 18);
        }
    }

    #[test]
    fn bc1_transparent_pixels_survive_the_round_trip() {
        let mut rgba = [[200u8, 60, 20, 255]; 16];
        rgba[3][3] = 0;
        rgba[7][3] = 10;

        let mut block = [0u8; 8];
        Format::Bc1.compress_block_masked(&rgba, 0xFFFF, Params::default(), &mut block);
        let decoded = Format::Bc1.decompress_block(&block);

        assert_eq!(decoded[3], [0, 0, 0, 0]);
        assert_eq!(decoded[7], [0, 0, 0, 0]);
        for (i, pixel) in decoded.iter().enumerate() {
            if i != 3 && i != 7 {
                assert_eq!(pixel[3], 255, "pixel {i}");
            }
        }
    }

    #[test]
    fn bc2_alpha_is_explicit_per_pixel() {
        let mut rgba = [[90u8, 90, 90, 0]; 16];
        for (i, pixel) in rgba.iter_mut().enumerate() {
            pixel[3] = (i as u8) * 17;
        }
        let mut block = [0u8; 16];
        Format::Bc2.compress_block_masked(&rgba, 0xFFFF, Params::default(), &mut block);
        let decoded = Format::Bc2.decompress_block(&block);
        for (out, original) in decoded.iter().zip(rgba.iter()) {
            assert_eq!(out[3], original[3]);
        }
    }

    #[test]
    fn partial_block_produces_fully_defined_output() {
        // Only the top-left 2x2 quadrant holds valid pixels.
        let mask = 0b0000_0000_0011_0011;
        let mut rgba = [[0u8; 4]; 16];
        for i in [0usize, 1, 4, 5] {
            rgba[i] = [10 + 40 * i as u8, 250 - 30 * i as u8, 77, 200];
        }

        for format in [Format::Bc1, Format::Bc2, Format::Bc3] {
            let mut block = vec![0u8; format.block_size()];
            format.compress_block_masked(&rgba, mask, Params::default(), &mut block);
            let decoded = format.decompress_block(&block);
            assert_eq!(decoded.len(), 16);
            for i in [0usize, 1, 4, 5] {
                // Valid pixels stay close to their input colour.
                for channel in 0..3 {
                    let diff = decoded[i][channel] as i16 - rgba[i][channel] as i16;
                    assert!(diff.abs() <= 48, "{format:?} pixel {i} channel {channel}");
                }
            }
        }
    }

    #[rstest]
    #[case(Format::Bc1)]
    #[case(Format::Bc2)]
    #[case(Format::Bc3)]
    fn fully_masked_block_produces_defined_bytes(#[case] format: Format) {
        // An all-clear mask is a legal input; every slot is padding.
        let rgba = [[0u8; 4]; 16];
        let mut block = vec![0xAAu8; format.block_size()];
        format.compress_block_masked(&rgba, 0, Params::default(), &mut block);
        // Every output byte is written; none of the fill pattern survives.
        assert!(block.iter().all(|&b| b != 0xAA), "{block:02X?}");
        let decoded = format.decompress_block(&block);
        assert_eq!(decoded.len(), 16);
    }

    #[test]
    fn compression_is_deterministic_across_calls() {
        let rgba = gradient_block();
        let mut first = [0u8; 16];
        let mut second = [0u8; 16];
        let params = Params {
            algorithm: Algorithm::IterativeClusterFit,
            ..Params::default()
        };
        Format::Bc3.compress_block_masked(&rgba, 0xFFFF, params, &mut first);
        Format::Bc3.compress_block_masked(&rgba, 0xFFFF, params, &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn perceptual_weights_still_produce_valid_blocks() {
        let rgba = gradient_block();
        let params = Params {
            weights: WEIGHTS_PERCEPTUAL,
            ..Params::default()
        };
        let mut block = [0u8; 8];
        Format::Bc1.compress_block_masked(&rgba, 0xFFFF, params, &mut block);
        let decoded = Format::Bc1.decompress_block(&block);
        for pixel in decoded {
            assert_eq!(pixel[3], 255);
        }
    }
}
