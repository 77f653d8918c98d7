//! Exact fit for blocks that reduce to a single colour.

use super::lookup::{compute_end_points, PaletteMode};
use super::ColourFit;
use crate::colour_block::{write_colour_block3, write_colour_block4};
use crate::colour_set::ColourSet;

/// Table-lookup fit for a one-point colour set.
///
/// Both interpolation orientations are considered in BC1 mode; the
/// summed squared channel error decides between them. No search is
/// involved, so this path is both faster and at least as accurate as the
/// iterative fitters for uniform blocks.
pub(crate) struct SingleColourFit<'a> {
    colours: &'a ColourSet,
    is_bc1: bool,
    colour: [u8; 3],
}

impl<'a> SingleColourFit<'a> {
    pub(crate) fn new(colours: &'a ColourSet, is_bc1: bool) -> Self {
        debug_assert_eq!(colours.count(), 1);
        let point = colours.points()[0];
        let colour = [
            (255.0 * point.x + 0.5).trunc() as u8,
            (255.0 * point.y + 0.5).trunc() as u8,
            (255.0 * point.z + 0.5).trunc() as u8,
        ];
        Self {
            colours,
            is_bc1,
            colour,
        }
    }
}

impl ColourFit for SingleColourFit<'_> {
    fn compress(&mut self, block: &mut [u8; 8]) {
        // Palette index 2 is the interpolated middle entry in both
        // orientations; the single point always maps there.
        let source = [2u8; 16];
        let mut indices = [0u8; 16];
        self.colours.remap_indices(&source, &mut indices);

        if self.is_bc1 {
            let (start3, end3, error3) = compute_end_points(self.colour, PaletteMode::Three);
            // A transparent slot's forced index 3 only decodes as
            // transparent in three-colour mode, so that mode is not
            // optional for blocks that carry one.
            if self.colours.is_transparent() {
                write_colour_block3(start3, end3, &indices, block);
                return;
            }
            let (start4, end4, error4) = compute_end_points(self.colour, PaletteMode::Four);
            if error3 <= error4 {
                write_colour_block3(start3, end3, &indices, block);
            } else {
                write_colour_block4(start4, end4, &indices, block);
            }
            return;
        }

        let (start4, end4, _) = compute_end_points(self.colour, PaletteMode::Four);
        write_colour_block4(start4, end4, &indices, block);
    }
}

#[cfg(test)]
mod tests {
    use crate::test_prelude::*;

    #[rstest]
    #[case([0, 0, 0, 255])]
    #[case([255, 255, 255, 255])]
    #[case([123, 45, 67, 255])]
    fn uniform_block_decodes_within_table_error(#[case] pixel: [u8; 4]) {
        let rgba = [pixel; 16];
        let colours = ColourSet::new(&rgba, 0xFFFF, Format::Bc1, false);
        assert_eq!(colours.count(), 1);

        let mut block = [0u8; 8];
        SingleColourFit::new(&colours, true).compress(&mut block);

        let decoded = decompress_colour(&block, false);
        for out in decoded {
            for channel in 0..3 {
                let diff = (out[channel] as i16 - pixel[channel] as i16).abs();
                assert!(diff <= 4, "channel {channel}: {} vs {}", out[channel], pixel[channel]);
            }
            assert_eq!(out[3], 255);
        }
    }

    #[test]
    fn uniform_block_output_is_scan_order_invariant() {
        let rgba = [[37u8, 99, 200, 255]; 16];
        let colours = ColourSet::new(&rgba, 0xFFFF, Format::Bc1, false);

        let mut first = [0u8; 8];
        SingleColourFit::new(&colours, true).compress(&mut first);
        let mut second = [0u8; 8];
        SingleColourFit::new(&colours, true).compress(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn transparent_slots_force_three_colour_mode() {
        let mut rgba = [[80u8, 80, 80, 255]; 16];
        rgba[9][3] = 0;
        let colours = ColourSet::new(&rgba, 0xFFFF, Format::Bc1, false);
        assert_eq!(colours.count(), 1);
        assert!(colours.is_transparent());

        let mut block = [0u8; 8];
        SingleColourFit::new(&colours, true).compress(&mut block);

        // Grey 80 alone would prefer the four-colour orientation, but
        // that would decode slot 9 as an opaque interpolant.
        let decoded = decompress_colour(&block, false);
        assert_eq!(decoded[9], [0, 0, 0, 0]);
        for (i, out) in decoded.iter().enumerate() {
            if i != 9 {
                assert_eq!(out[3], 255);
                assert!((out[0] as i16 - 80).abs() <= 4);
            }
        }
    }

    #[test]
    fn non_bc1_mode_never_uses_three_colour_palette() {
        // Grey 80 is reproduced better by the thirds palette than the
        // halves palette would allow in BC1, but BC2/BC3 decode always
        // interpolates in thirds, so the four-colour orientation must be
        // used regardless.
        let rgba = [[80u8, 80, 80, 255]; 16];
        let colours = ColourSet::new(&rgba, 0xFFFF, Format::Bc2, false);

        let mut block = [0u8; 8];
        SingleColourFit::new(&colours, false).compress(&mut block);

        let decoded = decompress_colour(&block, true);
        for out in decoded {
            assert!((out[0] as i16 - 80).abs() <= 4);
        }
    }
}
