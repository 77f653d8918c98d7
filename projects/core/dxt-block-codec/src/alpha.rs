//! Alpha-plane codecs for the 8-byte alpha half of BC2 and BC3 blocks.
//!
//! BC2 stores sixteen explicit 4-bit alpha values. BC3 stores two 8-bit
//! endpoints plus sixteen 3-bit palette indices; the encoder tries both
//! interpolation topologies (five graduated steps with fixed 0 and 255
//! entries, or seven graduated steps) and keeps whichever reproduces the
//! samples with less total squared error.

/// Quantizes one 8-bit alpha value to the 4-bit BC2 payload.
#[inline]
fn quantize_nibble(alpha: u8) -> u8 {
    // Rounding inverse of the decoder's `17 * nibble` expansion.
    ((alpha as u16 + 8) / 17) as u8
}

/// Encodes sixteen explicit 4-bit alpha values, two per byte.
///
/// Masked-out pixels encode as zero; their payload is never read back by
/// a caller that carries the same mask.
pub(crate) fn compress_alpha_bc2(rgba: &[[u8; 4]; 16], mask: u32, block: &mut [u8; 8]) {
    for i in 0..8 {
        let lo = 2 * i;
        let hi = 2 * i + 1;
        let quant_lo = if mask & (1 << lo) != 0 {
            quantize_nibble(rgba[lo][3])
        } else {
            0
        };
        let quant_hi = if mask & (1 << hi) != 0 {
            quantize_nibble(rgba[hi][3])
        } else {
            0
        };
        block[i] = quant_lo | (quant_hi << 4);
    }
}

/// Expands sixteen 4-bit alpha values back to 8 bits.
pub(crate) fn decompress_alpha_bc2(block: &[u8; 8]) -> [u8; 16] {
    let mut alphas = [0u8; 16];
    for i in 0..8 {
        alphas[2 * i] = 17 * (block[i] & 0xF);
        alphas[2 * i + 1] = 17 * (block[i] >> 4);
    }
    alphas
}

/// Widens `[min, max]` until it spans at least `steps` quantization
/// steps, staying inside [0, 255]. Guarantees `min < max` afterwards so
/// the interpolated codes are all distinct.
fn fix_range(min: &mut i32, max: &mut i32, steps: i32) {
    if *max - *min < steps {
        *max = (*min + steps).min(255);
    }
    if *max - *min < steps {
        *min = (*max - steps).max(0);
    }
}

/// Assigns every unmasked sample to its nearest code and returns the
/// summed squared error. Masked-out pixels take index 0 and contribute
/// nothing.
fn fit_codes(rgba: &[[u8; 4]; 16], mask: u32, codes: &[u8; 8], indices: &mut [u8; 16]) -> i32 {
    let mut err = 0;
    for i in 0..16 {
        if mask & (1 << i) == 0 {
            indices[i] = 0;
            continue;
        }
        let value = rgba[i][3] as i32;
        let mut least = i32::MAX;
        let mut index = 0u8;
        for (j, code) in codes.iter().enumerate() {
            let dist = value - *code as i32;
            let dist = dist * dist;
            if dist < least {
                least = dist;
                index = j as u8;
            }
        }
        indices[i] = index;
        err += least;
    }
    err
}

/// Packs two endpoint bytes and sixteen 3-bit indices into 8 bytes.
/// Indices fill each 24-bit group low-to-high in pixel order.
fn write_alpha_block(alpha0: u8, alpha1: u8, indices: &[u8; 16], block: &mut [u8; 8]) {
    block[0] = alpha0;
    block[1] = alpha1;
    for half in 0..2 {
        let mut bits = 0u32;
        for j in 0..8 {
            bits |= (indices[8 * half + j] as u32) << (3 * j);
        }
        block[2 + 3 * half] = bits as u8;
        block[3 + 3 * half] = (bits >> 8) as u8;
        block[4 + 3 * half] = (bits >> 16) as u8;
    }
}

/// Writes a five-step result. The decoder recognizes this topology by
/// `alpha0 <= alpha1`; `fix_range` already guarantees the endpoints
/// arrive in that order.
fn write_alpha_block5(alpha0: i32, alpha1: i32, indices: &[u8; 16], block: &mut [u8; 8]) {
    debug_assert!(alpha0 <= alpha1);
    write_alpha_block(alpha0 as u8, alpha1 as u8, indices, block);
}

/// Writes a seven-step result. The decoder recognizes this topology by
/// `alpha0 > alpha1`, so the endpoints are swapped and the indices are
/// remapped out of the min-first code order (0 and 1 trade places, the
/// interpolated codes reverse as `9 - index`).
fn write_alpha_block7(alpha0: i32, alpha1: i32, indices: &[u8; 16], block: &mut [u8; 8]) {
    debug_assert!(alpha0 < alpha1);
    let mut swapped = [0u8; 16];
    for (dst, &index) in swapped.iter_mut().zip(indices.iter()) {
        *dst = match index {
            0 => 1,
            1 => 0,
            other => 9 - other,
        };
    }
    write_alpha_block(alpha1 as u8, alpha0 as u8, &swapped, block);
}

/// Encodes the interpolated alpha half of a BC3 block.
pub(crate) fn compress_alpha_bc3(rgba: &[[u8; 4]; 16], mask: u32, block: &mut [u8; 8]) {
    // Bounds for each topology. The five-step palette gets 0 and 255 for
    // free, so saturated samples are excluded from its range.
    let mut min5 = 255i32;
    let mut max5 = 0i32;
    let mut min7 = 255i32;
    let mut max7 = 0i32;
    for i in 0..16 {
        if mask & (1 << i) == 0 {
            continue;
        }
        let value = rgba[i][3] as i32;
        if value < min7 {
            min7 = value;
        }
        if value > max7 {
            max7 = value;
        }
        if value != 0 && value < min5 {
            min5 = value;
        }
        if value != 255 && value > max5 {
            max5 = value;
        }
    }
    if min5 > max5 {
        min5 = max5;
    }
    if min7 > max7 {
        min7 = max7;
    }
    fix_range(&mut min5, &mut max5, 5);
    fix_range(&mut min7, &mut max7, 7);

    let mut codes5 = [0u8; 8];
    codes5[0] = min5 as u8;
    codes5[1] = max5 as u8;
    for i in 1..5 {
        codes5[1 + i] = (((5 - i) as i32 * min5 + i as i32 * max5) / 5) as u8;
    }
    codes5[6] = 0;
    codes5[7] = 255;

    let mut codes7 = [0u8; 8];
    codes7[0] = min7 as u8;
    codes7[1] = max7 as u8;
    for i in 1..7 {
        codes7[1 + i] = (((7 - i) as i32 * min7 + i as i32 * max7) / 7) as u8;
    }

    let mut indices5 = [0u8; 16];
    let mut indices7 = [0u8; 16];
    let err5 = fit_codes(rgba, mask, &codes5, &mut indices5);
    let err7 = fit_codes(rgba, mask, &codes7, &mut indices7);

    if err5 <= err7 {
        write_alpha_block5(min5, max5, &indices5, block);
    } else {
        write_alpha_block7(min7, max7, &indices7, block);
    }
}

/// Decodes the interpolated alpha half of a BC3 block.
pub(crate) fn decompress_alpha_bc3(block: &[u8; 8]) -> [u8; 16] {
    let a0 = block[0] as u32;
    let a1 = block[1] as u32;

    let mut bits = 0u64;
    for (i, byte) in block[2..8].iter().enumerate() {
        bits |= (*byte as u64) << (8 * i);
    }

    let mut alphas = [0u8; 16];
    for (i, alpha) in alphas.iter_mut().enumerate() {
        let code = ((bits >> (3 * i)) & 0x7) as u32;
        *alpha = match code {
            0 => a0 as u8,
            1 => a1 as u8,
            _ if a0 > a1 => (((8 - code) * a0 + (code - 1) * a1) / 7) as u8,
            6 => 0,
            7 => 255,
            _ => (((6 - code) * a0 + (code - 1) * a1) / 5) as u8,
        };
    }
    alphas
}

#[cfg(test)]
mod tests {
    use crate::test_prelude::*;

    fn alphas_to_rgba(alphas: &[u8; 16]) -> [[u8; 4]; 16] {
        let mut rgba = [[0u8; 4]; 16];
        for (pixel, &a) in rgba.iter_mut().zip(alphas.iter()) {
            pixel[3] = a;
        }
        rgba
    }

    fn bc3_round_trip(alphas: &[u8; 16], mask: u32) -> ([u8; 8], [u8; 16]) {
        let mut block = [0u8; 8];
        compress_alpha_bc3(&alphas_to_rgba(alphas), mask, &mut block);
        let decoded = decompress_alpha_bc3(&block);
        (block, decoded)
    }

    #[test]
    fn bc2_multiples_of_seventeen_round_trip_exactly() {
        let mut alphas = [0u8; 16];
        for (i, a) in alphas.iter_mut().enumerate() {
            *a = (i as u8) * 17;
        }
        let mut block = [0u8; 8];
        compress_alpha_bc2(&alphas_to_rgba(&alphas), 0xFFFF, &mut block);
        assert_eq!(decompress_alpha_bc2(&block), alphas);
    }

    #[rstest]
    #[case(0)]
    #[case(8)]
    #[case(130)]
    #[case(255)]
    fn bc2_quantization_error_is_bounded(#[case] value: u8) {
        let alphas = [value; 16];
        let mut block = [0u8; 8];
        compress_alpha_bc2(&alphas_to_rgba(&alphas), 0xFFFF, &mut block);
        let decoded = decompress_alpha_bc2(&block);
        for a in decoded {
            assert!((a as i16 - value as i16).abs() <= 8);
        }
    }

    #[test]
    fn seven_step_topology_wins_on_mid_range_gradient() {
        // No saturated samples, so the five-step palette wastes its fixed
        // 0 and 255 entries while the seven-step palette graduates finer.
        let mut alphas = [0u8; 16];
        for (i, a) in alphas.iter_mut().enumerate() {
            *a = 100 + 6 * i as u8;
        }
        let (block, decoded) = bc3_round_trip(&alphas, 0xFFFF);

        // Canonical encoding of the seven-step topology.
        assert!(block[0] > block[1]);
        let step = (alphas[15] - alphas[0]) / 7;
        for (a, original) in decoded.iter().zip(alphas.iter()) {
            assert!((*a as i16 - *original as i16).abs() <= step as i16, "{a} vs {original}");
        }
    }

    #[test]
    fn five_step_topology_wins_with_saturated_extremes() {
        let mut alphas = [120u8; 16];
        alphas[0] = 0;
        alphas[1] = 0;
        alphas[2] = 255;
        alphas[3] = 255;
        for (i, a) in alphas.iter_mut().enumerate().skip(4) {
            *a = 118 + i as u8;
        }
        let (block, decoded) = bc3_round_trip(&alphas, 0xFFFF);

        assert!(block[0] <= block[1]);
        // Fixed palette entries reproduce the saturated samples exactly.
        assert_eq!(decoded[0], 0);
        assert_eq!(decoded[1], 0);
        assert_eq!(decoded[2], 255);
        assert_eq!(decoded[3], 255);
        for (a, original) in decoded.iter().zip(alphas.iter()).skip(4) {
            assert!((*a as i16 - *original as i16).abs() <= 4, "{a} vs {original}");
        }
    }

    #[test]
    fn uniform_alpha_reproduces_the_value() {
        let alphas = [77u8; 16];
        let (_, decoded) = bc3_round_trip(&alphas, 0xFFFF);
        for a in decoded {
            assert!((a as i16 - 77).abs() <= 1);
        }
    }

    #[test]
    fn endpoint_values_round_trip_exactly() {
        let mut alphas = [30u8; 16];
        for a in alphas.iter_mut().skip(8) {
            *a = 200;
        }
        let (_, decoded) = bc3_round_trip(&alphas, 0xFFFF);
        for (i, a) in decoded.iter().enumerate() {
            let expected = if i < 8 { 30 } else { 200 };
            assert_eq!(*a as i16, expected, "pixel {i}");
        }
    }

    #[test]
    fn masked_pixels_do_not_influence_the_palette() {
        // Outlier alphas hidden behind the mask must not widen the range.
        let mut alphas = [90u8; 16];
        alphas[12] = 255;
        alphas[13] = 0;
        let mask = 0xFFFF & !(1 << 12) & !(1 << 13);
        let (_, decoded) = bc3_round_trip(&alphas, mask);
        for (i, a) in decoded.iter().enumerate() {
            if mask & (1 << i) != 0 {
                assert!((*a as i16 - 90).abs() <= 1, "pixel {i}: {a}");
            }
        }
    }

    #[test]
    fn encoder_output_is_deterministic() {
        let mut alphas = [0u8; 16];
        for (i, a) in alphas.iter_mut().enumerate() {
            *a = (i as u8).wrapping_mul(37);
        }
        let (first, _) = bc3_round_trip(&alphas, 0xFFFF);
        let (second, _) = bc3_round_trip(&alphas, 0xFFFF);
        assert_eq!(first, second);
    }
}
