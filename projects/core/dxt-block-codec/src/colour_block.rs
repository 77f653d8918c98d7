//! Colour block serialization and the matching decode.
//!
//! A colour block is 8 bytes: two little-endian 5:6:5 endpoints followed
//! by sixteen 2-bit palette indices, four per byte, low bits first. The
//! numeric order of the packed endpoints selects the decoder's
//! interpolation mode, so the writers below canonicalize endpoint order
//! and remap indices to match.

use crate::math::Vec3;

/// Packs a clamped [0,1] colour into 5:6:5.
pub(crate) fn float_to_565(colour: Vec3) -> u16 {
    let c = colour.clamp01();
    let r = (31.0 * c.x + 0.5).trunc() as u16;
    let g = (63.0 * c.y + 0.5).trunc() as u16;
    let b = (31.0 * c.z + 0.5).trunc() as u16;
    (r << 11) | (g << 5) | b
}

fn write_block(a: u16, b: u16, indices: &[u8; 16], block: &mut [u8; 8]) {
    block[0..2].copy_from_slice(&a.to_le_bytes());
    block[2..4].copy_from_slice(&b.to_le_bytes());
    for row in 0..4 {
        block[4 + row] = indices[4 * row]
            | (indices[4 * row + 1] << 2)
            | (indices[4 * row + 2] << 4)
            | (indices[4 * row + 3] << 6);
    }
}

/// Writes a block in four-colour (thirds interpolation) mode.
///
/// The format requires `packed(c0) > packed(c1)` for this mode, so when
/// the packed endpoints come out in the wrong order they are swapped and
/// every index has its 0/1 bit pattern flipped (`(i ^ 1) & 3`, which also
/// exchanges the two interpolated entries). Equal packed endpoints would
/// leave the interpolation direction undefined, so all indices collapse
/// to 0.
pub(crate) fn write_colour_block4(start: Vec3, end: Vec3, indices: &[u8; 16], block: &mut [u8; 8]) {
    let mut a = float_to_565(start);
    let mut b = float_to_565(end);

    let mut remapped = [0u8; 16];
    if a < b {
        core::mem::swap(&mut a, &mut b);
        for (dst, &src) in remapped.iter_mut().zip(indices) {
            *dst = (src ^ 0x1) & 0x3;
        }
    } else if a == b {
        // remapped stays all zero
    } else {
        remapped.copy_from_slice(indices);
    }

    write_block(a, b, &remapped, block);
}

/// Writes a block in three-colour (halves + transparent) mode.
///
/// Requires `packed(c0) <= packed(c1)`; a swap only exchanges indices 0
/// and 1 because the midpoint entry is symmetric in the endpoints.
pub(crate) fn write_colour_block3(start: Vec3, end: Vec3, indices: &[u8; 16], block: &mut [u8; 8]) {
    let mut a = float_to_565(start);
    let mut b = float_to_565(end);

    let mut remapped = [0u8; 16];
    if a <= b {
        remapped.copy_from_slice(indices);
    } else {
        core::mem::swap(&mut a, &mut b);
        for (dst, &src) in remapped.iter_mut().zip(indices) {
            *dst = match src {
                0 => 1,
                1 => 0,
                other => other,
            };
        }
    }

    write_block(a, b, &remapped, block);
}

/// Expands a packed 5:6:5 endpoint to 8-bit channels by bit replication.
fn unpack_565(value: u16) -> [u8; 3] {
    let r = ((value >> 11) & 0x1F) as u8;
    let g = ((value >> 5) & 0x3F) as u8;
    let b = (value & 0x1F) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

/// Decodes the colour half of a block into 16 RGBA pixels.
///
/// With `ignore_alpha` (BC2/BC3) the palette always uses thirds
/// interpolation regardless of endpoint order, and every pixel comes out
/// opaque (the caller overlays the alpha plane). In BC1 mode,
/// `c0 <= c1` switches to the three-colour palette whose fourth entry is
/// transparent black.
pub(crate) fn decompress_colour(block: &[u8; 8], ignore_alpha: bool) -> [[u8; 4]; 16] {
    let c0 = u16::from_le_bytes([block[0], block[1]]);
    let c1 = u16::from_le_bytes([block[2], block[3]]);
    let rgb0 = unpack_565(c0);
    let rgb1 = unpack_565(c1);

    let mut palette = [[0u8; 4]; 4];
    palette[0] = [rgb0[0], rgb0[1], rgb0[2], 255];
    palette[1] = [rgb1[0], rgb1[1], rgb1[2], 255];

    if ignore_alpha || c0 > c1 {
        for channel in 0..3 {
            let a = rgb0[channel] as u16;
            let b = rgb1[channel] as u16;
            palette[2][channel] = ((2 * a + b) / 3) as u8;
            palette[3][channel] = ((a + 2 * b) / 3) as u8;
        }
        palette[2][3] = 255;
        palette[3][3] = 255;
    } else {
        for channel in 0..3 {
            let a = rgb0[channel] as u16;
            let b = rgb1[channel] as u16;
            palette[2][channel] = ((a + b) / 2) as u8;
        }
        palette[2][3] = 255;
        palette[3] = [0, 0, 0, 0];
    }

    let mut rgba = [[0u8; 4]; 16];
    for (i, pixel) in rgba.iter_mut().enumerate() {
        let code = (block[4 + i / 4] >> (2 * (i % 4))) & 0x3;
        *pixel = palette[code as usize];
    }
    rgba
}
