//! Image-level compression and decompression operations.

use crate::error::CodecError;
use crate::params::CodecParams;
use dxt_block_codec::Format;

#[cfg(feature = "multithreaded")]
use rayon::prelude::*;

/// Size in bytes of the compressed payload for a `width` x `height`
/// image: one block per 4x4 tile, edge tiles rounded up.
///
/// Saturates at `usize::MAX` for dimensions whose payload cannot fit in
/// memory; [`compress`] and [`decompress`] reject such dimensions.
pub fn compressed_size(format: Format, width: usize, height: usize) -> usize {
    width
        .div_ceil(4)
        .saturating_mul(height.div_ceil(4))
        .saturating_mul(format.block_size())
}

fn validate_dimensions(width: usize, height: usize) -> Result<(), CodecError> {
    if width == 0 || height == 0 {
        return Err(CodecError::InvalidDimensions { width, height });
    }
    // The pixel buffer byte count must fit in usize.
    if width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(4))
        .is_none()
    {
        return Err(CodecError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn validate_pixel_buffer(
    len: usize,
    width: usize,
    height: usize,
) -> Result<(), CodecError> {
    let needed = width * height * 4;
    if len != needed {
        return Err(CodecError::InvalidPixelBufferLength {
            needed,
            actual: len,
            width,
            height,
        });
    }
    Ok(())
}

/// Copies one 4x4 tile out of the image, returning the pixels plus a
/// validity mask with a bit set for every slot inside the image bounds.
fn gather_block(
    rgba: &[u8],
    width: usize,
    height: usize,
    block_x: usize,
    block_y: usize,
) -> ([[u8; 4]; 16], u32) {
    let mut pixels = [[0u8; 4]; 16];
    let mut mask = 0u32;
    for py in 0..4 {
        let y = block_y * 4 + py;
        if y >= height {
            break;
        }
        for px in 0..4 {
            let x = block_x * 4 + px;
            if x >= width {
                break;
            }
            let offset = (y * width + x) * 4;
            pixels[py * 4 + px] = [
                rgba[offset],
                rgba[offset + 1],
                rgba[offset + 2],
                rgba[offset + 3],
            ];
            mask |= 1 << (py * 4 + px);
        }
    }
    (pixels, mask)
}

fn compress_block_row(
    format: Format,
    rgba: &[u8],
    width: usize,
    height: usize,
    block_y: usize,
    params: CodecParams,
    row: &mut [u8],
) {
    let block_size = format.block_size();
    for (block_x, block) in row.chunks_exact_mut(block_size).enumerate() {
        let (pixels, mask) = gather_block(rgba, width, height, block_x, block_y);
        format.compress_block_masked(&pixels, mask, params.into_inner(), block);
    }
}

/// Compresses a whole RGBA image into row-major block order.
///
/// `rgba` holds `width * height` pixels, 4 bytes each, rows top to
/// bottom. Edge tiles of images whose dimensions are not multiples of 4
/// are compressed with the out-of-bounds slots masked out.
///
/// # Errors
///
/// - [`CodecError::InvalidDimensions`] if either dimension is zero or
///   the image byte size overflows `usize`
/// - [`CodecError::InvalidPixelBufferLength`] if `rgba` does not hold
///   exactly `width * height * 4` bytes
/// - [`CodecError::CompressedBufferTooSmall`] if `output` is smaller
///   than [`compressed_size`]
///
/// # Examples
///
/// ```
/// # fn main() -> Result<(), dxt_block_codec_api::CodecError> {
/// use dxt_block_codec::Format;
/// use dxt_block_codec_api::{compress, compressed_size, CodecParams};
///
/// let rgba = vec![200u8; 8 * 8 * 4];
/// let mut output = vec![0u8; compressed_size(Format::Bc1, 8, 8)];
/// compress(Format::Bc1, &rgba, 8, 8, CodecParams::default(), &mut output)?;
/// # Ok(())
/// # }
/// ```
pub fn compress(
    format: Format,
    rgba: &[u8],
    width: usize,
    height: usize,
    params: CodecParams,
    output: &mut [u8],
) -> Result<(), CodecError> {
    validate_dimensions(width, height)?;
    validate_pixel_buffer(rgba.len(), width, height)?;

    let needed = compressed_size(format, width, height);
    if output.len() < needed {
        return Err(CodecError::CompressedBufferTooSmall {
            needed,
            actual: output.len(),
        });
    }

    let row_bytes = width.div_ceil(4) * format.block_size();
    let rows = output[..needed].chunks_exact_mut(row_bytes);

    #[cfg(feature = "multithreaded")]
    rows.collect::<Vec<_>>()
        .into_par_iter()
        .enumerate()
        .for_each(|(block_y, row)| {
            compress_block_row(format, rgba, width, height, block_y, params, row);
        });

    #[cfg(not(feature = "multithreaded"))]
    for (block_y, row) in rows.enumerate() {
        compress_block_row(format, rgba, width, height, block_y, params, row);
    }

    Ok(())
}

fn decompress_block_row(
    format: Format,
    compressed_row: &[u8],
    width: usize,
    pixel_rows: &mut [u8],
) {
    let block_size = format.block_size();
    let valid_rows = pixel_rows.len() / (width * 4);
    for (block_x, block) in compressed_row.chunks_exact(block_size).enumerate() {
        let pixels = format.decompress_block(block);
        for py in 0..valid_rows {
            for px in 0..4 {
                let x = block_x * 4 + px;
                if x >= width {
                    break;
                }
                let offset = (py * width + x) * 4;
                pixel_rows[offset..offset + 4].copy_from_slice(&pixels[py * 4 + px]);
            }
        }
    }
}

/// Decompresses a row-major block payload back into an RGBA image.
///
/// The mirror of [`compress`]; padding slots of edge tiles are
/// discarded.
///
/// # Errors
///
/// - [`CodecError::InvalidDimensions`] if either dimension is zero or
///   the image byte size overflows `usize`
/// - [`CodecError::CompressedBufferTooSmall`] if `data` holds fewer
///   than [`compressed_size`] bytes
/// - [`CodecError::InvalidPixelBufferLength`] if `output` does not hold
///   exactly `width * height * 4` bytes
pub fn decompress(
    format: Format,
    data: &[u8],
    width: usize,
    height: usize,
    output: &mut [u8],
) -> Result<(), CodecError> {
    validate_dimensions(width, height)?;
    validate_pixel_buffer(output.len(), width, height)?;

    let needed = compressed_size(format, width, height);
    if data.len() < needed {
        return Err(CodecError::CompressedBufferTooSmall {
            needed,
            actual: data.len(),
        });
    }

    let row_bytes = width.div_ceil(4) * format.block_size();
    // One chunk of compressed blocks per chunk of up to 4 pixel rows.
    let compressed_rows = data[..needed].chunks_exact(row_bytes);
    let pixel_chunks = output.chunks_mut(width * 4 * 4);

    #[cfg(feature = "multithreaded")]
    compressed_rows
        .zip(pixel_chunks)
        .collect::<Vec<_>>()
        .into_par_iter()
        .for_each(|(compressed_row, pixel_rows)| {
            decompress_block_row(format, compressed_row, width, pixel_rows);
        });

    #[cfg(not(feature = "multithreaded"))]
    for (compressed_row, pixel_rows) in compressed_rows.zip(pixel_chunks) {
        decompress_block_row(format, compressed_row, width, pixel_rows);
    }

    Ok(())
}
