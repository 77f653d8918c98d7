//! Single-colour lookup tables.
//!
//! For every possible 8-bit channel value these tables store the best
//! quantized endpoint pair whose interpolated middle palette entry
//! reproduces that value, together with the reproduction error. One table
//! per channel depth (5-bit for red/blue, 6-bit for green) and per
//! interpolation orientation (four-colour thirds, three-colour halves).
//!
//! The tables are generated on first use from the same integer
//! interpolation formulas the decoder applies, so table and decoder can
//! never disagree.

use std::sync::LazyLock;

use crate::math::Vec3;

/// Interpolation orientation of the encoded block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PaletteMode {
    /// `c0 <= c1`: middle entry is `(c0 + c1) / 2`.
    Three,
    /// `c0 > c1`: entry 2 is `(2*c0 + c1) / 3`.
    Four,
}

/// Best endpoint pair for one exact 8-bit channel value.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SourceBlock {
    /// Quantized start endpoint, 5 or 6 bits.
    pub start: u8,
    /// Quantized end endpoint, 5 or 6 bits.
    pub end: u8,
    /// Absolute error of the reproduced value.
    pub error: u8,
}

fn expand(value: u16, bits: u32) -> u16 {
    match bits {
        5 => (value << 3) | (value >> 2),
        6 => (value << 2) | (value >> 4),
        _ => unreachable!("only 5- and 6-bit channels exist in 5:6:5"),
    }
}

fn build_table(bits: u32, mode: PaletteMode) -> [SourceBlock; 256] {
    let levels = 1u16 << bits;
    let mut table = [SourceBlock::default(); 256];

    for (value, entry) in table.iter_mut().enumerate() {
        let mut best = SourceBlock {
            start: 0,
            end: 0,
            error: u8::MAX,
        };
        for start in 0..levels {
            for end in 0..levels {
                let s = expand(start, bits);
                let e = expand(end, bits);
                let middle = match mode {
                    PaletteMode::Three => (s + e) / 2,
                    PaletteMode::Four => (2 * s + e) / 3,
                };
                let error = (middle as i16 - value as i16).unsigned_abs() as u8;
                if error < best.error {
                    best = SourceBlock {
                        start: start as u8,
                        end: end as u8,
                        error,
                    };
                }
            }
        }
        *entry = best;
    }

    table
}

static LOOKUP_5_3: LazyLock<[SourceBlock; 256]> = LazyLock::new(|| build_table(5, PaletteMode::Three));
static LOOKUP_6_3: LazyLock<[SourceBlock; 256]> = LazyLock::new(|| build_table(6, PaletteMode::Three));
static LOOKUP_5_4: LazyLock<[SourceBlock; 256]> = LazyLock::new(|| build_table(5, PaletteMode::Four));
static LOOKUP_6_4: LazyLock<[SourceBlock; 256]> = LazyLock::new(|| build_table(6, PaletteMode::Four));

/// Looks up the best endpoints for an exact 8-bit colour in the given
/// orientation.
///
/// Returns `(start, end, error)` where the endpoints are in normalized
/// [0,1] space ready for block serialization and `error` is the summed
/// per-channel squared reproduction error. Deterministic, branch-free in
/// the algorithmic sense: a straight lookup, no search.
pub(crate) fn compute_end_points(colour: [u8; 3], mode: PaletteMode) -> (Vec3, Vec3, u32) {
    let (depth5, depth6): (&[SourceBlock; 256], &[SourceBlock; 256]) = match mode {
        PaletteMode::Three => (&LOOKUP_5_3, &LOOKUP_6_3),
        PaletteMode::Four => (&LOOKUP_5_4, &LOOKUP_6_4),
    };

    let red = depth5[colour[0] as usize];
    let green = depth6[colour[1] as usize];
    let blue = depth5[colour[2] as usize];

    let error = (red.error as u32).pow(2) + (green.error as u32).pow(2) + (blue.error as u32).pow(2);
    let start = Vec3::new(
        red.start as f32 / 31.0,
        green.start as f32 / 63.0,
        blue.start as f32 / 31.0,
    );
    let end = Vec3::new(
        red.end as f32 / 31.0,
        green.end as f32 / 63.0,
        blue.end as f32 / 31.0,
    );
    (start, end, error)
}
