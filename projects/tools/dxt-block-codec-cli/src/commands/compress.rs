use crate::error::CliError;
use argh::FromArgs;
use bytesize::ByteSize;
use dxt_block_codec_api::{compress, compressed_size, CodecParams};
use std::{fs, path::PathBuf, time::Instant};

#[derive(FromArgs, Debug)]
/// Compress a raw RGBA image file into BC1/BC2/BC3 blocks
#[argh(subcommand, name = "compress")]
pub struct CompressCmd {
    /// input raw RGBA file path (width * height * 4 bytes)
    #[argh(option)]
    pub input: PathBuf,

    /// output block payload file path
    #[argh(option)]
    pub output: PathBuf,

    /// image width in pixels
    #[argh(option)]
    pub width: usize,

    /// image height in pixels
    #[argh(option)]
    pub height: usize,

    /// target format (bc1, bc2, bc3)
    #[argh(option)]
    pub format: crate::FormatArg,

    /// colour fitter (range, cluster, iterative) [default: cluster]
    #[argh(option)]
    pub algorithm: Option<crate::AlgorithmArg>,

    /// weight colours by their alpha during fitting
    #[argh(switch)]
    pub weigh_alpha: bool,
}

pub fn handle_compress_command(cmd: CompressCmd) -> Result<(), CliError> {
    let format = cmd.format.into();
    let mut params = CodecParams::new().with_weigh_colour_by_alpha(cmd.weigh_alpha);
    if let Some(algorithm) = cmd.algorithm {
        params = params.with_algorithm(algorithm.into());
    }

    let rgba = fs::read(&cmd.input)?;
    let mut output = vec![0u8; compressed_size(format, cmd.width, cmd.height)];

    let start = Instant::now();
    compress(format, &rgba, cmd.width, cmd.height, params, &mut output)?;
    let elapsed = start.elapsed();

    fs::write(&cmd.output, &output)?;

    println!(
        "Compressed {} -> {} ({format:?}) in {elapsed:.2?}",
        ByteSize(rgba.len() as u64),
        ByteSize(output.len() as u64),
    );
    Ok(())
}
