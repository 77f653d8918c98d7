use crate::error::CliError;
use argh::FromArgs;
use bytesize::ByteSize;
use dxt_block_codec_api::decompress;
use std::{fs, path::PathBuf, time::Instant};

#[derive(FromArgs, Debug)]
/// Decompress a BC1/BC2/BC3 block payload back into raw RGBA
#[argh(subcommand, name = "decompress")]
pub struct DecompressCmd {
    /// input block payload file path
    #[argh(option)]
    pub input: PathBuf,

    /// output raw RGBA file path
    #[argh(option)]
    pub output: PathBuf,

    /// image width in pixels
    #[argh(option)]
    pub width: usize,

    /// image height in pixels
    #[argh(option)]
    pub height: usize,

    /// source format (bc1, bc2, bc3)
    #[argh(option)]
    pub format: crate::FormatArg,
}

pub fn handle_decompress_command(cmd: DecompressCmd) -> Result<(), CliError> {
    let format = cmd.format.into();

    let data = fs::read(&cmd.input)?;
    let mut rgba = vec![0u8; cmd.width * cmd.height * 4];

    let start = Instant::now();
    decompress(format, &data, cmd.width, cmd.height, &mut rgba)?;
    let elapsed = start.elapsed();

    fs::write(&cmd.output, &rgba)?;

    println!(
        "Decompressed {} -> {} ({format:?}) in {elapsed:.2?}",
        ByteSize(data.len() as u64),
        ByteSize(rgba.len() as u64),
    );
    Ok(())
}
