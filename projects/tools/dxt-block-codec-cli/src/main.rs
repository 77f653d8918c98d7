mod commands;
mod error;

use argh::FromArgs;
use core::error::Error;
use dxt_block_codec_api::{Algorithm, Format};
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
pub enum FormatArg {
    Bc1,
    Bc2,
    Bc3,
}

// Implement FromStr to allow parsing from command line arguments
impl FromStr for FormatArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bc1" | "dxt1" => Ok(FormatArg::Bc1),
            "bc2" | "dxt3" => Ok(FormatArg::Bc2),
            "bc3" | "dxt5" => Ok(FormatArg::Bc3),
            _ => Err(format!(
                "Invalid format: {s}. Valid formats are: bc1, bc2, bc3"
            )),
        }
    }
}

impl From<FormatArg> for Format {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Bc1 => Format::Bc1,
            FormatArg::Bc2 => Format::Bc2,
            FormatArg::Bc3 => Format::Bc3,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum AlgorithmArg {
    Range,
    Cluster,
    Iterative,
}

impl FromStr for AlgorithmArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "range" => Ok(AlgorithmArg::Range),
            "cluster" => Ok(AlgorithmArg::Cluster),
            "iterative" => Ok(AlgorithmArg::Iterative),
            _ => Err(format!(
                "Invalid algorithm: {s}. Valid algorithms are: range, cluster, iterative"
            )),
        }
    }
}

impl From<AlgorithmArg> for Algorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::Range => Algorithm::RangeFit,
            AlgorithmArg::Cluster => Algorithm::ClusterFit,
            AlgorithmArg::Iterative => Algorithm::IterativeClusterFit,
        }
    }
}

#[derive(FromArgs, Debug)]
/// Block compression tool for raw RGBA image files
struct TopLevel {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Compress(commands::compress::CompressCmd),
    Decompress(commands::decompress::DecompressCmd),
}


fn main() -> Result<(), Box<dyn Error>> {
    let cli: TopLevel = argh::from_env();

    match cli.command {
        Commands::Compress(cmd) => {
            commands::compress::handle_compress_command(cmd)?;
        }
        Commands::Decompress(cmd) => {
            commands::decompress::handle_decompress_command(cmd)?;
        }
    }

    Ok(())
}
