pub mod compress;
pub mod decompress;
