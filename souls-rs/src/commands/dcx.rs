//! DCX and DCP container command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use souls_dcx::NoCodec;

use crate::utils::{decompressed_path, format_compression_ratio, format_len, read_file, write_file};

#[derive(Subcommand)]
pub enum DcxCommands {
    /// Show the container type and sizes of a compressed file
    Info {
        /// Path to the compressed file
        file: PathBuf,
    },

    /// Decompress a file
    Decompress {
        /// Path to the compressed file
        input: PathBuf,

        /// Output path (defaults to the input without its .dcx extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn execute(command: DcxCommands) -> Result<()> {
    match command {
        DcxCommands::Info { file } => show_info(&file),
        DcxCommands::Decompress { input, output } => decompress_file(&input, output),
    }
}

fn show_info(path: &Path) -> Result<()> {
    let data = read_file(path)?;
    let info = souls_dcx::inspect(&data).with_context(|| format!("Failed to inspect {}", path.display()))?;

    println!("File: {}", path.display());
    println!("Type: {}", info.kind);
    println!("File size: {}", format_len(data.len()));
    println!("Compressed payload: {}", format_len(info.compressed_len));
    match info.uncompressed_len {
        Some(len) => {
            println!("Uncompressed size: {}", format_len(len));
            println!(
                "Ratio: {}",
                format_compression_ratio(len as u64, info.compressed_len as u64)
            );
        }
        None => println!("Uncompressed size: unknown"),
    }

    Ok(())
}

fn decompress_file(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let data = read_file(input)?;
    let unpacked =
        souls_dcx::decompress(&data, &NoCodec).with_context(|| format!("Failed to decompress {}", input.display()))?;
    let output = output.unwrap_or_else(|| decompressed_path(input));

    write_file(&output, &unpacked.data)?;
    log::info!("Decompressed {} as {}", input.display(), unpacked.kind);
    println!(
        "Wrote {} ({}) to {}",
        format_len(unpacked.data.len()),
        unpacked.kind,
        output.display()
    );

    Ok(())
}
