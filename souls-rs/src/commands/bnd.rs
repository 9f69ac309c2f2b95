//! BND4 archive command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use souls_bnd::{BinderFile, Bnd4};
use souls_dcx::NoCodec;

use crate::utils::{
    add_table_row, create_table, format_len, read_unwrapped, sanitize_file_name, write_file,
};

#[derive(Subcommand)]
pub enum BndCommands {
    /// List the files in an archive
    List {
        /// Path to the archive, optionally compressed
        file: PathBuf,

        /// Only list files whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show archive header fields
    Info {
        /// Path to the archive, optionally compressed
        file: PathBuf,
    },

    /// Extract files from an archive
    Extract {
        /// Path to the archive, optionally compressed
        file: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Only extract files whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },
}

pub fn execute(command: BndCommands) -> Result<()> {
    match command {
        BndCommands::List { file, filter } => list_archive(&file, filter.as_deref()),
        BndCommands::Info { file } => show_info(&file),
        BndCommands::Extract {
            file,
            output,
            filter,
        } => extract_files(&file, &output, filter.as_deref()),
    }
}

fn open_archive(path: &Path) -> Result<Bnd4> {
    let (data, compression) = read_unwrapped(path)?;
    if let Some(kind) = compression {
        log::debug!("{} is wrapped in {kind}", path.display());
    }
    Bnd4::read(&data, &NoCodec).with_context(|| format!("Failed to read archive {}", path.display()))
}

fn matches_filter(file: &BinderFile, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(pattern) => file
            .file_name()
            .is_some_and(|name| name.to_lowercase().contains(&pattern.to_lowercase())),
    }
}

/// Name to extract an entry under
fn output_name(index: usize, file: &BinderFile) -> String {
    match file.file_name() {
        Some(name) => sanitize_file_name(name),
        None => format!("{index:04}.bin"),
    }
}

fn list_archive(path: &Path, filter: Option<&str>) -> Result<()> {
    let archive = open_archive(path)?;

    let mut table = create_table(&["ID", "Name", "Size", "Compression", "Flags"]);
    let mut shown = 0;
    for file in archive.files.iter().filter(|f| matches_filter(f, filter)) {
        shown += 1;
        add_table_row(
            &mut table,
            vec![
                file.id.to_string(),
                file.name.clone().unwrap_or_default(),
                format_len(file.data.len()),
                file.compression
                    .map_or_else(|| "-".to_string(), |kind| kind.to_string()),
                format!("{:#04x}", file.flags.bits()),
            ],
        );
    }

    if shown == 0 {
        println!("No files found");
        return Ok(());
    }
    table.printstd();

    Ok(())
}

fn show_info(path: &Path) -> Result<()> {
    let archive = open_archive(path)?;
    let header = &archive.header;

    println!("File: {}", path.display());
    println!("Version: {}", header.version);
    println!("Files: {}", archive.len());
    println!("Big endian: {}", header.big_endian);
    println!("Bit big endian: {}", header.bit_big_endian);
    println!("Unicode names: {}", header.unicode);
    println!("Format: {:?}", header.format);
    println!("Extended: {:#04x}", header.extended);
    println!("File header size: {:#x}", header.file_header_size);
    if let Some(offset) = header.hash_table_offset {
        println!("Hash table offset: {offset:#x}");
    }

    Ok(())
}

fn extract_files(path: &Path, output_dir: &Path, filter: Option<&str>) -> Result<()> {
    let archive = open_archive(path)?;

    let mut extracted = 0;
    for (index, file) in archive.files.iter().enumerate() {
        if !matches_filter(file, filter) {
            continue;
        }
        let target = output_dir.join(output_name(index, file));
        write_file(&target, &file.data)?;
        log::info!("Extracted {}", target.display());
        extracted += 1;
    }

    println!("Extracted {extracted} files to {}", output_dir.display());
    Ok(())
}
