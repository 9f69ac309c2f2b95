//! File access shared by the commands

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use souls_dcx::{CompressionType, NoCodec};
use souls_rs::{Asset, load_named};

/// Read a whole file
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Read a file and strip any compression wrapper
pub fn read_unwrapped(path: &Path) -> Result<(Vec<u8>, Option<CompressionType>)> {
    let data = read_file(path)?;
    if !souls_dcx::is_compressed(&data) {
        return Ok((data, None));
    }
    let unpacked = souls_dcx::decompress(&data, &NoCodec)
        .with_context(|| format!("Failed to decompress {}", path.display()))?;
    Ok((unpacked.data, Some(unpacked.kind)))
}

/// Read a file and decode every asset inside it
pub fn load_assets(path: &Path) -> Result<Vec<Asset>> {
    let data = read_file(path)?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    load_named(&name, &data, &NoCodec).with_context(|| format!("Failed to load {}", path.display()))
}

/// Write a file, creating its parent directories
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

/// Reduce an archive entry name to a single safe path component
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['\\', '/']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_control() || ":*?\"<>|".contains(c) { '_' } else { c })
        .collect();
    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}

/// Default output path: the input with its `.dcx` suffix removed, or `.out` appended
pub fn decompressed_path(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("dcx") => input.with_extension(""),
        _ => {
            let mut name = input.as_os_str().to_owned();
            name.push(".out");
            PathBuf::from(name)
        }
    }
}
