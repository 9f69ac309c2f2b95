//! TPF texture container command implementations

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Subcommand;
use souls_tpf::{Tpf, TpfTexture};

use crate::utils::{add_table_row, create_table, format_len, load_assets, sanitize_file_name, write_file};

#[derive(Subcommand)]
pub enum TpfCommands {
    /// List the textures in a file
    Info {
        /// Path to a TPF, or an archive containing TPFs
        file: PathBuf,
    },

    /// Extract textures as DDS files
    Extract {
        /// Path to a TPF, or an archive containing TPFs
        file: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

pub fn execute(command: TpfCommands) -> Result<()> {
    match command {
        TpfCommands::Info { file } => show_info(&file),
        TpfCommands::Extract { file, output } => extract_textures(&file, &output),
    }
}

/// Every texture container in `path`, with its display path
fn load_containers(path: &Path) -> Result<Vec<(String, Tpf)>> {
    let containers: Vec<(String, Tpf)> = load_assets(path)?
        .into_iter()
        .filter_map(|asset| {
            let name = asset.display_path();
            match asset.data {
                souls_rs::AssetData::Textures(tpf) => Some((name, tpf)),
                _ => None,
            }
        })
        .collect();

    if containers.is_empty() {
        bail!("No TPF containers found in {}", path.display());
    }
    Ok(containers)
}

/// Width, height and pixel format, from the DDS header when there is one
fn describe(texture: &TpfTexture) -> Result<(String, String)> {
    if let Some(dds) = texture.dds_header()? {
        return Ok((format!("{}x{}", dds.width, dds.height), dds.format_name()));
    }
    let size = texture
        .header
        .map_or_else(|| "?".to_string(), |h| format!("{}x{}", h.width, h.height));
    Ok((size, format!("format {}", texture.format)))
}

fn show_info(path: &Path) -> Result<()> {
    for (name, tpf) in load_containers(path)? {
        println!("=== {name} ===");
        println!("Platform: {:?}", tpf.platform);
        println!("Textures: {}", tpf.textures.len());

        let mut table = create_table(&["Name", "Type", "Size", "Dimensions", "Mipmaps", "Format"]);
        for texture in &tpf.textures {
            let (dimensions, format) = describe(texture)?;
            add_table_row(
                &mut table,
                vec![
                    texture.name.clone(),
                    format!("{:?}", texture.tex_type),
                    format_len(texture.bytes.len()),
                    dimensions,
                    texture.mipmaps.to_string(),
                    format,
                ],
            );
        }
        table.printstd();
        println!();
    }

    Ok(())
}

fn extract_textures(path: &Path, output_dir: &Path) -> Result<()> {
    let mut extracted = 0;
    for (_, tpf) in load_containers(path)? {
        for texture in &tpf.textures {
            let extension = if texture.dds_header()?.is_some() { "dds" } else { "bin" };
            let target = output_dir.join(format!("{}.{extension}", sanitize_file_name(&texture.name)));
            write_file(&target, &texture.bytes)?;
            log::info!("Extracted {}", target.display());
            extracted += 1;
        }
    }

    println!("Extracted {extracted} textures to {}", output_dir.display());
    Ok(())
}
