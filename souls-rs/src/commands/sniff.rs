//! Identify files by their leading bytes

use std::path::PathBuf;

use anyhow::Result;
use souls_rs::sniff;

use crate::utils::{add_table_row, create_table, format_len, load_assets, read_file};

pub fn execute(files: &[PathBuf], deep: bool) -> Result<()> {
    if deep {
        return list_assets(files);
    }

    let mut table = create_table(&["File", "Kind", "Size"]);
    for path in files {
        let data = read_file(path)?;
        add_table_row(
            &mut table,
            vec![
                path.display().to_string(),
                sniff(&data).to_string(),
                format_len(data.len()),
            ],
        );
    }
    table.printstd();

    Ok(())
}

fn list_assets(files: &[PathBuf]) -> Result<()> {
    let mut table = create_table(&["Asset", "Kind", "Compression"]);
    for path in files {
        for asset in load_assets(path)? {
            add_table_row(
                &mut table,
                vec![
                    asset.display_path(),
                    asset.kind().to_string(),
                    asset
                        .compression
                        .map_or_else(|| "-".to_string(), |kind| kind.to_string()),
                ],
            );
        }
    }
    table.printstd();

    Ok(())
}
