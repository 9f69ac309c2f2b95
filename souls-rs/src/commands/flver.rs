//! FLVER model command implementations

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Subcommand;
use souls_flver::{Flver, HostMesh, HostMeshOptions};

use crate::utils::{
    NodeType, TreeNode, TreeOptions, add_table_row, create_table, format_vec3, load_assets,
    render_tree, write_file,
};

#[derive(Subcommand)]
pub enum FlverCommands {
    /// Display information about the models in a file
    Info {
        /// Path to a model, or an archive containing models
        file: PathBuf,

        /// Print the decoded models as JSON (requires the `serde` feature)
        #[arg(long)]
        json: bool,
    },

    /// Show the bone hierarchy
    Tree {
        /// Path to a model, or an archive containing models
        file: PathBuf,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Export geometry as Wavefront OBJ
    ExportObj {
        /// Path to a model, or an archive containing models
        file: PathBuf,

        /// Output OBJ file
        output: PathBuf,

        /// UV channel to export
        #[arg(long, default_value = "0")]
        uv_channel: usize,

        /// Face set to export from each mesh
        #[arg(long, default_value = "0")]
        face_set: usize,

        /// Keep zero-area triangles
        #[arg(long)]
        include_degenerate: bool,
    },
}

pub fn execute(command: FlverCommands) -> Result<()> {
    match command {
        FlverCommands::Info { file, json } => {
            if json {
                print_json(&file)
            } else {
                show_info(&file)
            }
        }
        FlverCommands::Tree {
            file,
            depth,
            no_color,
        } => show_tree(&file, depth, no_color),
        FlverCommands::ExportObj {
            file,
            output,
            uv_channel,
            face_set,
            include_degenerate,
        } => export_obj(
            &file,
            &output,
            &HostMeshOptions {
                uv_channel,
                face_set,
                include_degenerate_faces: include_degenerate,
            },
        ),
    }
}

/// Every model in `path`, with its display path
fn load_models(path: &Path) -> Result<Vec<(String, Flver)>> {
    let models: Vec<(String, Flver)> = load_assets(path)?
        .into_iter()
        .filter_map(|asset| {
            let name = asset.display_path();
            match asset.data {
                souls_rs::AssetData::Model(model) => Some((name, *model)),
                _ => None,
            }
        })
        .collect();

    if models.is_empty() {
        bail!("No FLVER models found in {}", path.display());
    }
    Ok(models)
}

fn show_info(path: &Path) -> Result<()> {
    for (name, model) in load_models(path)? {
        let header = &model.header;
        println!("=== {name} ===");
        println!("Version: {:#07x}", header.version);
        println!("Big endian: {}", header.big_endian);
        println!("Unicode: {}", header.unicode);
        println!("Index size: {} bits", header.vertex_index_size);
        println!(
            "Bounds: {} .. {}",
            format_vec3(header.bounding_box_min),
            format_vec3(header.bounding_box_max)
        );
        println!(
            "Dummies: {}, bones: {}, layouts: {}, GX lists: {}",
            model.dummies.len(),
            model.bones.len(),
            model.buffer_layouts.len(),
            model.gx_lists.len()
        );
        println!("Vertices: {}", model.vertex_count());

        println!("\nMaterials:");
        let mut table = create_table(&["#", "Name", "MTD", "Textures"]);
        for (i, material) in model.materials.iter().enumerate() {
            let textures: Vec<&str> = material.textures.iter().map(|t| t.path.as_str()).collect();
            add_table_row(
                &mut table,
                vec![
                    i.to_string(),
                    material.name.clone(),
                    material.mtd.clone(),
                    textures.join(", "),
                ],
            );
        }
        table.printstd();

        println!("\nMeshes:");
        let mut table = create_table(&["#", "Material", "Vertices", "Face sets", "Buffers", "Bones"]);
        for (i, mesh) in model.meshes.iter().enumerate() {
            add_table_row(
                &mut table,
                vec![
                    i.to_string(),
                    mesh.material(&model.materials)
                        .map_or_else(|| "-".to_string(), |m| m.name.clone()),
                    mesh.vertices.len().to_string(),
                    mesh.face_sets.len().to_string(),
                    mesh.vertex_buffers.len().to_string(),
                    mesh.bone_indices.len().to_string(),
                ],
            );
        }
        table.printstd();
        println!();
    }

    Ok(())
}

#[cfg(feature = "serde")]
fn print_json(path: &Path) -> Result<()> {
    let models: Vec<Flver> = load_models(path)?.into_iter().map(|(_, model)| model).collect();
    println!("{}", serde_json::to_string_pretty(&models)?);
    Ok(())
}

#[cfg(not(feature = "serde"))]
fn print_json(_path: &Path) -> Result<()> {
    bail!("JSON output requires souls-rs to be built with the `serde` feature")
}

fn bone_node(model: &Flver, bone: usize, visited: &mut [bool]) -> TreeNode {
    visited[bone] = true;
    let mut node = TreeNode::new(model.bones[bone].name.clone(), NodeType::Bone)
        .with_metadata("translation", format_vec3(model.bones[bone].translation));
    // Child links can loop in damaged files
    for child in model.bone_children(bone) {
        if !visited[child] {
            node = node.add_child(bone_node(model, child, visited));
        }
    }
    node
}

fn show_tree(path: &Path, depth: Option<usize>, no_color: bool) -> Result<()> {
    let options = TreeOptions {
        max_depth: depth,
        no_color,
        show_metadata: false,
    };

    for (name, model) in load_models(path)? {
        let mut root = TreeNode::new(name, NodeType::Root);

        let mut skeleton = TreeNode::new("Bones", NodeType::Header);
        let mut visited = vec![false; model.bones.len()];
        for bone in model.root_bones() {
            if !visited[bone] {
                skeleton = skeleton.add_child(bone_node(&model, bone, &mut visited));
            }
        }
        root = root.add_child(skeleton);

        let mut materials = TreeNode::new("Materials", NodeType::Header);
        for material in &model.materials {
            let mut node = TreeNode::new(material.name.clone(), NodeType::Material);
            for texture in &material.textures {
                node = node.add_child(TreeNode::new(
                    format!("{}: {}", texture.texture_type, texture.path),
                    NodeType::Texture,
                ));
            }
            materials = materials.add_child(node);
        }
        root = root.add_child(materials);

        let mut meshes = TreeNode::new("Meshes", NodeType::Header);
        for (i, mesh) in model.meshes.iter().enumerate() {
            meshes = meshes.add_child(
                TreeNode::new(format!("mesh_{i}"), NodeType::Mesh).with_size(mesh.vertices.len()),
            );
        }
        root = root.add_child(meshes);

        print!("{}", render_tree(&root, &options));
    }

    Ok(())
}

/// Render meshes as one OBJ document, one object per mesh
fn write_obj(meshes: &[HostMesh]) -> String {
    let mut out = String::new();
    let mut base = 1usize;

    for mesh in meshes {
        let _ = writeln!(out, "o {}", mesh.name);
        for p in &mesh.positions {
            let _ = writeln!(out, "v {} {} {}", p.x, p.y, p.z);
        }
        let textured = !mesh.uvs.is_empty() && mesh.uvs.len() == mesh.positions.len();
        if textured {
            // OBJ puts the texture origin at the bottom left
            for uv in &mesh.uvs {
                let _ = writeln!(out, "vt {} {}", uv.x, 1.0 - uv.y);
            }
        }
        for tri in &mesh.triangles {
            let [a, b, c] = tri.map(|i| i as usize + base);
            if textured {
                let _ = writeln!(out, "f {a}/{a} {b}/{b} {c}/{c}");
            } else {
                let _ = writeln!(out, "f {a} {b} {c}");
            }
        }
        base += mesh.positions.len();
    }

    out
}

fn export_obj(path: &Path, output: &Path, options: &HostMeshOptions) -> Result<()> {
    let models = load_models(path)?;
    let prefix = models.len() > 1;

    let mut meshes = Vec::new();
    for (name, model) in &models {
        for mut mesh in model.host_meshes(options) {
            if prefix {
                mesh.name = format!("{name}/{}", mesh.name);
            }
            meshes.push(mesh);
        }
    }

    let triangles: usize = meshes.iter().map(|m| m.triangles.len()).sum();
    write_file(output, write_obj(&meshes).as_bytes())?;
    println!(
        "Exported {} meshes ({triangles} triangles) to {}",
        meshes.len(),
        output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use pretty_assertions::assert_eq;

    fn triangle(name: &str, uvs: bool) -> HostMesh {
        HostMesh {
            name: name.to_string(),
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            uvs: if uvs {
                vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]
            } else {
                Vec::new()
            },
            triangles: vec![[0, 1, 2]],
        }
    }

    #[test]
    fn test_obj_indices_are_offset_per_object() {
        let obj = write_obj(&[triangle("a", false), triangle("b", false)]);
        let faces: Vec<&str> = obj.lines().filter(|l| l.starts_with("f ")).collect();
        assert_eq!(faces, vec!["f 1 2 3", "f 4 5 6"]);
        assert_eq!(obj.lines().filter(|l| l.starts_with("o ")).count(), 2);
    }

    #[test]
    fn test_obj_texture_coordinates() {
        let obj = write_obj(&[triangle("a", true)]);
        let lines: Vec<&str> = obj.lines().collect();
        assert_eq!(
            lines,
            vec![
                "o a",
                "v 0 0 0",
                "v 1 0 0",
                "v 0 1 0",
                "vt 0 1",
                "vt 1 1",
                "vt 0 0",
                "f 1/1 2/2 3/3",
            ]
        );
    }
}
