//! OBJ + MTL archives with one material per color.

use std::collections::HashMap;
use std::fmt;
use std::io::{Cursor, Write};
use std::path::Path;

use gradcomp_math::{Color, Point3};
use gradcomp_mesh::Mesh;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{ExportError, Result};

/// Name of the geometry entry inside the archive.
pub const OBJ_ENTRY: &str = "object.obj";

/// Name of the material library entry inside the archive.
pub const MTL_ENTRY: &str = "material.mtl";

/// A mesh split into per-color face groups over a shared vertex list.
#[derive(Debug, Clone)]
pub struct MaterialObj {
    vertices: Vec<Point3>,
    /// 8-bit color and the faces (zero-based vertex indices) using it, in
    /// order of first appearance.
    materials: Vec<([u8; 3], Vec<[usize; 3]>)>,
}

impl MaterialObj {
    /// Group `mesh` by `colors` (one per triangle). Identical vertex
    /// positions are merged and colors are quantized to 8 bits per channel.
    pub fn new(mesh: &Mesh, colors: &[Color]) -> Result<Self> {
        if colors.len() != mesh.len() {
            return Err(ExportError::ColorCountMismatch {
                triangles: mesh.len(),
                colors: colors.len(),
            });
        }

        let mut vertex_ids: HashMap<[u64; 3], usize> = HashMap::new();
        let mut vertices = Vec::new();
        let mut material_ids: HashMap<[u8; 3], usize> = HashMap::new();
        let mut materials: Vec<([u8; 3], Vec<[usize; 3]>)> = Vec::new();

        for (tri, color) in mesh.triangles().iter().zip(colors) {
            let face = tri.vertices.map(|p| {
                *vertex_ids.entry(position_key(&p)).or_insert_with(|| {
                    vertices.push(p);
                    vertices.len() - 1
                })
            });
            let rgb = color.to_rgb8();
            let slot = *material_ids.entry(rgb).or_insert_with(|| {
                materials.push((rgb, Vec::new()));
                materials.len() - 1
            });
            materials[slot].1.push(face);
        }

        debug!(
            "Grouped {} triangles into {} materials over {} vertices",
            mesh.len(),
            materials.len(),
            vertices.len()
        );

        Ok(Self {
            vertices,
            materials,
        })
    }

    /// Number of distinct vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of distinct materials.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Contents of the OBJ file.
    pub fn obj_text(&self) -> String {
        ObjFile(self).to_string()
    }

    /// Contents of the MTL file.
    pub fn mtl_text(&self) -> String {
        MtlFile(self).to_string()
    }

    /// Zip archive holding the OBJ and MTL files.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .compression_level(Some(6));

        let entries: [(&str, &dyn fmt::Display); 2] =
            [(OBJ_ENTRY, &ObjFile(self)), (MTL_ENTRY, &MtlFile(self))];
        for (name, contents) in entries {
            zip.start_file(name, options)
                .map_err(|e| ExportError::Archive(e.to_string()))?;
            write!(zip, "{}", contents).map_err(|e| ExportError::Archive(e.to_string()))?;
        }

        zip.finish()
            .map_err(|e| ExportError::Archive(e.to_string()))?;

        Ok(buffer.into_inner())
    }
}

/// Write `mesh` with per-triangle `colors` as a zipped OBJ + MTL pair.
pub fn save_material_obj(path: &Path, mesh: &Mesh, colors: &[Color]) -> Result<()> {
    let obj = MaterialObj::new(mesh, colors)?;
    let bytes = obj.to_bytes()?;
    std::fs::write(path, &bytes).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(
        "Saved {} ({} vertices, {} materials, {} bytes)",
        path.display(),
        obj.vertex_count(),
        obj.material_count(),
        bytes.len()
    );
    Ok(())
}

/// OBJ text of a [`MaterialObj`].
struct ObjFile<'a>(&'a MaterialObj);

impl fmt::Display for ObjFile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mtllib {}", MTL_ENTRY)?;
        for v in &self.0.vertices {
            writeln!(f, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for (idx, (_, faces)) in self.0.materials.iter().enumerate() {
            writeln!(f, "usemtl {}", material_name(idx))?;
            for [a, b, c] in faces {
                writeln!(f, "f {} {} {}", a + 1, b + 1, c + 1)?;
            }
        }
        Ok(())
    }
}

/// MTL text of a [`MaterialObj`].
struct MtlFile<'a>(&'a MaterialObj);

impl fmt::Display for MtlFile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (rgb, _)) in self.0.materials.iter().enumerate() {
            let [r, g, b] = rgb.map(|c| c as f64 / 255.0);
            writeln!(f, "newmtl {}", material_name(idx))?;
            writeln!(f, "Kd {:.6} {:.6} {:.6}", r, g, b)?;
        }
        Ok(())
    }
}

fn material_name(idx: usize) -> String {
    format!("material{}", idx)
}

fn position_key(p: &Point3) -> [u64; 3] {
    let bits = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
    [bits(p.x), bits(p.y), bits(p.z)]
}
