//! STL reading and writing.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use gradcomp_math::Point3;
use tracing::{debug, info, warn};

use crate::error::{MeshError, Result};
use crate::{Mesh, Triangle};

/// Load a mesh from an STL file (binary or ASCII).
///
/// Degenerate faces (repeated vertex indices) are dropped. A file with no
/// usable triangles is an error.
pub fn load_stl(path: &Path) -> Result<Mesh> {
    let file = File::open(path).map_err(|e| MeshError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = BufReader::new(file);

    let stl = stl_io::read_stl(&mut reader).map_err(|e| MeshError::Parse {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    debug!(
        "STL contains {} vertices, {} triangles",
        stl.vertices.len(),
        stl.faces.len()
    );

    let points: Vec<Point3> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v.0[0] as f64, v.0[1] as f64, v.0[2] as f64))
        .collect();

    let mut mesh = Mesh::new();
    let mut skipped = 0usize;
    for face in &stl.faces {
        let [i0, i1, i2] = face.vertices;
        if i0 == i1 || i1 == i2 || i0 == i2 {
            skipped += 1;
            continue;
        }
        mesh.push(Triangle::new(points[i0], points[i1], points[i2]));
    }
    if skipped > 0 {
        warn!("{}: skipped {} degenerate triangles", path.display(), skipped);
    }

    if mesh.is_empty() {
        return Err(MeshError::EmptyMesh(path.display().to_string()));
    }

    let size = mesh.bounds().size();
    info!(
        "Loaded {} ({} triangles, {:.3} x {:.3} x {:.3})",
        path.display(),
        mesh.len(),
        size.x,
        size.y,
        size.z
    );

    Ok(mesh)
}

/// Save a mesh as binary STL.
pub fn save_stl(mesh: &Mesh, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| MeshError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    let vertex = |p: &Point3| stl_io::Vertex::new([p.x as f32, p.y as f32, p.z as f32]);
    let triangles: Vec<stl_io::Triangle> = mesh
        .triangles()
        .iter()
        .map(|t| {
            let n = t.normal();
            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    vertex(&t.vertices[0]),
                    vertex(&t.vertices[1]),
                    vertex(&t.vertices[2]),
                ],
            }
        })
        .collect();

    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!("Saved {} triangles to {}", mesh.len(), path.display());
    Ok(())
}
