//! Dual contouring of implicit solids.
//!
//! The solid is sampled on a uniform grid of corners. Every grid edge whose
//! endpoints disagree about containment is a crossing; its surface point is
//! found by bisection. Each cell touching a crossing gets one vertex per
//! surface sheet passing through it, at the mean of that sheet's crossings
//! (clamped to the cell), and each crossing edge emits a quad through the
//! four cells that share it.
//!
//! ```text
//! Cells around an edge along axis a, with (u, v) the next two axes in
//! cyclic order:
//!
//!        v
//!        ^
//!   c01  |  c11        c11 = cell whose min corner is the edge start
//!  ------+------> u    c10 = c11 - v, c01 = c11 - u, c00 = c11 - u - v
//!   c00  |  c10
//!
//! c00 -> c10 -> c11 -> c01 winds counter-clockwise about +a.
//! ```

use std::collections::HashMap;

use gradcomp_math::{Aabb3, Point3, Vec3};
use gradcomp_mesh::{Mesh, Triangle};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{Result, SolidError};
use crate::Solid;

/// Empty cells added on every side of the solid's bounds.
const PADDING_CELLS: usize = 2;

/// Bisection steps per crossing edge.
const BISECTION_STEPS: usize = 8;

/// Refuse grids with more corners than this.
const MAX_CORNERS: usize = 1 << 31;

/// Triangle mesh produced by [`dual_contour`].
#[derive(Debug, Clone, Default)]
pub struct ContourMesh {
    /// Surface triangles, wound outward.
    pub mesh: Mesh,
    /// For each triangle vertex, a grid corner inside the solid near it.
    /// Parallel to `mesh.triangles()`.
    pub interior: Vec<[Point3; 3]>,
}

impl ContourMesh {
    /// Number of triangles.
    pub fn len(&self) -> usize {
        self.mesh.len()
    }

    /// True if no surface was found.
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }

    /// Bounds of the surface.
    pub fn bounds(&self) -> Aabb3 {
        self.mesh.bounds()
    }
}

/// Uniform corner lattice.
#[derive(Debug, Clone, Copy)]
struct Grid {
    origin: Point3,
    step: f64,
    /// Corners per axis.
    dims: [usize; 3],
}

impl Grid {
    fn around(bounds: &Aabb3, step: f64) -> Result<Self> {
        let size = bounds.size();
        let mut dims = [0usize; 3];
        for (axis, dim) in dims.iter_mut().enumerate() {
            let cells = (size[axis] / step).ceil();
            if !cells.is_finite() || cells > MAX_CORNERS as f64 {
                return Err(SolidError::GridTooLarge(usize::MAX));
            }
            *dim = cells.max(0.0) as usize + 2 * PADDING_CELLS + 1;
        }
        let total = dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .unwrap_or(usize::MAX);
        if total > MAX_CORNERS {
            return Err(SolidError::GridTooLarge(total));
        }
        let pad = step * PADDING_CELLS as f64;
        Ok(Self {
            origin: bounds.min - Vec3::new(pad, pad, pad),
            step,
            dims,
        })
    }

    fn corner_count(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    fn index(&self, c: [usize; 3]) -> usize {
        (c[2] * self.dims[1] + c[1]) * self.dims[0] + c[0]
    }

    fn coords(&self, idx: usize) -> [usize; 3] {
        let i = idx % self.dims[0];
        let j = (idx / self.dims[0]) % self.dims[1];
        let k = idx / (self.dims[0] * self.dims[1]);
        [i, j, k]
    }

    fn position(&self, c: [usize; 3]) -> Point3 {
        self.origin
            + Vec3::new(c[0] as f64, c[1] as f64, c[2] as f64) * self.step
    }

    /// Box of the cell whose minimum corner is `c`.
    fn cell_box(&self, c: [usize; 3]) -> Aabb3 {
        let min = self.position(c);
        Aabb3::new(min, min + Vec3::new(self.step, self.step, self.step))
    }
}

/// A grid edge from `corner` to `corner + e_axis` with a containment change.
#[derive(Debug, Clone, Copy)]
struct Crossing {
    corner: [usize; 3],
    axis: usize,
    /// True if `corner` is the inside end.
    start_inside: bool,
}

impl Crossing {
    /// The endpoint inside the solid.
    fn inside_end(&self) -> [usize; 3] {
        let mut end = self.corner;
        if !self.start_inside {
            end[self.axis] += 1;
        }
        end
    }
}

/// Mesh the boundary of `solid` on a grid of spacing `resolution`.
///
/// An empty solid yields an empty mesh.
pub fn dual_contour(solid: &Solid, resolution: f64) -> Result<ContourMesh> {
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(SolidError::InvalidResolution(resolution));
    }
    let bounds = solid.bounds();
    if bounds.is_empty() {
        debug!("Solid has empty bounds, nothing to contour");
        return Ok(ContourMesh::default());
    }

    let grid = Grid::around(&bounds, resolution)?;
    info!(
        "Dual contouring on {}x{}x{} grid (resolution {})",
        grid.dims[0], grid.dims[1], grid.dims[2], resolution
    );

    let inside: Vec<bool> = (0..grid.corner_count())
        .into_par_iter()
        .map(|idx| solid.contains(&grid.position(grid.coords(idx))))
        .collect();

    let crossings = find_crossings(&grid, &inside);
    debug!("Found {} crossing edges", crossings.len());

    let points: Vec<Point3> = crossings
        .par_iter()
        .map(|c| {
            let a = grid.position(c.corner);
            let mut end = c.corner;
            end[c.axis] += 1;
            let b = grid.position(end);
            if c.start_inside {
                bisect(solid, a, b)
            } else {
                bisect(solid, b, a)
            }
        })
        .collect();

    // Crossings touching each cell, in first-touched order, with the cell's
    // position in the crossing's `cells_around` order.
    let mut cell_slot: HashMap<[usize; 3], usize> = HashMap::new();
    let mut cells: Vec<([usize; 3], Vec<(usize, usize)>)> = Vec::new();
    for (k, crossing) in crossings.iter().enumerate() {
        for (j, cell) in cells_around(&grid, crossing).into_iter().enumerate() {
            let Some(cell) = cell else { continue };
            let slot = *cell_slot.entry(cell).or_insert_with(|| {
                cells.push((cell, Vec::new()));
                cells.len() - 1
            });
            cells[slot].1.push((k, j));
        }
    }

    // One mass point per surface sheet of each cell.
    let mut vertices: Vec<(Point3, Point3)> = Vec::with_capacity(cells.len());
    let mut quad_vertices: Vec<[Option<usize>; 4]> = vec![[None; 4]; crossings.len()];
    let mut split_cells = 0usize;
    for (cell, members) in &cells {
        let cell_box = grid.cell_box(*cell);
        let sheets = cell_sheets(*cell, members, &crossings);
        if sheets.len() > 1 {
            split_cells += 1;
        }
        for sheet in sheets {
            let sum = sheet
                .iter()
                .fold(Vec3::zeros(), |acc, &m| acc + points[members[m].0].coords);
            let mean = Point3::from(sum / sheet.len() as f64);
            let vertex = Point3::new(
                mean.x.clamp(cell_box.min.x, cell_box.max.x),
                mean.y.clamp(cell_box.min.y, cell_box.max.y),
                mean.z.clamp(cell_box.min.z, cell_box.max.z),
            );
            let sample = nearest(
                sheet
                    .iter()
                    .map(|&m| grid.position(crossings[members[m].0].inside_end())),
                &vertex,
            );
            let id = vertices.len();
            vertices.push((vertex, sample));
            for &m in &sheet {
                let (k, j) = members[m];
                quad_vertices[k][j] = Some(id);
            }
        }
    }
    if split_cells > 0 {
        debug!("Split {} cells with touching sheets", split_cells);
    }

    let mut triangles = Vec::with_capacity(crossings.len() * 2);
    let mut interior = Vec::with_capacity(crossings.len() * 2);
    for (crossing, around) in crossings.iter().zip(&quad_vertices) {
        let [Some(v00), Some(v10), Some(v11), Some(v01)] = *around else {
            continue;
        };
        let quad = [v00, v10, v11, v01].map(|v| vertices[v]);
        let quad = if crossing.start_inside {
            quad
        } else {
            [quad[0], quad[3], quad[2], quad[1]]
        };
        for [a, b, c] in [[0, 1, 2], [0, 2, 3]] {
            triangles.push(Triangle::new(quad[a].0, quad[b].0, quad[c].0));
            interior.push([quad[a].1, quad[b].1, quad[c].1]);
        }
    }

    info!(
        "Dual contouring produced {} vertices, {} triangles",
        vertices.len(),
        triangles.len()
    );

    Ok(ContourMesh {
        mesh: Mesh::from_triangles(triangles),
        interior,
    })
}

fn find_crossings(grid: &Grid, inside: &[bool]) -> Vec<Crossing> {
    let mut crossings = Vec::new();
    for idx in 0..grid.corner_count() {
        let corner = grid.coords(idx);
        for axis in 0..3 {
            if corner[axis] + 1 >= grid.dims[axis] {
                continue;
            }
            let mut next = corner;
            next[axis] += 1;
            let start_inside = inside[idx];
            if start_inside != inside[grid.index(next)] {
                crossings.push(Crossing {
                    corner,
                    axis,
                    start_inside,
                });
            }
        }
    }
    crossings
}

/// The four cells sharing a crossing edge, ordered `[c00, c10, c11, c01]`.
/// Cells falling outside the grid are `None`.
fn cells_around(grid: &Grid, crossing: &Crossing) -> [Option<[usize; 3]>; 4] {
    let u = (crossing.axis + 1) % 3;
    let v = (crossing.axis + 2) % 3;
    let shift = |du: usize, dv: usize| {
        let mut cell = crossing.corner;
        cell[u] = cell[u].checked_sub(du)?;
        cell[v] = cell[v].checked_sub(dv)?;
        let in_grid = (0..3).all(|a| cell[a] + 1 < grid.dims[a]);
        in_grid.then_some(cell)
    };
    [shift(1, 1), shift(0, 1), shift(0, 0), shift(1, 0)]
}

fn bisect(solid: &Solid, mut inside: Point3, mut outside: Point3) -> Point3 {
    for _ in 0..BISECTION_STEPS {
        let mid = inside + (outside - inside) * 0.5;
        if solid.contains(&mid) {
            inside = mid;
        } else {
            outside = mid;
        }
    }
    inside + (outside - inside) * 0.5
}

/// Group the crossings of one cell into surface sheets.
///
/// `members` holds `(crossing index, position)` pairs for the cell. Returns
/// groups of indices into `members`. On each cell face the crossings are
/// linked in pairs: a face with two crossings links them, and a face with
/// four (inside corners on a diagonal) links the two that share an inside
/// corner. The linked groups are the closed loops the surface traces on
/// the cell boundary.
fn cell_sheets(cell: [usize; 3], members: &[(usize, usize)], crossings: &[Crossing]) -> Vec<Vec<usize>> {
    let mut parent: Vec<usize> = (0..members.len()).collect();
    for axis in 0..3 {
        for side in 0..2 {
            let on_face: Vec<usize> = (0..members.len())
                .filter(|&m| {
                    let c = &crossings[members[m].0];
                    c.axis != axis && c.corner[axis] == cell[axis] + side
                })
                .collect();
            for (i, &a) in on_face.iter().enumerate() {
                for &b in &on_face[i + 1..] {
                    let same_corner = crossings[members[a].0].inside_end()
                        == crossings[members[b].0].inside_end();
                    if on_face.len() == 2 || same_corner {
                        union(&mut parent, a, b);
                    }
                }
            }
        }
    }

    let mut sheets: Vec<Vec<usize>> = Vec::new();
    let mut sheet_of_root: Vec<Option<usize>> = vec![None; members.len()];
    for m in 0..members.len() {
        let root = find(&mut parent, m);
        let sheet = *sheet_of_root[root].get_or_insert_with(|| {
            sheets.push(Vec::new());
            sheets.len() - 1
        });
        sheets[sheet].push(m);
    }
    sheets
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let (ra, rb) = (find(parent, a), find(parent, b));
    if ra != rb {
        parent[rb] = ra;
    }
}

fn nearest(candidates: impl Iterator<Item = Point3>, target: &Point3) -> Point3 {
    candidates
        .min_by(|a, b| {
            (a - target)
                .norm_squared()
                .total_cmp(&(b - target).norm_squared())
        })
        .unwrap_or(*target)
}
