//! Mesh file I/O.
//!
//! | Format | Module | Read | Write | Notes |
//! |--------|--------|------|-------|-------|
//! | Gmsh ASCII | [`gmsh`] | ✓ | ✗ | Nodes, triangles and tagged boundary lines |
//! | Solver side file | [`sides`] | ✓ | ✓ | Element/side connectivity |
//!
//! # Usage
//!
//! The whole conversion is available as a single call:
//!
//! ```no_run
//! use sidemesh::io::convert;
//! use sidemesh::mesh::{BoundaryClasses, SideMesh};
//!
//! let mesh: SideMesh = convert("channel.msh", "channel.sides", &BoundaryClasses::default()).unwrap();
//! println!("{} sides", mesh.num_sides());
//! ```

pub mod gmsh;
pub mod sides;

use std::path::Path;

use nalgebra::Point2;
use tracing::info;

use crate::error::Result;
use crate::mesh::{build_from_triangles, order_sides, BoundaryClasses, BoundaryEdge, MeshIndex, SideMesh};

/// Raw mesh description as read from a file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshInput {
    /// Vertex positions.
    pub vertices: Vec<Point2<f64>>,
    /// Triangles as 0-based vertex indices, in file order.
    pub triangles: Vec<[usize; 3]>,
    /// Declared boundary edges, in file order.
    pub boundary_edges: Vec<BoundaryEdge>,
}

impl MeshInput {
    /// Build the side mesh for this input.
    ///
    /// The sides are in discovery order; see [`order_sides`].
    pub fn build<I: MeshIndex>(&self, classes: &BoundaryClasses) -> Result<SideMesh<I>> {
        build_from_triangles(&self.vertices, &self.triangles, &self.boundary_edges, classes)
    }
}

/// Convert a gmsh file into a solver side file.
///
/// Reads `input`, builds and orders the sides, then writes `output`. Nothing is
/// written if any step fails.
pub fn convert<P, Q, I>(input: P, output: Q, classes: &BoundaryClasses) -> Result<SideMesh<I>>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    I: MeshIndex,
{
    let input = input.as_ref();
    let output = output.as_ref();

    let raw = gmsh::load(input)?;
    info!(
        path = %input.display(),
        vertices = raw.vertices.len(),
        triangles = raw.triangles.len(),
        boundary_edges = raw.boundary_edges.len(),
        "input loaded"
    );

    let mut mesh = raw.build(classes)?;
    let layout = order_sides(&mut mesh);
    for class in classes.classes() {
        info!(
            tag = classes.tag(class),
            sides = layout.boundary_range(class).len(),
            "boundary block"
        );
    }
    info!(sides = layout.interior_range().len(), "interior block");

    sides::save(&mesh, output)?;
    info!(path = %output.display(), "output written");

    Ok(mesh)
}
