//! # Sidemesh
//!
//! Element/side connectivity for discontinuous Galerkin solvers, built from
//! unstructured 2-D triangle meshes.
//!
//! A DG flux loop walks over *sides*: every side needs the element on its left,
//! the element on its right (or the boundary condition that replaces it), and
//! the local edge index each element sees the side as. Sidemesh reconstructs that
//! structure from a plain triangle list plus tagged boundary edges.
//!
//! ## Features
//!
//! - **Orientation fix**: every element is made counter-clockwise without
//!   touching the shared vertex table
//! - **Side discovery**: each undirected edge becomes exactly one side, with
//!   left/right adjacency and local edge indices
//! - **Boundary classes**: any number of generator tags, mapped to ordered classes
//! - **Block ordering**: sides grouped per boundary class, interior sides last
//! - **File formats**: gmsh ASCII input, solver side-file output
//!
//! ## Quick Start
//!
//! ```no_run
//! use sidemesh::prelude::*;
//!
//! // Read, build, order and write in one go
//! let mesh: SideMesh = sidemesh::io::convert("channel.msh", "channel.sides", &BoundaryClasses::default()).unwrap();
//!
//! println!("Elements: {}", mesh.num_elements());
//! println!("Sides: {}", mesh.num_sides());
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use sidemesh::prelude::*;
//! use nalgebra::Point2;
//!
//! let vertices = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(0.0, 1.0),
//!     Point2::new(1.0, 1.0),
//! ];
//! // Second triangle is clockwise; it gets flipped
//! let triangles = vec![[0, 1, 2], [1, 2, 3]];
//! let boundary = vec![
//!     BoundaryEdge::new(0, 1, 10000),
//!     BoundaryEdge::new(1, 3, 30000),
//!     BoundaryEdge::new(3, 2, 10000),
//!     BoundaryEdge::new(2, 0, 20000),
//! ];
//!
//! let mut mesh: SideMesh =
//!     build_from_triangles(&vertices, &triangles, &boundary, &BoundaryClasses::default()).unwrap();
//! order_sides(&mut mesh);
//!
//! assert_eq!(mesh.num_sides(), 5);
//! assert_eq!(mesh.interior_range(), Some(4..5));
//! assert!(mesh.is_valid());
//! ```
//!
//! ## Side Traversal
//!
//! ```
//! # use sidemesh::prelude::*;
//! # use nalgebra::Point2;
//! # let vertices = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)];
//! # let boundary = vec![
//! #     BoundaryEdge::new(0, 1, 10000),
//! #     BoundaryEdge::new(1, 2, 10000),
//! #     BoundaryEdge::new(2, 0, 10000),
//! # ];
//! # let mesh: SideMesh =
//! #     build_from_triangles(&vertices, &[[0, 1, 2]], &boundary, &BoundaryClasses::default()).unwrap();
//! for (id, side) in mesh.sides() {
//!     match side.right {
//!         SideNeighbor::Interior { element, edge } => {
//!             println!("{:?}: {:?} | {:?} (edge {})", id, side.left, element, edge.index());
//!         }
//!         SideNeighbor::Boundary(class) => {
//!             println!("{:?}: {:?} | boundary {}", id, side.left, class);
//!         }
//!         SideNeighbor::Unresolved => unreachable!(),
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use sidemesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::io::MeshInput;
    pub use crate::mesh::{
        build_from_triangles, order_sides, BoundaryClass, BoundaryClasses, BoundaryEdge, Element,
        ElementId, LocalEdge, MeshIndex, Side, SideId, SideMesh, SideNeighbor, SideOrder, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
