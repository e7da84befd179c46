//! Core mesh data structures and the side-building pipeline.
//!
//! This module provides the element/side representation consumed by
//! discontinuous Galerkin solvers and the algorithms that produce it.
//!
//! # Overview
//!
//! The primary type is [`SideMesh`]: triangles that each reference three
//! [`Side`]s, where every side knows the element on its left and either the
//! element on its right or the [`BoundaryClass`] it belongs to.
//!
//! # Index Types
//!
//! Mesh entities are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`ElementId`] - Identifies an element (triangle)
//! - [`SideId`] - Identifies a side
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait).
//!
//! # Construction
//!
//! ```
//! use sidemesh::mesh::{build_from_triangles, order_sides, BoundaryClasses, BoundaryEdge, SideMesh};
//! use nalgebra::Point2;
//!
//! let vertices = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(0.5, 1.0),
//! ];
//! let triangles = vec![[0, 1, 2]];
//! let boundary = vec![
//!     BoundaryEdge::new(0, 1, 10000),
//!     BoundaryEdge::new(1, 2, 20000),
//!     BoundaryEdge::new(2, 0, 30000),
//! ];
//!
//! let mut mesh: SideMesh =
//!     build_from_triangles(&vertices, &triangles, &boundary, &BoundaryClasses::default()).unwrap();
//! order_sides(&mut mesh);
//! assert!(mesh.is_valid());
//! ```

mod boundary;
mod builder;
mod index;
mod order;
mod side_mesh;

pub use boundary::{BoundaryClass, BoundaryClasses, BoundaryEdge, DEFAULT_TAGS};
pub use builder::build_from_triangles;
pub use index::{ElementId, LocalEdge, MeshIndex, SideId, VertexId};
pub use order::{order_sides, SideOrder};
pub use side_mesh::{signed_area, Element, Side, SideMesh, SideNeighbor};
