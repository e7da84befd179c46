//! Element/side mesh data structure.
//!
//! This module provides the connectivity layout consumed by discontinuous
//! Galerkin solvers: every triangle stores the three sides it is bounded by, and
//! every side stores the element on its left plus either the element on its
//! right or the boundary class it belongs to.
//!
//! # Structure
//!
//! - Vertices are an immutable table of 2-D points shared by all elements
//! - Each **element** is a counter-clockwise vertex triple plus one side per
//!   local edge (edge 0 = v0→v1, edge 1 = v1→v2, edge 2 = v2→v0)
//! - Each **side** is stored once, by the element that discovered it (left)
//! - A side's right slot is a [`SideNeighbor`]: another element, a boundary
//!   class, or unresolved while the mesh is still being built

use std::ops::Range;

use nalgebra::Point2;

use super::boundary::{BoundaryClass, BoundaryClasses};
use super::index::{ElementId, LocalEdge, MeshIndex, SideId, VertexId};
use super::order::SideOrder;

/// Signed area of the triangle `(a, b, c)`.
///
/// Positive for counter-clockwise winding.
#[inline]
pub fn signed_area(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
}

/// A triangle of the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element<I: MeshIndex = u32> {
    /// Vertex references in counter-clockwise order.
    pub vertices: [VertexId<I>; 3],

    /// The side bounding each local edge.
    pub sides: [SideId<I>; 3],
}

impl<I: MeshIndex> Element<I> {
    /// Create an element with unassigned sides.
    pub fn new(vertices: [VertexId<I>; 3]) -> Self {
        Self {
            vertices,
            sides: [SideId::invalid(); 3],
        }
    }

    /// The vertex pair of a local edge, in traversal order.
    #[inline]
    pub fn edge_vertices(&self, edge: LocalEdge) -> [VertexId<I>; 2] {
        let (a, b) = edge.endpoints();
        [self.vertices[a], self.vertices[b]]
    }

    /// The side bounding a local edge.
    #[inline]
    pub fn side(&self, edge: LocalEdge) -> SideId<I> {
        self.sides[edge.index()]
    }
}

/// What lies on the right of a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideNeighbor<I: MeshIndex = u32> {
    /// No second element and no boundary class yet.
    Unresolved,
    /// An element sharing the side, and the local edge it sees the side as.
    Interior {
        /// The neighboring element.
        element: ElementId<I>,
        /// The neighbor's local edge index for this side.
        edge: LocalEdge,
    },
    /// A domain boundary of the given class.
    Boundary(BoundaryClass),
}

/// An undirected edge record shared by at most two elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Side<I: MeshIndex = u32> {
    /// Endpoints in the orientation of the left element.
    pub vertices: [VertexId<I>; 2],

    /// The element that discovered this side.
    pub left: ElementId<I>,

    /// The left element's local edge index for this side.
    pub left_edge: LocalEdge,

    /// The element or boundary on the other side.
    pub right: SideNeighbor<I>,
}

impl<I: MeshIndex> Side<I> {
    /// Check if the right slot is a boundary class.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        matches!(self.right, SideNeighbor::Boundary(_))
    }

    /// Check if the right slot is another element.
    #[inline]
    pub fn is_interior(&self) -> bool {
        matches!(self.right, SideNeighbor::Interior { .. })
    }

    /// The boundary class, if any.
    #[inline]
    pub fn boundary_class(&self) -> Option<BoundaryClass> {
        match self.right {
            SideNeighbor::Boundary(class) => Some(class),
            _ => None,
        }
    }

    /// The right element and its local edge, if any.
    #[inline]
    pub fn right_element(&self) -> Option<(ElementId<I>, LocalEdge)> {
        match self.right {
            SideNeighbor::Interior { element, edge } => Some((element, edge)),
            _ => None,
        }
    }

    /// Whether `element` sees this side through local edge `edge`.
    pub fn is_owned_by(&self, element: ElementId<I>, edge: LocalEdge) -> bool {
        (self.left == element && self.left_edge == edge)
            || self.right_element() == Some((element, edge))
    }
}

/// A triangle mesh with explicit element/side connectivity.
#[derive(Debug, Clone)]
pub struct SideMesh<I: MeshIndex = u32> {
    /// Vertex positions. Never modified after construction.
    pub(crate) vertices: Vec<Point2<f64>>,

    /// All elements in input order.
    pub(crate) elements: Vec<Element<I>>,

    /// All sides.
    pub(crate) sides: Vec<Side<I>>,

    /// Boundary classes the sides were classified against.
    pub(crate) classes: BoundaryClasses,

    /// Block layout, set once the sides have been ordered.
    pub(crate) layout: Option<SideOrder>,
}

impl<I: MeshIndex> SideMesh<I> {
    /// Create an empty mesh over the given vertex table.
    pub(crate) fn with_capacity(
        vertices: Vec<Point2<f64>>,
        num_elements: usize,
        classes: BoundaryClasses,
    ) -> Self {
        // Each interior side is shared: S lies in [3E/2, 3E]
        let num_sides = num_elements * 3 / 2 + num_elements / 4;

        Self {
            vertices,
            elements: Vec::with_capacity(num_elements),
            sides: Vec::with_capacity(num_sides),
            classes,
            layout: None,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of elements.
    #[inline]
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Get the number of sides.
    #[inline]
    pub fn num_sides(&self) -> usize {
        self.sides.len()
    }

    /// Get the number of sides shared by two elements.
    pub fn num_interior_sides(&self) -> usize {
        self.sides.iter().filter(|s| s.is_interior()).count()
    }

    /// Get the number of sides carrying a boundary class.
    pub fn num_boundary_sides(&self) -> usize {
        self.sides.iter().filter(|s| s.is_boundary()).count()
    }

    /// The boundary classes this mesh was built with.
    #[inline]
    pub fn classes(&self) -> &BoundaryClasses {
        &self.classes
    }

    /// Get a vertex position by ID.
    #[inline]
    pub fn position(&self, id: VertexId<I>) -> &Point2<f64> {
        &self.vertices[id.index()]
    }

    /// Get an element by ID.
    #[inline]
    pub fn element(&self, id: ElementId<I>) -> &Element<I> {
        &self.elements[id.index()]
    }

    /// Get a side by ID.
    #[inline]
    pub fn side(&self, id: SideId<I>) -> &Side<I> {
        &self.sides[id.index()]
    }

    /// Iterate over all elements with their IDs.
    pub fn elements(&self) -> impl Iterator<Item = (ElementId<I>, &Element<I>)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId::new(i), e))
    }

    /// Iterate over all sides with their IDs.
    pub fn sides(&self) -> impl Iterator<Item = (SideId<I>, &Side<I>)> {
        self.sides
            .iter()
            .enumerate()
            .map(|(i, s)| (SideId::new(i), s))
    }

    // ==================== Geometry ====================

    /// Get the three vertex positions of an element.
    pub fn element_positions(&self, id: ElementId<I>) -> [Point2<f64>; 3] {
        let [v0, v1, v2] = self.element(id).vertices;
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    /// Signed area of an element. Positive once the mesh is built.
    pub fn element_area(&self, id: ElementId<I>) -> f64 {
        let [a, b, c] = self.element_positions(id);
        signed_area(&a, &b, &c)
    }

    /// Get the two endpoint positions of a side.
    pub fn side_positions(&self, id: SideId<I>) -> [Point2<f64>; 2] {
        let [v0, v1] = self.side(id).vertices;
        [*self.position(v0), *self.position(v1)]
    }

    // ==================== Layout ====================

    /// The block layout, available after [`order_sides`](super::order_sides).
    #[inline]
    pub fn layout(&self) -> Option<&SideOrder> {
        self.layout.as_ref()
    }

    /// Side positions holding one boundary class, once ordered.
    pub fn boundary_range(&self, class: BoundaryClass) -> Option<Range<usize>> {
        self.layout.as_ref().map(|l| l.boundary_range(class))
    }

    /// Side positions holding interior sides, once ordered.
    pub fn interior_range(&self) -> Option<Range<usize>> {
        self.layout.as_ref().map(|l| l.interior_range())
    }

    // ==================== Conversion ====================

    /// The element vertex triples as raw indices.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        self.elements
            .iter()
            .map(|e| {
                let [v0, v1, v2] = e.vertices;
                [v0.index(), v1.index(), v2.index()]
            })
            .collect()
    }

    /// Element pairs sharing a side, each pair sorted and the list sorted.
    pub fn neighbor_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs: Vec<(usize, usize)> = self
            .sides
            .iter()
            .filter_map(|s| {
                s.right_element().map(|(r, _)| {
                    let (a, b) = (s.left.index(), r.index());
                    (a.min(b), a.max(b))
                })
            })
            .collect();
        pairs.sort_unstable();
        pairs
    }

    // ==================== Validation ====================

    /// Check the structural invariants of the mesh.
    ///
    /// Every element must be counter-clockwise and reference three distinct sides
    /// that list it with the matching local edge. Every side must be resolved,
    /// match its left element's edge, and be referenced back by its elements.
    pub fn is_valid(&self) -> bool {
        let num_elements = self.elements.len();
        let num_sides = self.sides.len();

        if num_sides < (3 * num_elements).div_ceil(2) || num_sides > 3 * num_elements {
            return false;
        }

        for (eid, e) in self.elements() {
            if self.element_area(eid) <= 0.0 {
                return false;
            }
            let [s0, s1, s2] = e.sides;
            if s0 == s1 || s1 == s2 || s0 == s2 {
                return false;
            }
            for edge in LocalEdge::ALL {
                let sid = e.side(edge);
                if !sid.is_valid() || sid.index() >= num_sides {
                    return false;
                }
                if !self.side(sid).is_owned_by(eid, edge) {
                    return false;
                }
            }
        }

        for (sid, s) in self.sides() {
            if s.left.index() >= num_elements {
                return false;
            }
            let left = self.element(s.left);
            if left.side(s.left_edge) != sid || left.edge_vertices(s.left_edge) != s.vertices {
                return false;
            }
            match s.right {
                SideNeighbor::Unresolved => return false,
                SideNeighbor::Interior { element, edge } => {
                    if element.index() >= num_elements || element == s.left {
                        return false;
                    }
                    let right = self.element(element);
                    let [a, b] = right.edge_vertices(edge);
                    if right.side(edge) != sid || ([b, a] != s.vertices && [a, b] != s.vertices) {
                        return false;
                    }
                }
                SideNeighbor::Boundary(class) => {
                    if class.index() >= self.classes.len() {
                        return false;
                    }
                }
            }
        }

        2 * self.num_interior_sides() + self.num_boundary_sides() == 3 * num_elements
    }
}
