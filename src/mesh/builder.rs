//! Side mesh construction.
//!
//! This module turns a triangle list into a [`SideMesh`]: it fixes element
//! orientation, discovers every undirected edge once, records the elements on
//! both sides of it, and classifies the edges declared as domain boundary.

use std::collections::{HashMap, HashSet};

use nalgebra::Point2;
use tracing::{debug, info};

use super::boundary::{BoundaryClass, BoundaryClasses, BoundaryEdge};
use super::index::{ElementId, LocalEdge, MeshIndex, SideId, VertexId};
use super::side_mesh::{signed_area, Element, Side, SideMesh, SideNeighbor};
use crate::error::{MeshError, Result};

/// Order-independent key for the edge between two vertices.
#[inline]
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Number of entities addressable by index type `I`.
#[inline]
fn index_limit<I: MeshIndex>() -> usize {
    I::MAX.to_usize().saturating_add(1)
}

/// A declared boundary edge after tag lookup.
#[derive(Debug, Clone, Copy)]
struct Declared {
    /// Position of the first declaration in the input list.
    edge: usize,
    tag: i64,
    class: BoundaryClass,
}

/// Build a side mesh from vertices, triangles and declared boundary edges.
///
/// # Arguments
/// * `vertices` - Vertex positions, shared by all elements and never modified
/// * `triangles` - Elements as `[v0, v1, v2]` vertex indices, either winding
/// * `boundary_edges` - Declared boundary edges with generator tags
/// * `classes` - Which tags are boundary classes, in block order
///
/// # Returns
/// A side mesh in discovery order (call [`order_sides`](super::order_sides) to
/// group the sides into blocks), or an error if the input is not a valid
/// conforming triangulation with a fully classified boundary.
///
/// A declared boundary edge that turns out to be shared by two elements is
/// rejected with [`MeshError::InteriorBoundaryEdge`]; the boundary class is not
/// silently replaced by the second element. Meshes whose vertex, element or
/// side count does not fit the index type `I` fail with
/// [`MeshError::TooManyEntities`].
///
/// # Example
/// ```
/// use sidemesh::mesh::{build_from_triangles, BoundaryClasses, BoundaryEdge, SideMesh};
/// use nalgebra::Point2;
///
/// let vertices = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(0.0, 1.0),
/// ];
/// let triangles = vec![[0, 1, 2]];
/// let boundary = vec![
///     BoundaryEdge::new(0, 1, 10000),
///     BoundaryEdge::new(1, 2, 10000),
///     BoundaryEdge::new(2, 0, 10000),
/// ];
///
/// let mesh: SideMesh =
///     build_from_triangles(&vertices, &triangles, &boundary, &BoundaryClasses::default()).unwrap();
/// assert_eq!(mesh.num_sides(), 3);
/// assert_eq!(mesh.num_boundary_sides(), 3);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point2<f64>],
    triangles: &[[usize; 3]],
    boundary_edges: &[BoundaryEdge],
    classes: &BoundaryClasses,
) -> Result<SideMesh<I>> {
    if triangles.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let limit = index_limit::<I>();
    for (entity, count) in [("vertex", vertices.len()), ("element", triangles.len())] {
        if count > limit {
            return Err(MeshError::TooManyEntities { entity, count, limit });
        }
    }

    // Validate vertex indices
    for (ei, tri) in triangles.iter().enumerate() {
        for &vi in tri {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { element: ei, vertex: vi });
            }
        }
        if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
            return Err(MeshError::DegenerateElement { element: ei, area: 0.0 });
        }
    }

    let declared = index_boundary_edges(vertices.len(), boundary_edges, classes)?;

    let mut mesh = SideMesh::with_capacity(vertices.to_vec(), triangles.len(), classes.clone());

    // Map from undirected edge to the side representing it
    let mut side_map: HashMap<(usize, usize), SideId<I>> =
        HashMap::with_capacity(mesh.sides.capacity());
    let mut matched: HashSet<(usize, usize)> = HashSet::with_capacity(declared.len());
    let mut flipped = 0usize;

    for (ei, tri) in triangles.iter().enumerate() {
        let element_id = ElementId::<I>::new(ei);
        let mut tri = *tri;

        let area = signed_area(&vertices[tri[0]], &vertices[tri[1]], &vertices[tri[2]]);
        if area == 0.0 || !area.is_finite() {
            return Err(MeshError::DegenerateElement { element: ei, area });
        }
        // Only the element's own references are permuted
        if area < 0.0 {
            tri.swap(0, 1);
            flipped += 1;
        }

        let mut element = Element::new(tri.map(VertexId::new));

        for edge in LocalEdge::ALL {
            let (a, b) = edge.endpoints();
            let (va, vb) = (tri[a], tri[b]);
            let key = edge_key(va, vb);

            let side_id = match side_map.get(&key) {
                Some(&side_id) => {
                    let side = &mut mesh.sides[side_id.index()];
                    match side.right {
                        SideNeighbor::Unresolved => {
                            side.right = SideNeighbor::Interior {
                                element: element_id,
                                edge,
                            };
                        }
                        SideNeighbor::Interior { .. } => {
                            return Err(MeshError::NonManifoldEdge { v0: va, v1: vb });
                        }
                        SideNeighbor::Boundary(class) => {
                            return Err(MeshError::InteriorBoundaryEdge {
                                v0: va,
                                v1: vb,
                                tag: classes.tag(class),
                                left: side.left.index(),
                                right: ei,
                            });
                        }
                    }
                    side_id
                }
                None => {
                    if mesh.sides.len() >= limit {
                        return Err(MeshError::TooManyEntities {
                            entity: "side",
                            count: mesh.sides.len() + 1,
                            limit,
                        });
                    }
                    let right = match declared.get(&key) {
                        Some(d) => {
                            matched.insert(key);
                            SideNeighbor::Boundary(d.class)
                        }
                        None => SideNeighbor::Unresolved,
                    };

                    let side_id = SideId::<I>::new(mesh.sides.len());
                    mesh.sides.push(Side {
                        vertices: [VertexId::new(va), VertexId::new(vb)],
                        left: element_id,
                        left_edge: edge,
                        right,
                    });
                    side_map.insert(key, side_id);
                    side_id
                }
            };

            element.sides[edge.index()] = side_id;
        }

        mesh.elements.push(element);
    }

    if let Some((si, side)) = mesh
        .sides
        .iter()
        .enumerate()
        .find(|(_, s)| s.right == SideNeighbor::Unresolved)
    {
        return Err(MeshError::UnresolvedSide {
            side: si,
            v0: side.vertices[0].index(),
            v1: side.vertices[1].index(),
            element: side.left.index(),
        });
    }

    if matched.len() < declared.len() {
        let mut unmatched: Vec<&Declared> = declared
            .iter()
            .filter(|(key, _)| !matched.contains(*key))
            .map(|(_, d)| d)
            .collect();
        unmatched.sort_by_key(|d| d.edge);
        let first = unmatched[0];
        let [v0, v1] = boundary_edges[first.edge].vertices;
        return Err(MeshError::UnmatchedBoundaryEdge {
            edge: first.edge,
            v0,
            v1,
            tag: first.tag,
        });
    }

    debug!(flipped, "orientation fixed");
    info!(
        elements = mesh.num_elements(),
        sides = mesh.num_sides(),
        interior = mesh.num_interior_sides(),
        boundary = mesh.num_boundary_sides(),
        "side mesh built"
    );

    Ok(mesh)
}

/// Index declared boundary edges by undirected key, resolving their classes.
fn index_boundary_edges(
    num_vertices: usize,
    boundary_edges: &[BoundaryEdge],
    classes: &BoundaryClasses,
) -> Result<HashMap<(usize, usize), Declared>> {
    let mut declared: HashMap<(usize, usize), Declared> =
        HashMap::with_capacity(boundary_edges.len());

    for (bi, be) in boundary_edges.iter().enumerate() {
        let [v0, v1] = be.vertices;
        for vi in [v0, v1] {
            if vi >= num_vertices {
                return Err(MeshError::InvalidBoundaryVertex { edge: bi, vertex: vi });
            }
        }

        let class = classes
            .class_of(be.tag)
            .ok_or(MeshError::UnmappedBoundaryTag { edge: bi, tag: be.tag })?;

        let key = edge_key(v0, v1);
        match declared.get(&key) {
            Some(existing) if existing.tag != be.tag => {
                return Err(MeshError::ConflictingBoundaryTags {
                    v0,
                    v1,
                    first: existing.tag,
                    second: be.tag,
                });
            }
            Some(_) => {
                debug!(edge = bi, v0, v1, "duplicate boundary edge declaration");
            }
            None => {
                declared.insert(key, Declared { edge: bi, tag: be.tag, class });
            }
        }
    }

    Ok(declared)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> BoundaryClasses {
        BoundaryClasses::new([1, 2, 3]).unwrap()
    }

    /// Clockwise unit right triangle.
    fn clockwise_triangle() -> (Vec<Point2<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        (vertices, vec![[0, 1, 2]])
    }

    /// Unit square split along the diagonal 1-2.
    fn two_triangles() -> (Vec<Point2<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
        ];
        (vertices, vec![[0, 1, 2], [1, 3, 2]])
    }

    fn square_boundary(tag: i64) -> Vec<BoundaryEdge> {
        vec![
            BoundaryEdge::new(0, 1, tag),
            BoundaryEdge::new(1, 3, tag),
            BoundaryEdge::new(3, 2, tag),
            BoundaryEdge::new(2, 0, tag),
        ]
    }

    #[test]
    fn test_orientation_fixed_locally() {
        let (vertices, faces) = clockwise_triangle();
        let boundary = vec![
            BoundaryEdge::new(0, 1, 1),
            BoundaryEdge::new(1, 2, 2),
            BoundaryEdge::new(2, 0, 3),
        ];
        let mesh: SideMesh = build_from_triangles(&vertices, &faces, &boundary, &classes()).unwrap();

        let e = ElementId::new(0);
        assert!(mesh.element_area(e) > 0.0);
        assert_eq!(mesh.triangles(), vec![[1, 0, 2]]);
        // The shared vertex table is untouched
        assert_eq!(mesh.position(VertexId::new(0)), &Point2::new(0.0, 0.0));
        assert_eq!(mesh.position(VertexId::new(1)), &Point2::new(0.0, 1.0));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_shared_edge_becomes_interior() {
        let (vertices, faces) = two_triangles();
        let mesh: SideMesh =
            build_from_triangles(&vertices, &faces, &square_boundary(2), &classes()).unwrap();

        assert_eq!(mesh.num_sides(), 5);
        assert_eq!(mesh.num_interior_sides(), 1);
        assert_eq!(mesh.num_boundary_sides(), 4);
        assert_eq!(mesh.neighbor_pairs(), vec![(0, 1)]);

        // Element 0 discovers 1-2 as edge 1, element 1 sees it as 2-1 (edge 2)
        let shared = mesh.element(ElementId::new(0)).side(LocalEdge::ALL[1]);
        let side = mesh.side(shared);
        assert_eq!(side.left, ElementId::new(0));
        assert_eq!(side.right_element(), Some((ElementId::new(1), LocalEdge::ALL[2])));
        assert_eq!(mesh.element(ElementId::new(1)).side(LocalEdge::ALL[2]), shared);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_side_count_bounds() {
        let (vertices, faces) = two_triangles();
        let mesh: SideMesh =
            build_from_triangles(&vertices, &faces, &square_boundary(1), &classes()).unwrap();
        let e = mesh.num_elements();
        assert!(mesh.num_sides() >= (3 * e).div_ceil(2));
        assert!(mesh.num_sides() <= 3 * e);
        assert_eq!(
            2 * mesh.num_interior_sides() + mesh.num_boundary_sides(),
            3 * e
        );
    }

    #[test]
    fn test_unmatched_boundary_edge() {
        let (vertices, faces) = two_triangles();
        let mut boundary = square_boundary(1);
        boundary.push(BoundaryEdge::new(0, 3, 1));

        let result: Result<SideMesh> = build_from_triangles(&vertices, &faces, &boundary, &classes());
        assert!(matches!(
            result,
            Err(MeshError::UnmatchedBoundaryEdge { edge: 4, .. })
        ));
    }

    #[test]
    fn test_unresolved_side() {
        let (vertices, faces) = two_triangles();
        let mut boundary = square_boundary(1);
        boundary.pop();

        let result: Result<SideMesh> = build_from_triangles(&vertices, &faces, &boundary, &classes());
        assert!(matches!(result, Err(MeshError::UnresolvedSide { .. })));
    }

    #[test]
    fn test_degenerate_element() {
        let vertices = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        let result: Result<SideMesh> =
            build_from_triangles(&vertices, &[[0, 1, 2]], &[], &classes());
        assert!(matches!(result, Err(MeshError::DegenerateElement { element: 0, .. })));

        let result: Result<SideMesh> =
            build_from_triangles(&vertices, &[[0, 0, 2]], &[], &classes());
        assert!(matches!(result, Err(MeshError::DegenerateElement { element: 0, .. })));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point2::new(0.0, 0.0)];
        let result: Result<SideMesh> =
            build_from_triangles(&vertices, &[[0, 1, 2]], &[], &classes());
        assert!(matches!(result, Err(MeshError::InvalidVertexIndex { element: 0, vertex: 1 })));
    }

    #[test]
    fn test_empty_mesh() {
        let result: Result<SideMesh> = build_from_triangles(&[], &[], &[], &classes());
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_non_manifold_edge() {
        // Three triangles on the edge 0-1
        let vertices = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 1.0),
            Point2::new(0.5, -1.0),
            Point2::new(0.5, 2.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]];
        let result: Result<SideMesh> = build_from_triangles(&vertices, &faces, &[], &classes());
        assert!(matches!(result, Err(MeshError::NonManifoldEdge { .. })));
    }

    #[test]
    fn test_boundary_edge_between_elements() {
        let (vertices, faces) = two_triangles();
        let mut boundary = square_boundary(1);
        boundary.push(BoundaryEdge::new(2, 1, 3));

        let result: Result<SideMesh> = build_from_triangles(&vertices, &faces, &boundary, &classes());
        assert!(matches!(
            result,
            Err(MeshError::InteriorBoundaryEdge { tag: 3, left: 0, right: 1, .. })
        ));
    }

    #[test]
    fn test_unmapped_and_conflicting_tags() {
        let (vertices, faces) = two_triangles();

        let mut boundary = square_boundary(1);
        boundary[2].tag = 99;
        let result: Result<SideMesh> = build_from_triangles(&vertices, &faces, &boundary, &classes());
        assert!(matches!(result, Err(MeshError::UnmappedBoundaryTag { edge: 2, tag: 99 })));

        let mut boundary = square_boundary(1);
        boundary.push(BoundaryEdge::new(1, 0, 2));
        let result: Result<SideMesh> = build_from_triangles(&vertices, &faces, &boundary, &classes());
        assert!(matches!(
            result,
            Err(MeshError::ConflictingBoundaryTags { first: 1, second: 2, .. })
        ));
    }

    #[test]
    fn test_element_count_exceeds_small_index() {
        let vertices = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let faces = vec![[0, 1, 2]; 70_000];
        let result: Result<SideMesh<u16>> = build_from_triangles(&vertices, &faces, &[], &classes());
        assert!(matches!(
            result,
            Err(MeshError::TooManyEntities { entity: "element", count: 70_000, limit: 65_535 })
        ));
    }

    #[test]
    fn test_side_count_exceeds_small_index() {
        // 150×150 grid: 45 000 elements fit in u16, its 67 800 sides do not
        let n = 150;
        let at = |i: usize, j: usize| j * (n + 1) + i;
        let mut vertices = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point2::new(i as f64, j as f64));
            }
        }
        let mut faces = Vec::new();
        for j in 0..n {
            for i in 0..n {
                faces.push([at(i, j), at(i + 1, j), at(i + 1, j + 1)]);
                faces.push([at(i, j), at(i + 1, j + 1), at(i, j + 1)]);
            }
        }

        let result: Result<SideMesh<u16>> = build_from_triangles(&vertices, &faces, &[], &classes());
        assert!(matches!(
            result,
            Err(MeshError::TooManyEntities { entity: "side", count: 65_536, limit: 65_535 })
        ));

        // The default index type has room for the same mesh
        let boundary: Vec<BoundaryEdge> = (0..n)
            .flat_map(|k| {
                [
                    BoundaryEdge::new(at(k, 0), at(k + 1, 0), 1),
                    BoundaryEdge::new(at(n, k), at(n, k + 1), 1),
                    BoundaryEdge::new(at(k, n), at(k + 1, n), 1),
                    BoundaryEdge::new(at(0, k), at(0, k + 1), 1),
                ]
            })
            .collect();
        let mesh: SideMesh = build_from_triangles(&vertices, &faces, &boundary, &classes()).unwrap();
        assert_eq!(mesh.num_sides(), 67_800);
    }

    #[test]
    fn test_duplicate_declaration_accepted() {
        let (vertices, faces) = two_triangles();
        let mut boundary = square_boundary(1);
        boundary.push(BoundaryEdge::new(1, 0, 1));

        let mesh: SideMesh = build_from_triangles(&vertices, &faces, &boundary, &classes()).unwrap();
        assert_eq!(mesh.num_boundary_sides(), 4);
    }
}
