//! Side ordering.
//!
//! Solvers treat each boundary class with its own kernel, so the sides are
//! grouped into contiguous blocks: all sides of the first configured class, then
//! the second, and so on, followed by every interior side.
//!
//! The reordering builds an old→new position map, permutes the side records,
//! and then rewrites the three side references of every element in a single
//! pass. Within a block the discovery order is kept.

use std::ops::Range;

use tracing::debug;

use super::boundary::BoundaryClass;
use super::index::{MeshIndex, SideId};
use super::side_mesh::{Side, SideMesh};

/// Block layout of an ordered side array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideOrder {
    /// Start offset of each class block, plus the start of the interior block.
    starts: Vec<usize>,
    /// Total number of sides.
    len: usize,
}

impl SideOrder {
    /// Side positions holding the given boundary class.
    pub fn boundary_range(&self, class: BoundaryClass) -> Range<usize> {
        self.starts[class.index()]..self.starts[class.index() + 1]
    }

    /// Side positions holding interior sides.
    pub fn interior_range(&self) -> Range<usize> {
        self.starts[self.starts.len() - 1]..self.len
    }

    /// Number of boundary class blocks.
    pub fn num_classes(&self) -> usize {
        self.starts.len() - 1
    }
}

/// Group the sides of a mesh into boundary class blocks followed by interior sides.
///
/// Element side references are rewritten to follow the moved sides. Returns the
/// resulting layout, which is also stored on the mesh.
///
/// # Example
///
/// ```
/// use sidemesh::mesh::{build_from_triangles, order_sides, BoundaryClass, BoundaryClasses, BoundaryEdge, SideMesh};
/// use nalgebra::Point2;
///
/// let vertices = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(0.0, 1.0),
///     Point2::new(1.0, 1.0),
/// ];
/// let triangles = vec![[0, 1, 2], [1, 3, 2]];
/// let boundary = vec![
///     BoundaryEdge::new(0, 1, 20000),
///     BoundaryEdge::new(1, 3, 10000),
///     BoundaryEdge::new(3, 2, 20000),
///     BoundaryEdge::new(2, 0, 10000),
/// ];
///
/// let mut mesh: SideMesh =
///     build_from_triangles(&vertices, &triangles, &boundary, &BoundaryClasses::default()).unwrap();
/// let layout = order_sides(&mut mesh);
///
/// assert_eq!(layout.boundary_range(BoundaryClass::new(0)), 0..2);
/// assert_eq!(layout.boundary_range(BoundaryClass::new(1)), 2..4);
/// assert_eq!(layout.interior_range(), 4..5);
/// assert!(mesh.is_valid());
/// ```
pub fn order_sides<I: MeshIndex>(mesh: &mut SideMesh<I>) -> SideOrder {
    let num_classes = mesh.classes.len();
    let len = mesh.sides.len();

    // Bucket old positions by block; the last bucket holds interior sides
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); num_classes + 1];
    for (i, side) in mesh.sides.iter().enumerate() {
        let block = match side.boundary_class() {
            Some(class) if class.index() < num_classes => class.index(),
            _ => num_classes,
        };
        buckets[block].push(i);
    }

    let mut starts = Vec::with_capacity(num_classes + 1);
    let mut new_to_old = Vec::with_capacity(len);
    for bucket in &buckets {
        starts.push(new_to_old.len());
        new_to_old.extend_from_slice(bucket);
    }

    let mut old_to_new = vec![0usize; len];
    for (new, &old) in new_to_old.iter().enumerate() {
        old_to_new[old] = new;
    }

    let moved = old_to_new.iter().enumerate().filter(|(o, n)| o != *n).count();

    let sides: Vec<Side<I>> = new_to_old.iter().map(|&old| mesh.sides[old]).collect();
    mesh.sides = sides;

    for element in &mut mesh.elements {
        for side in &mut element.sides {
            *side = SideId::new(old_to_new[side.index()]);
        }
    }

    debug!(moved, blocks = starts.len(), "sides ordered");

    let order = SideOrder { starts, len };
    mesh.layout = Some(order.clone());
    order
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use super::*;
    use crate::mesh::{build_from_triangles, BoundaryClasses, BoundaryEdge, ElementId, LocalEdge};

    /// An n×n grid of unit squares, each split into two triangles.
    ///
    /// Bottom edges get tag 3, right edges tag 2, top and left edges tag 1.
    fn grid(n: usize) -> (Vec<Point2<f64>>, Vec<[usize; 3]>, Vec<BoundaryEdge>) {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        let mut boundary = Vec::new();
        let at = |i: usize, j: usize| j * (n + 1) + i;

        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point2::new(i as f64, j as f64));
            }
        }
        for j in 0..n {
            for i in 0..n {
                // Alternate winding so some elements need flipping
                if (i + j) % 2 == 0 {
                    faces.push([at(i, j), at(i + 1, j), at(i + 1, j + 1)]);
                    faces.push([at(i, j), at(i, j + 1), at(i + 1, j + 1)]);
                } else {
                    faces.push([at(i + 1, j + 1), at(i + 1, j), at(i, j)]);
                    faces.push([at(i, j), at(i + 1, j + 1), at(i, j + 1)]);
                }
            }
        }
        for k in 0..n {
            boundary.push(BoundaryEdge::new(at(k, 0), at(k + 1, 0), 3));
            boundary.push(BoundaryEdge::new(at(n, k), at(n, k + 1), 2));
            boundary.push(BoundaryEdge::new(at(k, n), at(k + 1, n), 1));
            boundary.push(BoundaryEdge::new(at(0, k), at(0, k + 1), 1));
        }
        (vertices, faces, boundary)
    }

    fn built(n: usize) -> SideMesh {
        let (vertices, faces, boundary) = grid(n);
        let classes = BoundaryClasses::new([1, 2, 3]).unwrap();
        build_from_triangles(&vertices, &faces, &boundary, &classes).unwrap()
    }

    #[test]
    fn test_blocks_are_contiguous_and_ordered() {
        let mut mesh = built(4);
        let layout = order_sides(&mut mesh);

        assert_eq!(layout.num_classes(), 3);
        assert_eq!(layout.boundary_range(BoundaryClass::new(0)), 0..8);
        assert_eq!(layout.boundary_range(BoundaryClass::new(1)), 8..12);
        assert_eq!(layout.boundary_range(BoundaryClass::new(2)), 12..16);
        assert_eq!(layout.interior_range(), 16..mesh.num_sides());

        for class in mesh.classes().classes().collect::<Vec<_>>() {
            for i in layout.boundary_range(class) {
                assert_eq!(mesh.side(SideId::new(i)).boundary_class(), Some(class));
            }
        }
        for i in layout.interior_range() {
            assert!(mesh.side(SideId::new(i)).is_interior());
        }
        assert_eq!(mesh.layout(), Some(&layout));
    }

    #[test]
    fn test_references_follow_moved_sides() {
        let mut mesh = built(3);
        let pairs_before = mesh.neighbor_pairs();
        let edges_before: Vec<[[usize; 2]; 3]> = mesh
            .elements()
            .map(|(_, e)| {
                LocalEdge::ALL.map(|l| {
                    let [a, b] = e.edge_vertices(l);
                    [a.index(), b.index()]
                })
            })
            .collect();

        order_sides(&mut mesh);

        assert!(mesh.is_valid());
        assert_eq!(mesh.neighbor_pairs(), pairs_before);
        for (eid, e) in mesh.elements() {
            for l in LocalEdge::ALL {
                let side = mesh.side(e.side(l));
                assert!(side.is_owned_by(eid, l));
                let [a, b] = edges_before[eid.index()][l.index()];
                let [sa, sb] = side.vertices;
                assert!(
                    [sa.index(), sb.index()] == [a, b] || [sb.index(), sa.index()] == [a, b]
                );
            }
        }
    }

    #[test]
    fn test_block_order_is_stable() {
        let mut mesh = built(2);
        let before: Vec<Side> = mesh.sides().map(|(_, s)| *s).collect();
        let layout = order_sides(&mut mesh);

        // Left elements of the first class, in discovery order
        let expected: Vec<ElementId> = before
            .iter()
            .filter(|s| s.boundary_class() == Some(BoundaryClass::new(0)))
            .map(|s| s.left)
            .collect();
        let actual: Vec<ElementId> = layout
            .boundary_range(BoundaryClass::new(0))
            .map(|i| mesh.side(SideId::new(i)).left)
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_ordering_twice_is_identity() {
        let mut mesh = built(3);
        let first = order_sides(&mut mesh);
        let sides: Vec<Side> = mesh.sides().map(|(_, s)| *s).collect();
        let second = order_sides(&mut mesh);
        assert_eq!(first, second);
        assert!(mesh.sides().map(|(_, s)| *s).eq(sides.into_iter()));
    }
}
