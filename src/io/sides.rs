//! Solver side-file format.
//!
//! The layout is plain text:
//!
//! ```text
//! <element count>
//! x0 y0 x1 y1 x2 y2 s0 s1 s2          (one line per element)
//! <side count>
//! x0 y0 x1 y1 left right left_edge right_edge   (one line per side)
//! ```
//!
//! Element vertices are listed counter-clockwise and `s0..s2` index the side
//! lines. For boundary sides `right` is the class sentinel `-(k + 1)` and
//! `right_edge` is `-1`.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use nalgebra::Point2;
use tracing::debug;

use super::MeshInput;
use crate::error::{MeshError, Result};
use crate::mesh::{BoundaryClass, BoundaryClasses, BoundaryEdge, MeshIndex, SideMesh, SideNeighbor};

/// Save a side mesh to a file.
///
/// The data is written to a sibling temporary file which replaces `path` only
/// once everything has been written.
///
/// # Example
///
/// ```no_run
/// use sidemesh::io::sides;
/// use sidemesh::io::gmsh;
/// use sidemesh::mesh::{order_sides, BoundaryClasses, SideMesh};
///
/// let input = gmsh::load("channel.msh").unwrap();
/// let mut mesh: SideMesh = input.build(&BoundaryClasses::default()).unwrap();
/// order_sides(&mut mesh);
/// sides::save(&mesh, "channel.sides").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &SideMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let partial = partial_path(path);

    let written = File::create(&partial)
        .map_err(MeshError::from)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            write_to(mesh, &mut writer)?;
            writer.flush()?;
            Ok(())
        })
        .and_then(|()| fs::rename(&partial, path).map_err(MeshError::from));

    if let Err(e) = written {
        let _ = fs::remove_file(&partial);
        return Err(MeshError::SaveError {
            path: path.to_path_buf(),
            message: e.to_string(),
        });
    }

    debug!(path = %path.display(), "side mesh saved");
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Write a side mesh to any writer.
pub fn write_to<W: Write, I: MeshIndex>(mesh: &SideMesh<I>, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", mesh.num_elements())?;
    for (eid, element) in mesh.elements() {
        let [p0, p1, p2] = mesh.element_positions(eid);
        let [s0, s1, s2] = element.sides;
        writeln!(
            writer,
            "{:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {} {} {}",
            p0.x,
            p0.y,
            p1.x,
            p1.y,
            p2.x,
            p2.y,
            s0.index(),
            s1.index(),
            s2.index()
        )?;
    }

    writeln!(writer, "{}", mesh.num_sides())?;
    for (sid, side) in mesh.sides() {
        let [p0, p1] = mesh.side_positions(sid);
        let (right, right_edge) = match side.right {
            SideNeighbor::Interior { element, edge } => (element.index() as i64, edge.index() as i64),
            SideNeighbor::Boundary(class) => (class.sentinel(), -1),
            SideNeighbor::Unresolved => {
                return Err(MeshError::UnresolvedSide {
                    side: sid.index(),
                    v0: side.vertices[0].index(),
                    v1: side.vertices[1].index(),
                    element: side.left.index(),
                });
            }
        };
        writeln!(
            writer,
            "{:.6} {:.6} {:.6} {:.6} {} {} {} {}",
            p0.x,
            p0.y,
            p1.x,
            p1.y,
            side.left.index(),
            right,
            side.left_edge.index(),
            right_edge
        )?;
    }

    Ok(())
}

/// Read a side file back as mesh input.
///
/// Vertices are recovered by merging identical coordinates; boundary sides
/// become boundary edges carrying the tag of their class in `classes`.
pub fn load<P: AsRef<Path>>(path: P, classes: &BoundaryClasses) -> Result<MeshInput> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    load_from_reader(BufReader::new(file), classes)
}

/// Read a side file from any buffered reader. See [`load`].
pub fn load_from_reader<R: BufRead>(reader: R, classes: &BoundaryClasses) -> Result<MeshInput> {
    let mut records = reader.lines();
    let mut line_no = 0usize;
    let mut next = |what: &str| -> Result<(usize, String)> {
        line_no += 1;
        match records.next() {
            Some(line) => Ok((line_no, line?)),
            None => Err(MeshError::parse(
                line_no,
                format!("unexpected end of file, expected {}", what),
            )),
        }
    };

    let mut vertices: Vec<Point2<f64>> = Vec::new();
    let mut lookup: HashMap<(u64, u64), usize> = HashMap::new();
    let mut vertex_at = |x: f64, y: f64| -> usize {
        // Written coordinates are rounded identically, so equality is exact
        *lookup.entry((x.to_bits(), y.to_bits())).or_insert_with(|| {
            vertices.push(Point2::new(x, y));
            vertices.len() - 1
        })
    };

    let (line, text) = next("element count")?;
    let num_elements: usize = parse_field(text.trim(), line)?;
    let mut triangles = Vec::with_capacity(num_elements);
    for _ in 0..num_elements {
        let (line, text) = next("element record")?;
        let fields = split_fields(&text, 9, line)?;
        let mut tri = [0usize; 3];
        for (k, slot) in tri.iter_mut().enumerate() {
            let x: f64 = parse_field(fields[2 * k], line)?;
            let y: f64 = parse_field(fields[2 * k + 1], line)?;
            *slot = vertex_at(x, y);
        }
        triangles.push(tri);
    }

    let (line, text) = next("side count")?;
    let num_sides: usize = parse_field(text.trim(), line)?;
    let mut boundary_edges = Vec::new();
    for _ in 0..num_sides {
        let (line, text) = next("side record")?;
        let fields = split_fields(&text, 8, line)?;
        let right: i64 = parse_field(fields[5], line)?;
        if let Some(class) = BoundaryClass::from_sentinel(right) {
            if class.index() >= classes.len() {
                return Err(MeshError::parse(line, format!("unknown boundary sentinel {}", right)));
            }
            let mut ends = [0usize; 2];
            for (k, end) in ends.iter_mut().enumerate() {
                let x: f64 = parse_field(fields[2 * k], line)?;
                let y: f64 = parse_field(fields[2 * k + 1], line)?;
                *end = vertex_at(x, y);
            }
            boundary_edges.push(BoundaryEdge::new(ends[0], ends[1], classes.tag(class)));
        }
    }

    Ok(MeshInput {
        vertices,
        triangles,
        boundary_edges,
    })
}

fn split_fields(text: &str, expected: usize, line: usize) -> Result<Vec<&str>> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != expected {
        return Err(MeshError::parse(
            line,
            format!("expected {} fields, found {}", expected, fields.len()),
        ));
    }
    Ok(fields)
}

fn parse_field<T: std::str::FromStr>(field: &str, line: usize) -> Result<T> {
    field
        .parse()
        .map_err(|_| MeshError::parse(line, format!("invalid field '{}'", field)))
}
