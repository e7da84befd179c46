//! Gmsh (legacy ASCII) input support.
//!
//! Reads the node table and the 2-D elements of a `.msh` file. Records are
//! classified by token count:
//!
//! - 7 tokens: a boundary line, tag at token 3, vertices at tokens 5 and 6
//! - 8 tokens: a triangle, vertices at tokens 5, 6 and 7
//!
//! Vertex numbers in the file are 1-based; everything else is ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use nalgebra::Point2;
use tracing::{debug, warn};

use super::MeshInput;
use crate::error::{MeshError, Result};
use crate::mesh::BoundaryEdge;

/// Marker introducing the node section.
const NODES_MARKER: &str = "$Nodes";

/// Token count of a boundary line record.
const LINE_TOKENS: usize = 7;

/// Token count of a triangle record.
const TRIANGLE_TOKENS: usize = 8;

/// Load mesh input from a gmsh file.
///
/// # Example
///
/// ```no_run
/// use sidemesh::io::gmsh;
///
/// let input = gmsh::load("channel.msh").unwrap();
/// println!("{} triangles", input.triangles.len());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<MeshInput> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let input = load_from_reader(BufReader::new(file))?;
    debug!(path = %path.display(), "gmsh file read");
    Ok(input)
}

/// Line reader that keeps track of 1-based line numbers.
struct Lines<R: BufRead> {
    inner: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            inner: reader.lines(),
            line: 0,
        }
    }

    /// Next line, or a parse error naming what was expected.
    fn expect(&mut self, what: &str) -> Result<String> {
        match self.inner.next() {
            Some(line) => {
                self.line += 1;
                Ok(line?)
            }
            None => Err(MeshError::parse(
                self.line + 1,
                format!("unexpected end of file, expected {}", what),
            )),
        }
    }

    /// Parse a single-number line.
    fn count(&mut self, what: &str) -> Result<usize> {
        let text = self.expect(what)?;
        parse_token(text.trim(), self.line, what)
    }
}

fn parse_token<T: FromStr>(token: &str, line: usize, what: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| MeshError::parse(line, format!("invalid {} '{}'", what, token)))
}

/// Parse a 1-based vertex number into a 0-based index.
fn parse_vertex(token: &str, line: usize, num_vertices: usize) -> Result<usize> {
    let v: usize = parse_token(token, line, "vertex number")?;
    if v == 0 || v > num_vertices {
        return Err(MeshError::parse(
            line,
            format!("vertex number {} outside 1..={}", v, num_vertices),
        ));
    }
    Ok(v - 1)
}

/// Load mesh input from any buffered reader.
///
/// # Example
///
/// ```
/// use sidemesh::io::gmsh;
///
/// let text = "\
/// $MeshFormat
/// 2.2 0 8
/// $EndMeshFormat
/// $Nodes
/// 3
/// 1 0 0 0
/// 2 1 0 0
/// 3 0 1 0
/// $EndNodes
/// $Elements
/// 2
/// 1 1 2 10000 1 1 2
/// 2 2 2 0 1 1 2 3
/// $EndElements
/// ";
/// let input = gmsh::load_from_reader(text.as_bytes()).unwrap();
/// assert_eq!(input.vertices.len(), 3);
/// assert_eq!(input.triangles, vec![[0, 1, 2]]);
/// assert_eq!(input.boundary_edges.len(), 1);
/// ```
pub fn load_from_reader<R: BufRead>(reader: R) -> Result<MeshInput> {
    let mut lines = Lines::new(reader);

    // Header: everything up to the node marker
    loop {
        let line = lines.expect("'$Nodes' section")?;
        if line.contains(NODES_MARKER) {
            break;
        }
    }

    let num_vertices = lines.count("node count")?;
    let mut vertices = Vec::with_capacity(num_vertices);
    let mut renumbered = false;

    for i in 0..num_vertices {
        let text = lines.expect("node record")?;
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(MeshError::parse(
                lines.line,
                format!("node record has {} fields, expected 'index x y z'", tokens.len()),
            ));
        }
        let tag: usize = parse_token(tokens[0], lines.line, "node index")?;
        let x: f64 = parse_token(tokens[1], lines.line, "x coordinate")?;
        let y: f64 = parse_token(tokens[2], lines.line, "y coordinate")?;
        if tag != i + 1 {
            renumbered = true;
        }
        vertices.push(Point2::new(x, y));
    }
    if renumbered {
        warn!("node numbers are not consecutive; nodes are indexed by position");
    }

    // $EndNodes, $Elements
    lines.expect("end of node section")?;
    lines.expect("element section")?;

    let num_records = lines.count("element count")?;
    let mut triangles = Vec::new();
    let mut boundary_edges = Vec::new();
    let mut ignored = 0usize;

    for _ in 0..num_records {
        let text = lines.expect("element record")?;
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let line = lines.line;

        match tokens.len() {
            LINE_TOKENS => {
                let tag: i64 = parse_token(tokens[3], line, "boundary tag")?;
                let v0 = parse_vertex(tokens[5], line, num_vertices)?;
                let v1 = parse_vertex(tokens[6], line, num_vertices)?;
                boundary_edges.push(BoundaryEdge::new(v0, v1, tag));
            }
            TRIANGLE_TOKENS => {
                let v0 = parse_vertex(tokens[5], line, num_vertices)?;
                let v1 = parse_vertex(tokens[6], line, num_vertices)?;
                let v2 = parse_vertex(tokens[7], line, num_vertices)?;
                triangles.push([v0, v1, v2]);
            }
            _ => ignored += 1,
        }
    }

    debug!(
        nodes = vertices.len(),
        triangles = triangles.len(),
        boundary_edges = boundary_edges.len(),
        ignored,
        "gmsh records parsed"
    );

    Ok(MeshInput {
        vertices,
        triangles,
        boundary_edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "\
$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
4
1 0 0 0
2 1 0 0
3 0 1 0
4 1 1 0
$EndNodes
$Elements
8
1 15 2 0 1 1
2 1 2 10000 1 1 2
3 1 2 20000 2 2 4
4 1 2 10000 3 4 3
5 1 2 30000 4 3 1
6 2 2 0 1 1 2 3
7 2 2 0 1 2 4 3
8 15 2 0 4 4
$EndElements
";

    #[test]
    fn test_load_square() {
        let input = load_from_reader(SQUARE.as_bytes()).unwrap();

        assert_eq!(input.vertices.len(), 4);
        assert_eq!(input.vertices[3], Point2::new(1.0, 1.0));
        assert_eq!(input.triangles, vec![[0, 1, 2], [1, 3, 2]]);
        assert_eq!(
            input.boundary_edges,
            vec![
                BoundaryEdge::new(0, 1, 10000),
                BoundaryEdge::new(1, 3, 20000),
                BoundaryEdge::new(3, 2, 10000),
                BoundaryEdge::new(2, 0, 30000),
            ]
        );
    }

    #[test]
    fn test_missing_nodes_marker() {
        let err = load_from_reader("$MeshFormat\n2.2 0 8\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_short_node_section() {
        let text = "$Nodes\n3\n1 0 0 0\n2 1 0 0\n";
        let err = load_from_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 5, .. }));
    }

    #[test]
    fn test_non_numeric_coordinate() {
        let text = "$Nodes\n1\n1 zero 0 0\n";
        let err = load_from_reader(text.as_bytes()).unwrap_err();
        match err {
            MeshError::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("x coordinate"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_vertex_number_out_of_range() {
        let text = SQUARE.replace("7 2 2 0 1 2 4 3", "7 2 2 0 1 2 5 3");
        let err = load_from_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 19, .. }));

        let text = SQUARE.replace("2 1 2 10000 1 1 2", "2 1 2 10000 1 0 2");
        let err = load_from_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 14, .. }));
    }
}
