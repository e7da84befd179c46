//! Error types for sidemesh.
//!
//! Every failure aborts the conversion: structural errors come from reading the
//! input text, topological errors from building the side connectivity.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while reading, building, or writing a side mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no elements.
    #[error("mesh has no elements")]
    EmptyMesh,

    /// An element references an invalid vertex index.
    #[error("element {element} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The element index.
        element: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A boundary edge references an invalid vertex index.
    #[error("boundary edge {edge} references invalid vertex index {vertex}")]
    InvalidBoundaryVertex {
        /// The boundary edge index.
        edge: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// An element has repeated vertices or zero signed area.
    #[error("element {element} is degenerate (signed area {area})")]
    DegenerateElement {
        /// The element index.
        element: usize,
        /// The signed area computed for the element.
        area: f64,
    },

    /// An edge is shared by more than two elements.
    #[error("edge ({v0}, {v1}) has more than two incident elements")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// A declared boundary edge is shared by two elements.
    #[error("boundary edge ({v0}, {v1}) with tag {tag} lies between elements {left} and {right}")]
    InteriorBoundaryEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
        /// The declared boundary tag.
        tag: i64,
        /// The element that created the side.
        left: usize,
        /// The element that found the side again.
        right: usize,
    },

    /// A side has neither a right neighbor nor a boundary class.
    #[error("side {side} ({v0}, {v1}) of element {element} has no neighbor and no boundary class")]
    UnresolvedSide {
        /// The side index.
        side: usize,
        /// First vertex of the side.
        v0: usize,
        /// Second vertex of the side.
        v1: usize,
        /// The element owning the side.
        element: usize,
    },

    /// A declared boundary edge does not coincide with any element edge.
    #[error("boundary edge {edge} ({v0}, {v1}) with tag {tag} matches no element edge")]
    UnmatchedBoundaryEdge {
        /// The boundary edge index.
        edge: usize,
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
        /// The declared boundary tag.
        tag: i64,
    },

    /// A boundary edge carries a tag with no configured boundary class.
    #[error("boundary edge {edge} has tag {tag}, which is not a configured boundary class")]
    UnmappedBoundaryTag {
        /// The boundary edge index.
        edge: usize,
        /// The unknown tag.
        tag: i64,
    },

    /// The same edge is declared twice with different tags.
    #[error("edge ({v0}, {v1}) is declared with boundary tags {first} and {second}")]
    ConflictingBoundaryTags {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
        /// The tag seen first.
        first: i64,
        /// The conflicting tag.
        second: i64,
    },

    /// The mesh has more entities than the index type can address.
    #[error("{count} {entity}s exceed the index limit of {limit}")]
    TooManyEntities {
        /// What overflowed: "vertex", "element" or "side".
        entity: &'static str,
        /// The number of entities requested.
        count: usize,
        /// The largest count the index type supports.
        limit: usize,
    },

    /// Malformed input text.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending record.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a parse error for the given 1-based line.
    pub fn parse<S: Into<String>>(line: usize, message: S) -> Self {
        MeshError::Parse {
            line,
            message: message.into(),
        }
    }
}
