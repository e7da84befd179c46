//! Boundary edge declarations and boundary-class configuration.
//!
//! A mesh generator tags domain boundary segments with integer tags. The caller
//! decides which tags are boundary classes, and in which order their side blocks
//! appear, through [`BoundaryClasses`].

use std::fmt;

use crate::error::{MeshError, Result};

/// Tags used when no configuration is given: wall, inflow, outflow.
pub const DEFAULT_TAGS: [i64; 3] = [10000, 20000, 30000];

/// A declared boundary edge: an unordered vertex pair plus a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryEdge {
    /// The two vertex indices (0-based). Order is not significant.
    pub vertices: [usize; 2],
    /// The generator tag identifying the boundary condition.
    pub tag: i64,
}

impl BoundaryEdge {
    /// Create a boundary edge.
    pub fn new(v0: usize, v1: usize, tag: i64) -> Self {
        Self {
            vertices: [v0, v1],
            tag,
        }
    }
}

/// A configured boundary class, identified by its position in [`BoundaryClasses`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoundaryClass(usize);

impl BoundaryClass {
    /// Create a class from its configured position.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of this class in the configuration.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    /// The negative value written in place of a right element index.
    ///
    /// Class `k` maps to `-(k + 1)`, so no sentinel collides with an element
    /// index or with another class.
    #[inline]
    pub fn sentinel(self) -> i64 {
        -(self.0 as i64) - 1
    }

    /// Inverse of [`BoundaryClass::sentinel`].
    pub fn from_sentinel(value: i64) -> Option<Self> {
        if value >= 0 {
            return None;
        }
        let index = usize::try_from(value.unsigned_abs() - 1).ok()?;
        Some(Self(index))
    }
}

impl fmt::Display for BoundaryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {}", self.0)
    }
}

/// Ordered mapping from generator tags to boundary classes.
///
/// # Example
///
/// ```
/// use sidemesh::mesh::BoundaryClasses;
///
/// let classes = BoundaryClasses::new([3, 1]).unwrap();
/// assert_eq!(classes.class_of(1).unwrap().index(), 1);
/// assert_eq!(classes.class_of(3).unwrap().sentinel(), -1);
/// assert!(classes.class_of(2).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryClasses {
    tags: Vec<i64>,
}

impl BoundaryClasses {
    /// Create a configuration from tags in class order.
    ///
    /// Returns an error if a tag appears twice.
    pub fn new<T: IntoIterator<Item = i64>>(tags: T) -> Result<Self> {
        let tags: Vec<i64> = tags.into_iter().collect();
        for (i, tag) in tags.iter().enumerate() {
            if tags[..i].contains(tag) {
                return Err(MeshError::invalid_param(
                    "boundary tags",
                    tag,
                    "tag listed more than once",
                ));
            }
        }
        Ok(Self { tags })
    }

    /// A configuration with no boundary classes.
    pub fn empty() -> Self {
        Self { tags: Vec::new() }
    }

    /// Number of configured classes.
    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether no classes are configured.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// The class a tag maps to, if it is configured.
    pub fn class_of(&self, tag: i64) -> Option<BoundaryClass> {
        self.tags.iter().position(|&t| t == tag).map(BoundaryClass)
    }

    /// The tag of a configured class.
    pub fn tag(&self, class: BoundaryClass) -> i64 {
        self.tags[class.0]
    }

    /// The configured tags in class order.
    pub fn tags(&self) -> &[i64] {
        &self.tags
    }

    /// Iterate over classes in configured order.
    pub fn classes(&self) -> impl Iterator<Item = BoundaryClass> + '_ {
        (0..self.tags.len()).map(BoundaryClass)
    }
}

impl Default for BoundaryClasses {
    fn default() -> Self {
        Self {
            tags: DEFAULT_TAGS.to_vec(),
        }
    }
}
