//! Vertices of the triangulation arena.
//!
//! A [`Vertex`] wraps an input [`Point`] together with the index it had in the
//! caller's point slice and a back-reference to one incident cell. Exactly one
//! vertex per triangulation is the sentinel *infinite vertex*; it carries a
//! placeholder point and is recognized by its flag, never by a missing value.

use super::triangulation_data_structure::CellKey;
use crate::geometry::point::Point;

/// A vertex stored in the triangulation data structure.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    point: Point,
    input_index: Option<usize>,
    /// One cell containing this vertex, used as a traversal entry point.
    pub(crate) incident_cell: Option<CellKey>,
    infinite: bool,
}

impl Vertex {
    /// Creates a finite vertex for the input point at `input_index`.
    #[must_use]
    pub const fn new(point: Point, input_index: usize) -> Self {
        Self {
            point,
            input_index: Some(input_index),
            incident_cell: None,
            infinite: false,
        }
    }

    /// Creates the sentinel vertex at infinity.
    #[must_use]
    pub const fn infinite() -> Self {
        Self {
            point: Point::origin(),
            input_index: None,
            incident_cell: None,
            infinite: true,
        }
    }

    /// The vertex position. Meaningless for the infinite vertex.
    #[must_use]
    #[inline]
    pub const fn point(&self) -> &Point {
        &self.point
    }

    /// Index of this vertex in the input point slice (`None` for the infinite vertex).
    #[must_use]
    #[inline]
    pub const fn input_index(&self) -> Option<usize> {
        self.input_index
    }

    /// One cell incident to this vertex, if the vertex has been linked yet.
    #[must_use]
    #[inline]
    pub const fn incident_cell(&self) -> Option<CellKey> {
        self.incident_cell
    }

    /// Returns `true` for the sentinel point at infinity.
    #[must_use]
    #[inline]
    pub const fn is_infinite(&self) -> bool {
        self.infinite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_vertex_keeps_its_input_index() {
        let v = Vertex::new(Point::new([1.0, 2.0, 3.0]), 7);
        assert_eq!(v.input_index(), Some(7));
        assert!(!v.is_infinite());
        assert!(v.incident_cell().is_none());
        assert_eq!(v.point(), &Point::new([1.0, 2.0, 3.0]));
    }

    #[test]
    fn infinite_vertex_is_flagged() {
        let v = Vertex::infinite();
        assert!(v.is_infinite());
        assert_eq!(v.input_index(), None);
    }
}
