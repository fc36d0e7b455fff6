//! Vertex identity and attributes of a layered mesh graph.
//!
//! `VertexId` wraps a nonzero `u64` so `Option<VertexId>` costs nothing and
//! 0 stays free as a sentinel. Attributes are the three facts every
//! production reads: layer, label and 2D position.

use std::{fmt, num::NonZeroU64};

use serde::{Deserialize, Serialize};

use crate::grammar_error::GrammarError;

/// Stable, unique handle of a graph vertex.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct VertexId(NonZeroU64);

impl VertexId {
    /// Creates a `VertexId` from a raw value, rejecting 0.
    ///
    /// ```rust
    /// # use mesh_grammar::graph::vertex::VertexId;
    /// let v = VertexId::new(7).unwrap();
    /// assert_eq!(v.get(), 7);
    /// assert!(VertexId::new(0).is_err());
    /// ```
    #[inline]
    pub fn new(raw: u64) -> Result<Self, GrammarError> {
        NonZeroU64::new(raw)
            .map(VertexId)
            .ok_or(GrammarError::InvalidVertexId)
    }

    /// Returns the raw `u64`.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl From<NonZeroU64> for VertexId {
    #[inline]
    fn from(raw: NonZeroU64) -> Self {
        VertexId(raw)
    }
}

impl fmt::Debug for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VertexId").field(&self.get()).finish()
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Vertex label.
///
/// The three structural labels have fixed single-letter spellings; any other
/// letter is carried as [`Label::Other`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Label {
    /// `i`: a promoted, subdivided coarse element.
    UpperElement,
    /// `I`: a child interior marker, or an element not yet subdivided.
    LowerElement,
    /// `E`: an ordinary boundary/interior point.
    Regular,
    /// Any other label.
    Other(char),
}

impl Label {
    /// Single-letter spelling.
    pub const fn symbol(self) -> char {
        match self {
            Label::UpperElement => 'i',
            Label::LowerElement => 'I',
            Label::Regular => 'E',
            Label::Other(c) => c,
        }
    }

    /// Parses a single-letter spelling.
    pub const fn from_symbol(c: char) -> Self {
        match c {
            'i' => Label::UpperElement,
            'I' => Label::LowerElement,
            'E' => Label::Regular,
            other => Label::Other(other),
        }
    }

    /// True for `UpperElement` and `LowerElement`.
    pub const fn is_marker(self) -> bool {
        matches!(self, Label::UpperElement | Label::LowerElement)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.symbol())
    }
}

impl From<char> for Label {
    fn from(c: char) -> Self {
        Label::from_symbol(c)
    }
}

/// A point in the plane.
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Position) -> Position {
        Position::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn centroid(points: [Position; 3]) -> Position {
        let [a, b, c] = points;
        Position::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
    }

    pub fn distance_squared(self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Coordinate-wise comparison within `tolerance`.
    ///
    /// A tolerance of `0.0` is exact equality.
    #[inline]
    pub fn coincides(self, other: Position, tolerance: f64) -> bool {
        if tolerance == 0.0 {
            return self == other;
        }
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Position::new(x, y)
    }
}

/// Per-vertex record.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct VertexAttrs {
    pub layer: u32,
    pub label: Label,
    pub position: Position,
}

impl VertexAttrs {
    pub fn new(layer: u32, label: Label, position: impl Into<Position>) -> Self {
        Self {
            layer,
            label,
            position: position.into(),
        }
    }
}
