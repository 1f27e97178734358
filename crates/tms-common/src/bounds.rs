//! Positions and raw extents in a tile matrix set's CRS.

use serde::{Deserialize, Serialize};

/// A position (east, north) in the coordinate units of a CRS.
///
/// Serialized as a two-element array, the way `pointOfOrigin` is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub east: f64,
    pub north: f64,
}

impl Position {
    pub fn new(east: f64, north: f64) -> Self {
        Self { east, north }
    }

    /// Both components are neither NaN nor infinite.
    pub fn is_finite(&self) -> bool {
        self.east.is_finite() && self.north.is_finite()
    }
}

impl From<[f64; 2]> for Position {
    fn from([east, north]: [f64; 2]) -> Self {
        Self { east, north }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.east, p.north]
    }
}

impl From<(f64, f64)> for Position {
    fn from((east, north): (f64, f64)) -> Self {
        Self { east, north }
    }
}

/// An axis-aligned extent `[min_east, min_north, max_east, max_north]`.
///
/// Unlike the geometry bounding box this carries no CRS and may be
/// degenerate (zero width or height), which is what a point or a straight
/// line produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Bounds {
    pub min_east: f64,
    pub min_north: f64,
    pub max_east: f64,
    pub max_north: f64,
}

impl Bounds {
    /// Create bounds from corner coordinates.
    pub fn new(min_east: f64, min_north: f64, max_east: f64, max_north: f64) -> Self {
        Self {
            min_east,
            min_north,
            max_east,
            max_north,
        }
    }

    /// Smallest bounds enclosing all positions, `None` when empty.
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a Position>) -> Option<Self> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds::new(first.east, first.north, first.east, first.north);
        for p in iter {
            bounds.extend(p);
        }
        Some(bounds)
    }

    /// Grow to include a position.
    pub fn extend(&mut self, p: &Position) {
        self.min_east = self.min_east.min(p.east);
        self.min_north = self.min_north.min(p.north);
        self.max_east = self.max_east.max(p.east);
        self.max_north = self.max_north.max(p.north);
    }

    /// Smallest bounds enclosing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_east: self.min_east.min(other.min_east),
            min_north: self.min_north.min(other.min_north),
            max_east: self.max_east.max(other.max_east),
            max_north: self.max_north.max(other.max_north),
        }
    }

    pub fn min(&self) -> Position {
        Position::new(self.min_east, self.min_north)
    }

    pub fn max(&self) -> Position {
        Position::new(self.max_east, self.max_north)
    }

    /// Width in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_east - self.min_east
    }

    /// Height in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_north - self.min_north
    }

    /// Check if this extent overlaps another with positive area.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_east < other.max_east
            && self.max_east > other.min_east
            && self.min_north < other.max_north
            && self.max_north > other.min_north
    }

    /// Compute the intersection of two extents.
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        if !self.intersects(other) {
            return None;
        }

        Some(Bounds {
            min_east: self.min_east.max(other.min_east),
            min_north: self.min_north.max(other.min_north),
            max_east: self.max_east.min(other.max_east),
            max_north: self.max_north.min(other.max_north),
        })
    }

    /// Check if a position lies within this extent, edges included.
    pub fn contains(&self, p: &Position) -> bool {
        p.east >= self.min_east
            && p.east <= self.max_east
            && p.north >= self.min_north
            && p.north <= self.max_north
    }

    /// `[min_east, min_north, max_east, max_north]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_east, self.min_north, self.max_east, self.max_north]
    }
}

impl From<[f64; 4]> for Bounds {
    fn from([min_east, min_north, max_east, max_north]: [f64; 4]) -> Self {
        Self::new(min_east, min_north, max_east, max_north)
    }
}

impl From<Bounds> for [f64; 4] {
    fn from(b: Bounds) -> Self {
        b.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_positions() {
        let positions = [
            Position::new(10.0, -5.0),
            Position::new(-20.0, 7.5),
            Position::new(3.0, 2.0),
        ];
        let bounds = Bounds::from_positions(&positions).unwrap();
        assert_eq!(bounds.to_array(), [-20.0, -5.0, 10.0, 7.5]);
        assert!(Bounds::from_positions(&[]).is_none());
    }

    #[test]
    fn test_intersection() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(5.0, 5.0, 15.0, 15.0);
        let c = Bounds::new(10.0, 0.0, 20.0, 10.0);

        assert!(a.intersects(&b));
        // Touching edges have no common area
        assert!(!a.intersects(&c));

        let intersection = a.intersection(&b).unwrap();
        assert_eq!(intersection.to_array(), [5.0, 5.0, 10.0, 10.0]);
        assert!(a.intersection(&c).is_none());
    }

    #[test]
    fn test_contains_edges() {
        let a = Bounds::new(-180.0, -90.0, 180.0, 90.0);
        assert!(a.contains(&Position::new(180.0, -90.0)));
        assert!(!a.contains(&Position::new(180.000001, 0.0)));
    }

    #[test]
    fn test_serde_array_form() {
        let p: Position = serde_json::from_str("[-180.0, 90.0]").unwrap();
        assert_eq!(p, Position::new(-180.0, 90.0));
        let b = Bounds::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(serde_json::to_string(&b).unwrap(), "[1.0,2.0,3.0,4.0]");
    }
}
