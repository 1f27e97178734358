//! Geometries that can be projected onto a tile matrix set.
//!
//! Every geometry carries a CRS tag and only finite coordinates. Projection
//! never reprojects: the tag must equal the tile matrix set's CRS.

mod bounding_box;
mod collection;
mod line;
mod point;
mod polygon;

pub use bounding_box::BoundingBox;
pub use collection::GeometryCollection;
pub use line::Line;
pub use point::Point;
pub use polygon::Polygon;

use crate::clip::{GeoClipper, PolygonClipper};
use crate::decompose::Decomposer;
use crate::tile_range::TileRange;
use crate::validation::validate_finite;
use tms_common::{Bounds, Crs, Position, TileMatrixSet, TmsError, TmsResult};

/// Capabilities shared by every geometry kind.
pub trait GeometryTrait {
    /// CRS the coordinates are expressed in.
    fn crs(&self) -> &Crs;

    /// Raw extent. Degenerate for points and straight lines.
    fn extent(&self) -> Bounds;

    /// Extent as a bounding box. Fails when the extent has zero width or
    /// height.
    fn to_bounding_box(&self) -> TmsResult<BoundingBox> {
        BoundingBox::from_bounds(self.extent(), self.crs().clone())
    }

    /// Non-overlapping tile ranges covering every (meta)tile this geometry
    /// touches, computed with `decomposer`.
    ///
    /// The ranges are computed eagerly. Validation and clipping errors are
    /// returned from this call, never from iterating a returned range.
    fn to_tile_matrix_limits_with<C: PolygonClipper>(
        &self,
        tms: &TileMatrixSet,
        tile_matrix_id: &str,
        metatile: u32,
        decomposer: &Decomposer<C>,
    ) -> TmsResult<Vec<TileRange>>;

    /// [`to_tile_matrix_limits_with`](Self::to_tile_matrix_limits_with) using
    /// the `geo` backed default decomposer.
    fn to_tile_matrix_limits(
        &self,
        tms: &TileMatrixSet,
        tile_matrix_id: &str,
        metatile: u32,
    ) -> TmsResult<Vec<TileRange>> {
        self.to_tile_matrix_limits_with(
            tms,
            tile_matrix_id,
            metatile,
            &Decomposer::<GeoClipper>::default(),
        )
    }
}

/// Any supported geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    Line(Line),
    Polygon(Polygon),
    BoundingBox(BoundingBox),
    Collection(GeometryCollection),
}

impl Geometry {
    /// Name of the geometry kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::Line(_) => "Line",
            Geometry::Polygon(_) => "Polygon",
            Geometry::BoundingBox(_) => "BoundingBox",
            Geometry::Collection(_) => "GeometryCollection",
        }
    }
}

impl GeometryTrait for Geometry {
    fn crs(&self) -> &Crs {
        match self {
            Geometry::Point(g) => g.crs(),
            Geometry::Line(g) => g.crs(),
            Geometry::Polygon(g) => g.crs(),
            Geometry::BoundingBox(g) => g.crs(),
            Geometry::Collection(g) => g.crs(),
        }
    }

    fn extent(&self) -> Bounds {
        match self {
            Geometry::Point(g) => g.extent(),
            Geometry::Line(g) => g.extent(),
            Geometry::Polygon(g) => g.extent(),
            Geometry::BoundingBox(g) => g.extent(),
            Geometry::Collection(g) => g.extent(),
        }
    }

    fn to_tile_matrix_limits_with<C: PolygonClipper>(
        &self,
        tms: &TileMatrixSet,
        tile_matrix_id: &str,
        metatile: u32,
        decomposer: &Decomposer<C>,
    ) -> TmsResult<Vec<TileRange>> {
        match self {
            Geometry::Point(g) => g.to_tile_matrix_limits_with(tms, tile_matrix_id, metatile, decomposer),
            Geometry::Line(g) => g.to_tile_matrix_limits_with(tms, tile_matrix_id, metatile, decomposer),
            Geometry::Polygon(g) => g.to_tile_matrix_limits_with(tms, tile_matrix_id, metatile, decomposer),
            Geometry::BoundingBox(g) => {
                g.to_tile_matrix_limits_with(tms, tile_matrix_id, metatile, decomposer)
            }
            Geometry::Collection(g) => {
                g.to_tile_matrix_limits_with(tms, tile_matrix_id, metatile, decomposer)
            }
        }
    }
}

impl From<Point> for Geometry {
    fn from(g: Point) -> Self {
        Geometry::Point(g)
    }
}

impl From<Line> for Geometry {
    fn from(g: Line) -> Self {
        Geometry::Line(g)
    }
}

impl From<Polygon> for Geometry {
    fn from(g: Polygon) -> Self {
        Geometry::Polygon(g)
    }
}

impl From<BoundingBox> for Geometry {
    fn from(g: BoundingBox) -> Self {
        Geometry::BoundingBox(g)
    }
}

impl From<GeometryCollection> for Geometry {
    fn from(g: GeometryCollection) -> Self {
        Geometry::Collection(g)
    }
}

/// Check a coordinate sequence: finite, at least `min_len` long and free of
/// consecutive duplicates.
fn validate_positions(positions: &[Position], min_len: usize, what: &str) -> TmsResult<()> {
    for position in positions {
        validate_finite(position)?;
    }
    if positions.len() < min_len {
        return Err(TmsError::invalid_geometry(format!(
            "{} needs at least {} positions, got {}",
            what,
            min_len,
            positions.len()
        )));
    }
    if let Some(i) = positions.windows(2).position(|w| w[0] == w[1]) {
        return Err(TmsError::invalid_geometry(format!(
            "{} repeats position ({}, {}) at index {}",
            what,
            positions[i].east,
            positions[i].north,
            i + 1
        )));
    }
    Ok(())
}

fn to_coords(positions: &[Position]) -> Vec<geo::Coord<f64>> {
    positions
        .iter()
        .map(|p| geo::Coord {
            x: p.east,
            y: p.north,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tms_common::WORLD_CRS84_QUAD;

    #[test]
    fn test_validate_positions() {
        let ok = [Position::new(0.0, 0.0), Position::new(1.0, 0.0)];
        assert!(validate_positions(&ok, 2, "Line").is_ok());

        let short = [Position::new(0.0, 0.0)];
        assert!(matches!(
            validate_positions(&short, 2, "Line"),
            Err(TmsError::InvalidGeometry(_))
        ));

        let repeated = [
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(1.0, 0.0),
        ];
        assert!(matches!(
            validate_positions(&repeated, 2, "Line"),
            Err(TmsError::InvalidGeometry(_))
        ));

        let nan = [Position::new(0.0, 0.0), Position::new(f64::NAN, 0.0)];
        assert!(matches!(
            validate_positions(&nan, 2, "Line"),
            Err(TmsError::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn test_geometry_enum_dispatch() {
        let tms = &*WORLD_CRS84_QUAD;
        let geometries: Vec<Geometry> = vec![
            Point::new(30.0, 30.0, Crs::crs84()).unwrap().into(),
            BoundingBox::new(-135.0, -45.0, -45.0, 45.0, Crs::crs84())
                .unwrap()
                .into(),
        ];

        assert_eq!(geometries[0].kind(), "Point");
        assert_eq!(geometries[1].kind(), "BoundingBox");

        let limits = geometries[0].to_tile_matrix_limits(tms, "3", 1).unwrap();
        assert_eq!(limits.len(), 1);
        assert_eq!((limits[0].min_col(), limits[0].min_row()), (9, 2));

        let limits = geometries[1].to_tile_matrix_limits(tms, "2", 1).unwrap();
        assert_eq!(limits.len(), 1);
        assert_eq!(limits[0].len(), 4);

        assert!(geometries[0].to_bounding_box().is_err());
        assert_eq!(
            geometries[1].to_bounding_box().unwrap().to_array(),
            [-135.0, -45.0, -45.0, 45.0]
        );
    }
}
