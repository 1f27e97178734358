use super::{to_coords, validate_positions, GeometryTrait};
use crate::clip::PolygonClipper;
use crate::decompose::Decomposer;
use crate::tile_range::TileRange;
use geo::{Area, LineString, MultiLineString};
use tms_common::{Bounds, Crs, Position, TileMatrixSet, TmsError, TmsResult};

/// A polygon given as an exterior ring followed by optional holes.
///
/// Ring closure is not checked; `geo` closes open rings when the polygon is
/// clipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub(super) rings: Vec<Vec<Position>>,
    pub(super) crs: Crs,
}

impl Polygon {
    pub fn new(rings: Vec<Vec<Position>>, crs: Crs) -> TmsResult<Self> {
        if rings.is_empty() {
            return Err(TmsError::invalid_geometry("Polygon needs an exterior ring"));
        }
        for ring in &rings {
            validate_positions(ring, 4, "Polygon ring")?;
        }
        Ok(Self { rings, crs })
    }

    /// Polygon without holes.
    pub fn from_exterior(exterior: Vec<Position>, crs: Crs) -> TmsResult<Self> {
        Self::new(vec![exterior], crs)
    }

    pub fn rings(&self) -> &[Vec<Position>] {
        &self.rings
    }

    pub fn exterior(&self) -> &[Position] {
        &self.rings[0]
    }

    pub fn interiors(&self) -> &[Vec<Position>] {
        &self.rings[1..]
    }

    /// The polygon as a `geo` polygon.
    pub fn to_geo_polygon(&self) -> geo::Polygon<f64> {
        geo::Polygon::new(
            LineString::new(to_coords(self.exterior())),
            self.interiors()
                .iter()
                .map(|ring| LineString::new(to_coords(ring)))
                .collect(),
        )
    }

    /// Planar area with holes subtracted.
    pub fn area(&self) -> f64 {
        self.to_geo_polygon().unsigned_area()
    }
}

impl GeometryTrait for Polygon {
    fn crs(&self) -> &Crs {
        &self.crs
    }

    fn extent(&self) -> Bounds {
        Bounds::from_positions(self.exterior())
            .unwrap_or_else(|| Bounds::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Area coverage for polygons enclosing area. Zero-area rings trace a
    /// path and are covered along that path instead.
    fn to_tile_matrix_limits_with<C: PolygonClipper>(
        &self,
        tms: &TileMatrixSet,
        tile_matrix_id: &str,
        metatile: u32,
        decomposer: &Decomposer<C>,
    ) -> TmsResult<Vec<TileRange>> {
        let polygon = self.to_geo_polygon();
        if polygon.unsigned_area() > 0.0 {
            return decomposer.decompose_area(&polygon, &self.crs, tms, tile_matrix_id, metatile);
        }

        let (exterior, interiors) = polygon.into_inner();
        let mut rings = vec![exterior];
        rings.extend(interiors);
        decomposer.decompose_path(
            &MultiLineString::new(rings),
            &self.crs,
            tms,
            tile_matrix_id,
            metatile,
        )
    }
}

impl TryFrom<(Vec<(f64, f64)>, Crs)> for Polygon {
    type Error = TmsError;

    fn try_from((coords, crs): (Vec<(f64, f64)>, Crs)) -> TmsResult<Self> {
        Polygon::from_exterior(coords.into_iter().map(Position::from).collect(), crs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tms_common::WORLD_CRS84_QUAD;

    fn polygon(coords: &[(f64, f64)]) -> Polygon {
        Polygon::try_from((coords.to_vec(), Crs::crs84())).unwrap()
    }

    fn tiles(limits: &[TileRange]) -> Vec<(u32, u32)> {
        let mut tiles: Vec<(u32, u32)> = limits
            .iter()
            .flat_map(|r| r.tiles())
            .map(|t| (t.col(), t.row()))
            .collect();
        tiles.sort_unstable();
        tiles
    }

    #[test]
    fn test_polygon_construction() {
        assert!(Polygon::new(vec![], Crs::crs84()).is_err());
        assert!(Polygon::try_from((vec![(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)], Crs::crs84())).is_err());
        assert!(Polygon::try_from((
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)],
            Crs::crs84()
        ))
        .is_err());

        let p = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        assert!((p.area() - 16.0).abs() < 1e-9);
        assert!(p.interiors().is_empty());
        assert_eq!(p.extent().to_array(), [0.0, 0.0, 4.0, 4.0]);
    }

    #[test]
    fn test_polygon_with_hole_area() {
        let outer = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)];
        let hole = [(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0), (1.0, 1.0)];
        let p = Polygon::new(
            vec![
                outer.iter().copied().map(Position::from).collect(),
                hole.iter().copied().map(Position::from).collect(),
            ],
            Crs::crs84(),
        )
        .unwrap();
        assert_eq!(p.interiors().len(), 1);
        assert!((p.area() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_triangle_limits() {
        let p = polygon(&[(-45.0, 0.0), (0.0, 45.0), (45.0, 0.0), (-45.0, 0.0)]);
        let limits = p.to_tile_matrix_limits(&WORLD_CRS84_QUAD, "2", 1).unwrap();
        assert_eq!(tiles(&limits), vec![(3, 1), (4, 1)]);
    }

    #[test]
    fn test_zero_area_polygon_traces_path() {
        // Out and back along the same segment encloses no area
        let p = polygon(&[(-170.0, 10.0), (-100.0, 10.0), (-10.0, 10.0), (-170.0, 10.0)]);
        assert_eq!(p.area(), 0.0);
        let limits = p.to_tile_matrix_limits(&WORLD_CRS84_QUAD, "2", 1).unwrap();
        assert_eq!(tiles(&limits), vec![(0, 1), (1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn test_polygon_crs_mismatch() {
        let p = Polygon::try_from((
            vec![(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (0.0, 0.0)],
            Crs::epsg(4326),
        ))
        .unwrap();
        assert!(matches!(
            p.to_tile_matrix_limits(&WORLD_CRS84_QUAD, "2", 1),
            Err(TmsError::CrsMismatch { .. })
        ));
    }
}
