use super::{to_coords, validate_positions, GeometryTrait};
use crate::clip::PolygonClipper;
use crate::decompose::Decomposer;
use crate::tile_range::TileRange;
use geo::{LineString, MultiLineString};
use tms_common::{Bounds, Crs, Position, TileMatrixSet, TmsError, TmsResult};

/// An open path of two or more positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    positions: Vec<Position>,
    crs: Crs,
}

impl Line {
    pub fn new(positions: Vec<Position>, crs: Crs) -> TmsResult<Self> {
        validate_positions(&positions, 2, "Line")?;
        Ok(Self { positions, crs })
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// The path as a `geo` line string.
    pub fn to_line_string(&self) -> LineString<f64> {
        LineString::new(to_coords(&self.positions))
    }
}

impl GeometryTrait for Line {
    fn crs(&self) -> &Crs {
        &self.crs
    }

    fn extent(&self) -> Bounds {
        Bounds::from_positions(&self.positions)
            .unwrap_or_else(|| Bounds::new(0.0, 0.0, 0.0, 0.0))
    }

    fn to_tile_matrix_limits_with<C: PolygonClipper>(
        &self,
        tms: &TileMatrixSet,
        tile_matrix_id: &str,
        metatile: u32,
        decomposer: &Decomposer<C>,
    ) -> TmsResult<Vec<TileRange>> {
        let lines = MultiLineString::new(vec![self.to_line_string()]);
        decomposer.decompose_path(&lines, &self.crs, tms, tile_matrix_id, metatile)
    }
}

impl TryFrom<(Vec<(f64, f64)>, Crs)> for Line {
    type Error = TmsError;

    fn try_from((coords, crs): (Vec<(f64, f64)>, Crs)) -> TmsResult<Self> {
        Line::new(coords.into_iter().map(Position::from).collect(), crs)
    }
}
