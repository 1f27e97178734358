use super::GeometryTrait;
use crate::clip::PolygonClipper;
use crate::conversion::{position_to_tile_index, tile_matrix_bounding_box, EdgePolicy};
use crate::decompose::Decomposer;
use crate::tile::Tile;
use crate::tile_range::TileRange;
use crate::validation::{resolve_tile_matrix, validate_finite, validate_position_within};
use tms_common::{Bounds, Crs, Position, TileMatrixSet, TmsResult};

/// A single position.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub(super) position: Position,
    pub(super) crs: Crs,
}

impl Point {
    pub fn new(east: f64, north: f64, crs: Crs) -> TmsResult<Self> {
        Self::from_position(Position::new(east, north), crs)
    }

    pub fn from_position(position: Position, crs: Crs) -> TmsResult<Self> {
        validate_finite(&position)?;
        Ok(Self { position, crs })
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn east(&self) -> f64 {
        self.position.east
    }

    pub fn north(&self) -> f64 {
        self.position.north
    }

    /// The (meta)tile of `tile_matrix_id` containing this point.
    pub fn to_tile(
        &self,
        tms: &TileMatrixSet,
        tile_matrix_id: &str,
        edge_policy: EdgePolicy,
        metatile: u32,
    ) -> TmsResult<Tile> {
        let matrix = resolve_tile_matrix(tms, tile_matrix_id, metatile, Some(&self.crs))?;
        validate_position_within(&self.position, &tile_matrix_bounding_box(matrix))?;

        let index = position_to_tile_index(self.position, matrix, edge_policy, metatile)?;
        Ok(Tile::from_parts(
            index.col,
            index.row,
            tile_matrix_id.to_string(),
            metatile,
        ))
    }
}

impl GeometryTrait for Point {
    fn crs(&self) -> &Crs {
        &self.crs
    }

    fn extent(&self) -> Bounds {
        Bounds::new(
            self.position.east,
            self.position.north,
            self.position.east,
            self.position.north,
        )
    }

    fn to_tile_matrix_limits_with<C: PolygonClipper>(
        &self,
        tms: &TileMatrixSet,
        tile_matrix_id: &str,
        metatile: u32,
        _decomposer: &Decomposer<C>,
    ) -> TmsResult<Vec<TileRange>> {
        let tile = self.to_tile(tms, tile_matrix_id, EdgePolicy::None, metatile)?;
        Ok(vec![TileRange::from_parts(
            tile.index(),
            tile.index(),
            tile_matrix_id.to_string(),
            metatile,
        )])
    }
}
