//! A single addressable (meta)tile.

use crate::conversion::{
    clamp_bounds, region_bounding_box, tile_index_to_position, tile_matrix_bounding_box,
    TileIndex,
};
use crate::geometry::BoundingBox;
use crate::tile_range::TileRange;
use crate::validation::{resolve_tile_matrix, validate_tile_index};
use serde::Serialize;
use std::fmt;
use tms_common::{Bounds, TileMatrixSet, TmsResult};

/// A (meta)tile of one tile matrix.
///
/// A metatile of `n` groups an `n`×`n` block of base tiles; its column and
/// row count in metatile units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    col: u32,
    row: u32,
    tile_matrix: String,
    metatile: u32,
}

impl Tile {
    /// Create a tile after checking it addresses an existing (meta)tile of
    /// `tile_matrix_id` in `tms`.
    pub fn new(
        col: u32,
        row: u32,
        tile_matrix_id: impl Into<String>,
        metatile: u32,
        tms: &TileMatrixSet,
    ) -> TmsResult<Self> {
        let tile_matrix = tile_matrix_id.into();
        let matrix = resolve_tile_matrix(tms, &tile_matrix, metatile, None)?;
        validate_tile_index(col, row, matrix, metatile)?;
        Ok(Self::from_parts(col, row, tile_matrix, metatile))
    }

    pub(crate) fn from_parts(col: u32, row: u32, tile_matrix: String, metatile: u32) -> Self {
        Self {
            col,
            row,
            tile_matrix,
            metatile,
        }
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn tile_matrix_id(&self) -> &str {
        &self.tile_matrix
    }

    pub fn metatile(&self) -> u32 {
        self.metatile
    }

    pub fn index(&self) -> TileIndex {
        TileIndex::new(self.col, self.row)
    }

    /// Generate a cache key string.
    pub fn cache_key(&self) -> String {
        if self.metatile == 1 {
            format!("{}/{}/{}", self.tile_matrix, self.col, self.row)
        } else {
            format!(
                "{}/{}/{}@{}",
                self.tile_matrix, self.col, self.row, self.metatile
            )
        }
    }

    /// Raw extent of this tile.
    ///
    /// A metatile at the matrix edge may overshoot the matrix extent;
    /// `clamp` trims it back to the matrix bounding box.
    pub fn bounds(&self, tms: &TileMatrixSet, clamp: bool) -> TmsResult<Bounds> {
        let matrix = tms.tile_matrix(&self.tile_matrix)?;
        let origin = tile_index_to_position(self.index(), matrix, self.metatile)?;
        let size = self.metatile as f64;
        let bounds = region_bounding_box(matrix, origin, size, size);

        if clamp {
            Ok(clamp_bounds(&bounds, &tile_matrix_bounding_box(matrix)))
        } else {
            Ok(bounds)
        }
    }

    /// Bounding box of this tile in the tile matrix set's CRS.
    pub fn to_bounding_box(&self, tms: &TileMatrixSet, clamp: bool) -> TmsResult<BoundingBox> {
        BoundingBox::from_bounds(self.bounds(tms, clamp)?, tms.crs().clone())
    }

    /// Tiles of `target_tile_matrix_id` needed to fully cover this tile.
    ///
    /// Used to walk the pyramid: a finer target yields a block of children,
    /// a coarser one the enclosing parent.
    pub fn to_tile_range(
        &self,
        tms: &TileMatrixSet,
        target_tile_matrix_id: &str,
        metatile: u32,
    ) -> TmsResult<TileRange> {
        self.to_bounding_box(tms, true)?
            .to_tile_range(tms, target_tile_matrix_id, metatile)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cache_key())
    }
}
