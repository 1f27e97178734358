//! Closed rectangles of (meta)tile indices ("tile matrix limits").

use crate::conversion::{
    clamp_bounds, region_bounding_box, tile_index_to_position, tile_matrix_bounding_box,
    TileIndex,
};
use crate::geometry::BoundingBox;
use crate::tile::Tile;
use crate::validation::{resolve_tile_matrix, validate_tile_index};
use serde::Serialize;
use std::iter::FusedIterator;
use tms_common::{Bounds, TileMatrixSet, TmsError, TmsResult};

/// An inclusive rectangle of (meta)tiles in one tile matrix.
///
/// Serializes with the OGC tile matrix limits field names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRange {
    tile_matrix: String,
    #[serde(rename = "minTileRow")]
    min_row: u32,
    #[serde(rename = "maxTileRow")]
    max_row: u32,
    #[serde(rename = "minTileCol")]
    min_col: u32,
    #[serde(rename = "maxTileCol")]
    max_col: u32,
    metatile: u32,
}

impl TileRange {
    /// Create a validated tile range.
    ///
    /// Fails when a minimum exceeds its maximum, when the metatile is zero
    /// or when either corner lies outside the matrix at that metatile.
    pub fn new(
        min_col: u32,
        min_row: u32,
        max_col: u32,
        max_row: u32,
        tile_matrix_id: impl Into<String>,
        metatile: u32,
        tms: &TileMatrixSet,
    ) -> TmsResult<Self> {
        let tile_matrix = tile_matrix_id.into();
        let matrix = resolve_tile_matrix(tms, &tile_matrix, metatile, None)?;

        if min_col > max_col {
            return Err(TmsError::invalid_tile_index(format!(
                "minTileCol {} is greater than maxTileCol {}",
                min_col, max_col
            )));
        }
        if min_row > max_row {
            return Err(TmsError::invalid_tile_index(format!(
                "minTileRow {} is greater than maxTileRow {}",
                min_row, max_row
            )));
        }
        validate_tile_index(min_col, min_row, matrix, metatile)?;
        validate_tile_index(max_col, max_row, matrix, metatile)?;

        Ok(Self::from_parts(
            TileIndex::new(min_col, min_row),
            TileIndex::new(max_col, max_row),
            tile_matrix,
            metatile,
        ))
    }

    /// Build from indices already known to be ordered and in range.
    pub(crate) fn from_parts(
        min: TileIndex,
        max: TileIndex,
        tile_matrix: String,
        metatile: u32,
    ) -> Self {
        Self {
            tile_matrix,
            min_row: min.row,
            max_row: max.row,
            min_col: min.col,
            max_col: max.col,
            metatile,
        }
    }

    pub fn min_col(&self) -> u32 {
        self.min_col
    }

    pub fn min_row(&self) -> u32 {
        self.min_row
    }

    pub fn max_col(&self) -> u32 {
        self.max_col
    }

    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    pub fn tile_matrix_id(&self) -> &str {
        &self.tile_matrix
    }

    pub fn metatile(&self) -> u32 {
        self.metatile
    }

    /// Number of columns covered.
    pub fn col_span(&self) -> u32 {
        self.max_col - self.min_col + 1
    }

    /// Number of rows covered.
    pub fn row_span(&self) -> u32 {
        self.max_row - self.min_row + 1
    }

    /// Number of (meta)tiles in the range.
    pub fn len(&self) -> u64 {
        self.col_span() as u64 * self.row_span() as u64
    }

    /// A tile range always holds at least one tile.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, col: u32, row: u32) -> bool {
        (self.min_col..=self.max_col).contains(&col) && (self.min_row..=self.max_row).contains(&row)
    }

    /// Lazily yield every tile, row by row.
    ///
    /// Each call starts a fresh traversal with its own cursor.
    pub fn tiles(&self) -> TileIter<'_> {
        TileIter {
            range: self,
            col: self.min_col,
            row: self.min_row,
            done: false,
        }
    }

    /// Raw extent of the union of all tiles in the range.
    ///
    /// Width and height are `(max - min + 1) * metatile` base tiles, the
    /// full footprint of every metatile in the range. Do not replace this
    /// with `(max - min) * metatile + 1`, which only agrees for metatile 1
    /// and cuts the last metatile short otherwise.
    pub fn bounds(&self, tms: &TileMatrixSet, clamp: bool) -> TmsResult<Bounds> {
        let matrix = tms.tile_matrix(&self.tile_matrix)?;
        let origin = tile_index_to_position(
            TileIndex::new(self.min_col, self.min_row),
            matrix,
            self.metatile,
        )?;
        let metatile = self.metatile as f64;
        let bounds = region_bounding_box(
            matrix,
            origin,
            self.row_span() as f64 * metatile,
            self.col_span() as f64 * metatile,
        );

        if clamp {
            Ok(clamp_bounds(&bounds, &tile_matrix_bounding_box(matrix)))
        } else {
            Ok(bounds)
        }
    }

    /// Bounding box of the union of all tiles in the tile matrix set's CRS.
    pub fn to_bounding_box(&self, tms: &TileMatrixSet, clamp: bool) -> TmsResult<BoundingBox> {
        BoundingBox::from_bounds(self.bounds(tms, clamp)?, tms.crs().clone())
    }
}

impl<'a> IntoIterator for &'a TileRange {
    type Item = Tile;
    type IntoIter = TileIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles()
    }
}

/// Row-major iterator over the tiles of a [`TileRange`].
#[derive(Debug, Clone)]
pub struct TileIter<'a> {
    range: &'a TileRange,
    col: u32,
    row: u32,
    done: bool,
}

impl Iterator for TileIter<'_> {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        if self.done {
            return None;
        }

        let tile = Tile::from_parts(
            self.col,
            self.row,
            self.range.tile_matrix.clone(),
            self.range.metatile,
        );

        if self.col < self.range.max_col {
            self.col += 1;
        } else if self.row < self.range.max_row {
            self.col = self.range.min_col;
            self.row += 1;
        } else {
            self.done = true;
        }

        Some(tile)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let rows_after = (self.range.max_row - self.row) as u64;
        let in_row = (self.range.max_col - self.col + 1) as u64;
        let remaining = rows_after * self.range.col_span() as u64 + in_row;
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for TileIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use tms_common::WORLD_CRS84_QUAD;

    fn range(min_col: u32, min_row: u32, max_col: u32, max_row: u32, id: &str) -> TileRange {
        TileRange::new(min_col, min_row, max_col, max_row, id, 1, &WORLD_CRS84_QUAD).unwrap()
    }

    #[test]
    fn test_tile_range_new_validates() {
        let tms = &*WORLD_CRS84_QUAD;
        assert!(TileRange::new(0, 0, 7, 3, "2", 1, tms).is_ok());
        assert!(matches!(
            TileRange::new(3, 0, 2, 0, "2", 1, tms),
            Err(TmsError::InvalidTileIndex(_))
        ));
        assert!(matches!(
            TileRange::new(0, 2, 0, 1, "2", 1, tms),
            Err(TmsError::InvalidTileIndex(_))
        ));
        assert!(matches!(
            TileRange::new(0, 0, 8, 3, "2", 1, tms),
            Err(TmsError::InvalidTileIndex(_))
        ));
        assert!(matches!(
            TileRange::new(0, 0, 4, 1, "2", 2, tms),
            Err(TmsError::InvalidTileIndex(_))
        ));
        assert_eq!(
            TileRange::new(0, 0, 0, 0, "2", 0, tms),
            Err(TmsError::InvalidMetatile(0))
        );
    }

    #[test]
    fn test_tiles_row_major() {
        let r = range(1, 1, 2, 2, "2");
        let tiles: Vec<(u32, u32)> = r.tiles().map(|t| (t.col(), t.row())).collect();
        assert_eq!(tiles, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
        assert!(r.tiles().all(|t| t.tile_matrix_id() == "2" && t.metatile() == 1));
    }

    #[test]
    fn test_tiles_restartable() {
        let r = range(0, 0, 7, 3, "2");
        let mut first = r.tiles();
        first.next();
        first.next();

        // A second traversal does not share the first cursor
        assert_eq!(r.tiles().count(), 32);
        assert_eq!(first.count(), 30);
        assert_eq!((&r).into_iter().count(), 32);
    }

    #[test]
    fn test_tiles_size_hint() {
        let r = range(2, 1, 4, 3, "3");
        let mut iter = r.tiles();
        assert_eq!(iter.size_hint(), (9, Some(9)));
        iter.nth(3);
        assert_eq!(iter.size_hint(), (5, Some(5)));
        assert_eq!(iter.by_ref().count(), 5);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_single_tile_range() {
        let r = range(5, 2, 5, 2, "2");
        assert_eq!(r.len(), 1);
        assert!(!r.is_empty());
        assert!(r.contains(5, 2));
        assert!(!r.contains(5, 3));
        assert_eq!(r.tiles().count(), 1);
    }

    #[test]
    fn test_range_bounding_box() {
        let bbox = range(1, 1, 2, 2, "2")
            .to_bounding_box(&WORLD_CRS84_QUAD, false)
            .unwrap();
        assert_eq!(bbox.to_array(), [-135.0, -45.0, -45.0, 45.0]);

        let bbox = range(0, 0, 7, 3, "2")
            .to_bounding_box(&WORLD_CRS84_QUAD, true)
            .unwrap();
        assert_eq!(bbox.to_array(), [-180.0, -90.0, 180.0, 90.0]);
    }

    #[test]
    fn test_metatile_range_bounding_box() {
        let tms = &*WORLD_CRS84_QUAD;
        let r = TileRange::new(1, 0, 2, 1, "2", 3, tms).unwrap();
        let raw = r.bounds(tms, false).unwrap();
        assert_eq!(raw.to_array(), [-45.0, -180.0, 225.0, 90.0]);
        let clamped = r.bounds(tms, true).unwrap();
        assert_eq!(clamped.to_array(), [-45.0, -90.0, 180.0, 90.0]);
    }

    #[test]
    fn test_tile_range_serialize() {
        let json = serde_json::to_value(range(1, 2, 3, 3, "2")).unwrap();
        assert_eq!(json["tileMatrix"], "2");
        assert_eq!(json["minTileRow"], 2);
        assert_eq!(json["maxTileRow"], 3);
        assert_eq!(json["minTileCol"], 1);
        assert_eq!(json["maxTileCol"], 3);
        assert_eq!(json["metatile"], 1);
    }
}
