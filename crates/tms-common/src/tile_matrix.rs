//! A single tile matrix (zoom level) definition.

use crate::{Position, TmsError, TmsResult};
use serde::{Deserialize, Serialize};

/// Which corner of the matrix the (0, 0) tile is anchored to.
///
/// Columns always grow eastward. Rows grow southward from a top-left origin
/// and northward from a bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum CornerOfOrigin {
    #[default]
    TopLeft,
    BottomLeft,
}

/// Per-row coalescing descriptor of a variable-width matrix.
///
/// Decoded and kept for round-tripping; the tiling algorithms treat every
/// matrix as a regular grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableMatrixWidth {
    pub coalesce: u32,
    pub min_tile_row: u32,
    pub max_tile_row: u32,
}

/// One resolution level of a tile matrix set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileMatrix {
    /// Identifier (usually the zoom level as string)
    #[serde(rename = "id")]
    pub identifier: String,

    /// Scale denominator
    pub scale_denominator: f64,

    /// Ground units per pixel
    pub cell_size: f64,

    /// Corner the point of origin refers to
    #[serde(default)]
    pub corner_of_origin: CornerOfOrigin,

    /// Position of the origin corner in the set's CRS
    pub point_of_origin: Position,

    /// Tile width in pixels
    pub tile_width: u32,

    /// Tile height in pixels
    pub tile_height: u32,

    /// Number of tile columns
    pub matrix_width: u32,

    /// Number of tile rows
    pub matrix_height: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_matrix_widths: Option<Vec<VariableMatrixWidth>>,
}

impl TileMatrix {
    /// Ground width of one (meta)tile.
    pub fn tile_span_east(&self, metatile: u32) -> f64 {
        self.cell_size * self.tile_width as f64 * metatile as f64
    }

    /// Ground height of one (meta)tile.
    pub fn tile_span_north(&self, metatile: u32) -> f64 {
        self.cell_size * self.tile_height as f64 * metatile as f64
    }

    /// Number of (meta)tile columns. `metatile` must be positive.
    pub fn columns(&self, metatile: u32) -> u32 {
        self.matrix_width.div_ceil(metatile)
    }

    /// Number of (meta)tile rows. `metatile` must be positive.
    pub fn rows(&self, metatile: u32) -> u32 {
        self.matrix_height.div_ceil(metatile)
    }

    /// Check the well-formedness invariants of this matrix.
    pub fn validate(&self) -> TmsResult<()> {
        let fail = |message: &str| Err(TmsError::invalid_tile_matrix(&self.identifier, message));

        if self.identifier.is_empty() {
            return fail("identifier must not be empty");
        }
        if self.tile_width == 0 || self.tile_height == 0 {
            return fail("tileWidth and tileHeight must be >= 1");
        }
        if self.matrix_width == 0 || self.matrix_height == 0 {
            return fail("matrixWidth and matrixHeight must be >= 1");
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return fail("cellSize must be a finite number > 0");
        }
        if !(self.scale_denominator.is_finite() && self.scale_denominator > 0.0) {
            return fail("scaleDenominator must be a finite number > 0");
        }
        if !self.point_of_origin.is_finite() {
            return fail("pointOfOrigin must be finite");
        }
        Ok(())
    }
}
