//! Guards shared by every public tiling operation.
//!
//! Entry points check, in this order where they apply: metatile, tile
//! matrix identifier, CRS identity, finiteness, then per-axis containment in
//! the target matrix.

use tms_common::{Axis, Bounds, Crs, Position, TileMatrix, TileMatrixSet, TmsError, TmsResult};

/// Metatile must be a positive integer.
pub fn validate_metatile(metatile: u32) -> TmsResult<()> {
    if metatile == 0 {
        return Err(TmsError::InvalidMetatile(metatile));
    }
    Ok(())
}

/// Geometry CRS must equal the tile matrix set CRS exactly.
pub fn validate_crs(expected: &Crs, found: &Crs) -> TmsResult<()> {
    if expected != found {
        return Err(TmsError::CrsMismatch {
            expected: expected.clone(),
            found: found.clone(),
        });
    }
    Ok(())
}

/// Reject NaN and infinite coordinates.
pub fn validate_finite(position: &Position) -> TmsResult<()> {
    if !position.east.is_finite() {
        return Err(TmsError::NonFiniteCoordinate {
            axis: Axis::East,
            value: position.east,
        });
    }
    if !position.north.is_finite() {
        return Err(TmsError::NonFiniteCoordinate {
            axis: Axis::North,
            value: position.north,
        });
    }
    Ok(())
}

/// Position must lie within `bounds`, edges included. East is checked first.
pub fn validate_position_within(position: &Position, bounds: &Bounds) -> TmsResult<()> {
    if position.east < bounds.min_east || position.east > bounds.max_east {
        return Err(TmsError::out_of_bounds(
            Axis::East,
            position.east,
            bounds.min_east,
            bounds.max_east,
        ));
    }
    if position.north < bounds.min_north || position.north > bounds.max_north {
        return Err(TmsError::out_of_bounds(
            Axis::North,
            position.north,
            bounds.min_north,
            bounds.max_north,
        ));
    }
    Ok(())
}

/// Both corners of `inner` must lie within `outer`.
pub fn validate_bounds_within(inner: &Bounds, outer: &Bounds) -> TmsResult<()> {
    validate_position_within(&inner.min(), outer)?;
    validate_position_within(&inner.max(), outer)
}

/// Tile index must address an existing (meta)tile of `matrix`.
pub fn validate_tile_index(col: u32, row: u32, matrix: &TileMatrix, metatile: u32) -> TmsResult<()> {
    let columns = matrix.columns(metatile);
    let rows = matrix.rows(metatile);
    if col >= columns {
        return Err(TmsError::invalid_tile_index(format!(
            "column {} exceeds {} columns of tile matrix '{}' at metatile {}",
            col, columns, matrix.identifier, metatile
        )));
    }
    if row >= rows {
        return Err(TmsError::invalid_tile_index(format!(
            "row {} exceeds {} rows of tile matrix '{}' at metatile {}",
            row, rows, matrix.identifier, metatile
        )));
    }
    Ok(())
}

/// Resolve a tile matrix after checking metatile, identifier and CRS.
pub(crate) fn resolve_tile_matrix<'a>(
    tms: &'a TileMatrixSet,
    tile_matrix_id: &str,
    metatile: u32,
    crs: Option<&Crs>,
) -> TmsResult<&'a TileMatrix> {
    validate_metatile(metatile)?;
    let matrix = tms.tile_matrix(tile_matrix_id)?;
    if let Some(crs) = crs {
        validate_crs(tms.crs(), crs)?;
    }
    Ok(matrix)
}
