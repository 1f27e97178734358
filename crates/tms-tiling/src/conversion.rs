//! Conversion between continuous positions and discrete tile indices.
//!
//! All index arithmetic runs in `f64`. Boundary detection compares against
//! the analytically computed matrix bounds with exact equality, so the edge
//! paths are only taken for positions that sit exactly on a matrix edge.

use crate::validation::{validate_finite, validate_metatile, validate_position_within, validate_tile_index};
use serde::Serialize;
use tms_common::{Bounds, CornerOfOrigin, Position, TileMatrix, TmsResult};

/// Rounding rule for positions that lie exactly on a tile boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Floor both axes. A position on the matrix far edge belongs to the
    /// last tile instead of a nonexistent next one.
    #[default]
    None,
    /// Ceil minus one on both axes, never below zero. Used for the closing
    /// corner of a box so an edge on a tile boundary does not pull in the
    /// next tile.
    Both,
    /// Ceil minus one on the column axis only.
    Col,
    /// Ceil minus one on the row axis only.
    Row,
}

impl EdgePolicy {
    fn closes_col(self) -> bool {
        matches!(self, EdgePolicy::Both | EdgePolicy::Col)
    }

    fn closes_row(self) -> bool {
        matches!(self, EdgePolicy::Both | EdgePolicy::Row)
    }
}

/// Column/row index of a (meta)tile inside one tile matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileIndex {
    pub col: u32,
    pub row: u32,
}

impl TileIndex {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// Clamp `value` into `[lo, hi]`.
pub fn clamp_value(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

/// Clamp every edge of `bounds` into `outer`.
pub(crate) fn clamp_bounds(bounds: &Bounds, outer: &Bounds) -> Bounds {
    Bounds::new(
        clamp_value(bounds.min_east, outer.min_east, outer.max_east),
        clamp_value(bounds.min_north, outer.min_north, outer.max_north),
        clamp_value(bounds.max_east, outer.min_east, outer.max_east),
        clamp_value(bounds.max_north, outer.min_north, outer.max_north),
    )
}

/// Bounding box of a region anchored at `origin`, measured in base tiles.
///
/// `origin` is the region's corner on the matrix's corner-of-origin side.
/// East always grows rightward; north shrinks downward from a top-left
/// origin and grows upward from a bottom-left one.
pub fn region_bounding_box(
    matrix: &TileMatrix,
    origin: Position,
    height_in_tiles: f64,
    width_in_tiles: f64,
) -> Bounds {
    let width = matrix.tile_span_east(1) * width_in_tiles;
    let height = matrix.tile_span_north(1) * height_in_tiles;

    match matrix.corner_of_origin {
        CornerOfOrigin::TopLeft => Bounds::new(
            origin.east,
            origin.north - height,
            origin.east + width,
            origin.north,
        ),
        CornerOfOrigin::BottomLeft => Bounds::new(
            origin.east,
            origin.north,
            origin.east + width,
            origin.north + height,
        ),
    }
}

/// Bounding box of a whole tile matrix.
pub fn tile_matrix_bounding_box(matrix: &TileMatrix) -> Bounds {
    region_bounding_box(
        matrix,
        matrix.point_of_origin,
        matrix.matrix_height as f64,
        matrix.matrix_width as f64,
    )
}

/// Map a position to the (meta)tile containing it.
///
/// Fails when the metatile is zero, the matrix is malformed, the position
/// is not finite or it lies outside the matrix bounding box.
pub fn position_to_tile_index(
    position: Position,
    matrix: &TileMatrix,
    edge_policy: EdgePolicy,
    metatile: u32,
) -> TmsResult<TileIndex> {
    validate_metatile(metatile)?;
    matrix.validate()?;
    validate_finite(&position)?;

    let bounds = tile_matrix_bounding_box(matrix);
    validate_position_within(&position, &bounds)?;

    let origin = matrix.point_of_origin;
    let col_quotient = (position.east - origin.east) / matrix.tile_span_east(metatile);
    let (row_quotient, on_far_row_edge) = match matrix.corner_of_origin {
        CornerOfOrigin::TopLeft => (
            (origin.north - position.north) / matrix.tile_span_north(metatile),
            position.north == bounds.min_north,
        ),
        CornerOfOrigin::BottomLeft => (
            (position.north - origin.north) / matrix.tile_span_north(metatile),
            position.north == bounds.max_north,
        ),
    };

    Ok(TileIndex {
        col: axis_index(
            col_quotient,
            edge_policy.closes_col(),
            position.east == bounds.max_east,
            matrix.columns(metatile),
        ),
        row: axis_index(
            row_quotient,
            edge_policy.closes_row(),
            on_far_row_edge,
            matrix.rows(metatile),
        ),
    })
}

fn axis_index(quotient: f64, closing: bool, on_far_edge: bool, count: u32) -> u32 {
    let index = if closing {
        quotient.ceil() - 1.0
    } else {
        let floor = quotient.floor();
        if on_far_edge && floor == quotient {
            floor - 1.0
        } else {
            floor
        }
    };
    clamp_value(index, 0.0, (count - 1) as f64) as u32
}

/// Position of a (meta)tile's origin-side corner.
pub fn tile_index_to_position(
    index: TileIndex,
    matrix: &TileMatrix,
    metatile: u32,
) -> TmsResult<Position> {
    validate_metatile(metatile)?;
    validate_tile_index(index.col, index.row, matrix, metatile)?;

    let origin = matrix.point_of_origin;
    let east = origin.east + index.col as f64 * matrix.tile_span_east(metatile);
    let row_offset = index.row as f64 * matrix.tile_span_north(metatile);
    let north = match matrix.corner_of_origin {
        CornerOfOrigin::TopLeft => origin.north - row_offset,
        CornerOfOrigin::BottomLeft => origin.north + row_offset,
    };
    Ok(Position::new(east, north))
}

/// First and last (meta)tile covering `bounds`.
///
/// The corner nearest the matrix origin is mapped with [`EdgePolicy::None`],
/// the opposite corner with [`EdgePolicy::Both`]. Degenerate bounds never
/// produce a last index before the first one.
pub(crate) fn bounds_to_tile_indices(
    bounds: &Bounds,
    matrix: &TileMatrix,
    metatile: u32,
) -> TmsResult<(TileIndex, TileIndex)> {
    let (first, last) = match matrix.corner_of_origin {
        CornerOfOrigin::TopLeft => (
            Position::new(bounds.min_east, bounds.max_north),
            Position::new(bounds.max_east, bounds.min_north),
        ),
        CornerOfOrigin::BottomLeft => (bounds.min(), bounds.max()),
    };

    let lo = position_to_tile_index(first, matrix, EdgePolicy::None, metatile)?;
    let hi = position_to_tile_index(last, matrix, EdgePolicy::Both, metatile)?;
    Ok((
        lo,
        TileIndex {
            col: hi.col.max(lo.col),
            row: hi.row.max(lo.row),
        },
    ))
}

/// Snap `bounds` outward onto the (meta)tile grid of `matrix`.
pub(crate) fn snap_bounds_to_cells(bounds: &Bounds, matrix: &TileMatrix, metatile: u32) -> Bounds {
    let origin = matrix.point_of_origin;
    let span_east = matrix.tile_span_east(metatile);
    let span_north = matrix.tile_span_north(metatile);

    Bounds::new(
        snap_down(bounds.min_east, origin.east, span_east),
        snap_down(bounds.min_north, origin.north, span_north),
        snap_up(bounds.max_east, origin.east, span_east),
        snap_up(bounds.max_north, origin.north, span_north),
    )
}

// Grid lines sit at `origin + k * span`. The neighbour check keeps snapping
// idempotent when the quotient of an already snapped value is off by one ulp.
fn snap_down(value: f64, origin: f64, span: f64) -> f64 {
    let mut k = ((value - origin) / span).floor();
    if origin + (k + 1.0) * span <= value {
        k += 1.0;
    }
    normalize_zero(origin + k * span)
}

fn snap_up(value: f64, origin: f64, span: f64) -> f64 {
    let mut k = ((value - origin) / span).ceil();
    if origin + (k - 1.0) * span >= value {
        k -= 1.0;
    }
    normalize_zero(origin + k * span)
}

/// Nearest grid line when closer than `tolerance`, `value` otherwise.
pub(crate) fn snap_to_grid(value: f64, origin: f64, span: f64, tolerance: f64) -> f64 {
    let line = origin + ((value - origin) / span).round() * span;
    if (value - line).abs() <= tolerance {
        normalize_zero(line)
    } else {
        value
    }
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}
