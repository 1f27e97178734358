use super::{GeometryTrait, Point, Polygon};
use crate::clip::PolygonClipper;
use crate::conversion::{bounds_to_tile_indices, snap_bounds_to_cells, tile_matrix_bounding_box};
use crate::decompose::Decomposer;
use crate::tile_range::TileRange;
use crate::validation::{resolve_tile_matrix, validate_bounds_within, validate_finite};
use tms_common::{Bounds, Crs, Position, TileMatrix, TileMatrixSet, TmsError, TmsResult};

/// An axis-aligned rectangle with `max > min` on both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    bounds: Bounds,
    crs: Crs,
}

impl BoundingBox {
    pub fn new(min_east: f64, min_north: f64, max_east: f64, max_north: f64, crs: Crs) -> TmsResult<Self> {
        Self::from_bounds(Bounds::new(min_east, min_north, max_east, max_north), crs)
    }

    /// Validate raw bounds as a bounding box.
    pub fn from_bounds(bounds: Bounds, crs: Crs) -> TmsResult<Self> {
        validate_finite(&bounds.min())?;
        validate_finite(&bounds.max())?;
        if bounds.max_east <= bounds.min_east {
            return Err(TmsError::invalid_bbox(format!(
                "max east {} must be greater than min east {}",
                bounds.max_east, bounds.min_east
            )));
        }
        if bounds.max_north <= bounds.min_north {
            return Err(TmsError::invalid_bbox(format!(
                "max north {} must be greater than min north {}",
                bounds.max_north, bounds.min_north
            )));
        }
        Ok(Self { bounds, crs })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Lower left corner.
    pub fn min(&self) -> Point {
        Point {
            position: self.bounds.min(),
            crs: self.crs.clone(),
        }
    }

    /// Upper right corner.
    pub fn max(&self) -> Point {
        Point {
            position: self.bounds.max(),
            crs: self.crs.clone(),
        }
    }

    /// `[min_east, min_north, max_east, max_north]`
    pub fn to_array(&self) -> [f64; 4] {
        self.bounds.to_array()
    }

    /// Closed counter-clockwise ring starting at the lower left corner.
    pub fn to_polygon(&self) -> Polygon {
        let b = &self.bounds;
        Polygon {
            rings: vec![vec![
                Position::new(b.min_east, b.min_north),
                Position::new(b.max_east, b.min_north),
                Position::new(b.max_east, b.max_north),
                Position::new(b.min_east, b.max_north),
                Position::new(b.min_east, b.min_north),
            ]],
            crs: self.crs.clone(),
        }
    }

    /// The smallest tile range of `tile_matrix_id` covering this box.
    ///
    /// Edges lying exactly on tile boundaries do not pull in the tile
    /// beyond them.
    pub fn to_tile_range(
        &self,
        tms: &TileMatrixSet,
        tile_matrix_id: &str,
        metatile: u32,
    ) -> TmsResult<TileRange> {
        let matrix = self.resolve(tms, tile_matrix_id, metatile)?;
        let (lo, hi) = bounds_to_tile_indices(&self.bounds, matrix, metatile)?;
        Ok(TileRange::from_parts(lo, hi, tile_matrix_id.to_string(), metatile))
    }

    /// Grow this box outward to whole (meta)tile boundaries of
    /// `tile_matrix_id`.
    pub fn expand_to_tile_matrix_cells(
        &self,
        tms: &TileMatrixSet,
        tile_matrix_id: &str,
        metatile: u32,
    ) -> TmsResult<BoundingBox> {
        let matrix = self.resolve(tms, tile_matrix_id, metatile)?;
        Ok(BoundingBox {
            bounds: snap_bounds_to_cells(&self.bounds, matrix, metatile),
            crs: self.crs.clone(),
        })
    }

    fn resolve<'a>(
        &self,
        tms: &'a TileMatrixSet,
        tile_matrix_id: &str,
        metatile: u32,
    ) -> TmsResult<&'a TileMatrix> {
        let matrix = resolve_tile_matrix(tms, tile_matrix_id, metatile, Some(&self.crs))?;
        validate_bounds_within(&self.bounds, &tile_matrix_bounding_box(matrix))?;
        Ok(matrix)
    }
}

impl GeometryTrait for BoundingBox {
    fn crs(&self) -> &Crs {
        &self.crs
    }

    fn extent(&self) -> Bounds {
        self.bounds
    }

    fn to_bounding_box(&self) -> TmsResult<BoundingBox> {
        Ok(self.clone())
    }

    fn to_tile_matrix_limits_with<C: PolygonClipper>(
        &self,
        tms: &TileMatrixSet,
        tile_matrix_id: &str,
        metatile: u32,
        _decomposer: &Decomposer<C>,
    ) -> TmsResult<Vec<TileRange>> {
        Ok(vec![self.to_tile_range(tms, tile_matrix_id, metatile)?])
    }
}
