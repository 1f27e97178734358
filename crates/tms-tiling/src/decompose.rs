//! Decomposition of polygons and lines into non-overlapping tile ranges.
//!
//! The covering range of the geometry's extent is cut into one-tile-wide
//! strips along its shorter axis. Each strip is clipped against the
//! geometry, and the bounding box of every clipped fragment gives the
//! tile interval it occupies across the strip. Intervals inside a strip are
//! merged, so no tile is emitted twice.

use crate::clip::{GeoClipper, PolygonClipper};
use crate::conversion::{
    bounds_to_tile_indices, clamp_bounds, snap_to_grid, tile_matrix_bounding_box, TileIndex,
};
use crate::tile_range::TileRange;
use crate::validation::{resolve_tile_matrix, validate_bounds_within};
use geo::{Area, BoundingRect, MultiLineString, Polygon, Rect};
use tms_common::{Bounds, Crs, SweepAxis, TileMatrix, TileMatrixSet, TilingConfig, TmsResult};
use tracing::{debug, trace};

/// Which kind of coverage a geometry asks for.
#[derive(Debug, Clone, Copy)]
enum Shape<'g> {
    /// Tiles touched by the interior or boundary of a polygon.
    Area(&'g Polygon<f64>),
    /// Tiles touched by a path.
    Path(&'g MultiLineString<f64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Columns,
    Rows,
}

/// Strip-sweep decomposition engine.
///
/// Holds the clipping backend and the tiling configuration. Stateless
/// between calls, so one instance can serve any number of geometries.
#[derive(Debug, Clone)]
pub struct Decomposer<C = GeoClipper> {
    clipper: C,
    config: TilingConfig,
}

impl Default for Decomposer<GeoClipper> {
    fn default() -> Self {
        Self {
            clipper: GeoClipper,
            config: TilingConfig::default(),
        }
    }
}

impl<C: PolygonClipper> Decomposer<C> {
    /// Create a decomposer after validating `config`.
    pub fn new(clipper: C, config: TilingConfig) -> TmsResult<Self> {
        config.validate()?;
        Ok(Self { clipper, config })
    }

    /// Create a decomposer with the default configuration.
    pub fn with_clipper(clipper: C) -> Self {
        Self {
            clipper,
            config: TilingConfig::default(),
        }
    }

    pub fn config(&self) -> &TilingConfig {
        &self.config
    }

    pub fn clipper(&self) -> &C {
        &self.clipper
    }

    /// Tile ranges covering every (meta)tile that intersects `polygon`.
    ///
    /// `crs` is the CRS tag of the geometry `polygon` was built from and
    /// must equal the tile matrix set's CRS.
    pub fn decompose_area(
        &self,
        polygon: &Polygon<f64>,
        crs: &Crs,
        tms: &TileMatrixSet,
        tile_matrix_id: &str,
        metatile: u32,
    ) -> TmsResult<Vec<TileRange>> {
        let extent = polygon.bounding_rect().map(rect_bounds);
        self.decompose(Shape::Area(polygon), extent, crs, tms, tile_matrix_id, metatile)
    }

    /// Tile ranges covering every (meta)tile that `lines` passes through.
    pub fn decompose_path(
        &self,
        lines: &MultiLineString<f64>,
        crs: &Crs,
        tms: &TileMatrixSet,
        tile_matrix_id: &str,
        metatile: u32,
    ) -> TmsResult<Vec<TileRange>> {
        let extent = lines.bounding_rect().map(rect_bounds);
        self.decompose(Shape::Path(lines), extent, crs, tms, tile_matrix_id, metatile)
    }

    fn decompose(
        &self,
        shape: Shape<'_>,
        extent: Option<Bounds>,
        crs: &Crs,
        tms: &TileMatrixSet,
        tile_matrix_id: &str,
        metatile: u32,
    ) -> TmsResult<Vec<TileRange>> {
        let matrix = resolve_tile_matrix(tms, tile_matrix_id, metatile, Some(crs))?;
        let Some(extent) = extent else {
            return Ok(Vec::new());
        };
        validate_bounds_within(&extent, &tile_matrix_bounding_box(matrix))?;

        let (lo, hi) = bounds_to_tile_indices(&extent, matrix, metatile)?;
        let covering = TileRange::from_parts(lo, hi, tile_matrix_id.to_string(), metatile);

        if covering.len() == 1 || shape.fills(&extent) {
            debug!(
                tile_matrix = tile_matrix_id,
                tiles = covering.len(),
                "Geometry covered by a single tile range"
            );
            return Ok(vec![covering]);
        }

        let orientation = self.orientation(&covering);
        let strips = match orientation {
            Orientation::Columns => lo.col..=hi.col,
            Orientation::Rows => lo.row..=hi.row,
        };

        debug!(
            tile_matrix = tile_matrix_id,
            metatile = metatile,
            orientation = ?orientation,
            strips = strips.clone().count(),
            "Sweeping covering range"
        );

        let mut ranges = Vec::new();
        for index in strips {
            let (strip_min, strip_max) = match orientation {
                Orientation::Columns => (TileIndex::new(index, lo.row), TileIndex::new(index, hi.row)),
                Orientation::Rows => (TileIndex::new(lo.col, index), TileIndex::new(hi.col, index)),
            };
            let strip = TileRange::from_parts(strip_min, strip_max, tile_matrix_id.to_string(), metatile);
            let strip_bounds = strip.bounds(tms, true)?;

            let fragments = self.fragments(shape, &strip_bounds);
            let tolerance = self.snap_distance(&extent.union(&strip_bounds));
            let mut intervals = Vec::with_capacity(fragments.len());
            for fragment in &fragments {
                let snapped = self.snap(fragment, matrix, metatile, tolerance);
                let fragment = clamp_bounds(&snapped, &strip_bounds);
                let (first, last) = bounds_to_tile_indices(&fragment, matrix, metatile)?;
                let interval = match orientation {
                    Orientation::Columns => (first.row.max(lo.row), last.row.min(hi.row)),
                    Orientation::Rows => (first.col.max(lo.col), last.col.min(hi.col)),
                };
                if interval.0 <= interval.1 {
                    intervals.push(interval);
                }
            }

            let merged = merge_intervals(intervals, self.config.merge_touching_ranges);
            trace!(
                strip = index,
                fragments = fragments.len(),
                ranges = merged.len(),
                "Strip decomposed"
            );

            for (start, end) in merged {
                let (min, max) = match orientation {
                    Orientation::Columns => (TileIndex::new(index, start), TileIndex::new(index, end)),
                    Orientation::Rows => (TileIndex::new(start, index), TileIndex::new(end, index)),
                };
                ranges.push(TileRange::from_parts(min, max, tile_matrix_id.to_string(), metatile));
            }
        }

        Ok(ranges)
    }

    fn orientation(&self, covering: &TileRange) -> Orientation {
        match self.config.sweep_axis {
            SweepAxis::Columns => Orientation::Columns,
            SweepAxis::Rows => Orientation::Rows,
            SweepAxis::Auto if covering.col_span() <= covering.row_span() => Orientation::Columns,
            SweepAxis::Auto => Orientation::Rows,
        }
    }

    /// Bounds of every non-degenerate piece of `shape` inside `strip`.
    fn fragments(&self, shape: Shape<'_>, strip: &Bounds) -> Vec<Bounds> {
        let clip = bounds_rect(strip).to_polygon();
        match shape {
            Shape::Area(polygon) => {
                let parts = self.clipper.intersect(polygon, &clip);
                self.clipper
                    .flatten(self.clipper.dissolve(parts))
                    .iter()
                    .filter_map(|part| part.exterior().bounding_rect())
                    .map(rect_bounds)
                    .collect()
            }
            Shape::Path(lines) => self
                .clipper
                .clip_lines(lines, &clip)
                .0
                .iter()
                .filter_map(|piece| piece.bounding_rect())
                .map(rect_bounds)
                .filter(|b| b.width() > 0.0 || b.height() > 0.0)
                .collect(),
        }
    }

    /// Absolute snap distance for a clip job covering `job`.
    ///
    /// Clipped vertices carry rounding error proportional to the extent of
    /// the clip inputs, not to the tile size, so the tolerance scales with
    /// the larger side of `job`.
    fn snap_distance(&self, job: &Bounds) -> f64 {
        self.config.snap_tolerance * job.width().max(job.height())
    }

    /// Pull fragment edges that sit within `tolerance` of a grid line onto it.
    fn snap(&self, bounds: &Bounds, matrix: &TileMatrix, metatile: u32, tolerance: f64) -> Bounds {
        if tolerance == 0.0 {
            return *bounds;
        }
        let origin = matrix.point_of_origin;
        let span_east = matrix.tile_span_east(metatile);
        let span_north = matrix.tile_span_north(metatile);

        Bounds::new(
            snap_to_grid(bounds.min_east, origin.east, span_east, tolerance),
            snap_to_grid(bounds.min_north, origin.north, span_north, tolerance),
            snap_to_grid(bounds.max_east, origin.east, span_east, tolerance),
            snap_to_grid(bounds.max_north, origin.north, span_north, tolerance),
        )
    }
}

impl Shape<'_> {
    /// A hole-free polygon whose area equals its extent is its own extent.
    fn fills(&self, extent: &Bounds) -> bool {
        match self {
            Shape::Area(polygon) => {
                let extent_area = extent.width() * extent.height();
                polygon.interiors().is_empty()
                    && extent_area > 0.0
                    && (polygon.unsigned_area() - extent_area).abs() <= extent_area * 1e-12
            }
            Shape::Path(_) => false,
        }
    }
}

/// Sort and merge inclusive index intervals.
///
/// Intervals sharing an index always merge. Adjacent ones merge only when
/// `touching` is set.
fn merge_intervals(mut intervals: Vec<(u32, u32)>, touching: bool) -> Vec<(u32, u32)> {
    intervals.sort_unstable();
    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start <= last.1 || (touching && start == last.1 + 1) => {
                last.1 = last.1.max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

fn rect_bounds(rect: Rect<f64>) -> Bounds {
    Bounds::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
}

fn bounds_rect(bounds: &Bounds) -> Rect<f64> {
    Rect::new(
        (bounds.min_east, bounds.min_north),
        (bounds.max_east, bounds.max_north),
    )
}
