//! Well-known tile matrix sets and scale sets.
//!
//! Built once on first access and never mutated.

use crate::{Bounds, CornerOfOrigin, Crs, Position, TileMatrix, TileMatrixSet};
use once_cell::sync::Lazy;

/// Standardized rendering pixel size (OGC Symbology Encoding), in meters.
pub const STANDARDIZED_PIXEL_SIZE: f64 = 0.00028;

/// Meters per degree on the WGS84 semi-major axis.
pub const METERS_PER_DEGREE: f64 = 6378137.0 * 2.0 * std::f64::consts::PI / 360.0;

/// Half the Web Mercator world width, in meters.
pub const WEB_MERCATOR_MAX_EXTENT: f64 = 20037508.342789244;

/// Deepest zoom level of the built-in sets.
pub const MAX_ZOOM: u32 = 22;

const TILE_SIZE: u32 = 256;

/// Scale denominators of the GoogleCRS84Quad scale set, indexed by zoom.
pub static GOOGLE_CRS84_QUAD_SCALES: Lazy<Vec<f64>> = Lazy::new(|| {
    (0..=MAX_ZOOM)
        .map(|z| crs84_cell_size(z) * METERS_PER_DEGREE / STANDARDIZED_PIXEL_SIZE)
        .collect()
});

/// Scale denominators of the GoogleMapsCompatible scale set, indexed by zoom.
pub static GOOGLE_MAPS_COMPATIBLE_SCALES: Lazy<Vec<f64>> = Lazy::new(|| {
    (0..=MAX_ZOOM)
        .map(|z| web_mercator_cell_size(z) / STANDARDIZED_PIXEL_SIZE)
        .collect()
});

/// WorldCRS84Quad: CRS84, 2^(z+1) x 2^z tiles per zoom, top-left origin.
pub static WORLD_CRS84_QUAD: Lazy<TileMatrixSet> = Lazy::new(|| {
    let tile_matrices = (0..=MAX_ZOOM)
        .map(|z| TileMatrix {
            identifier: z.to_string(),
            scale_denominator: GOOGLE_CRS84_QUAD_SCALES[z as usize],
            cell_size: crs84_cell_size(z),
            corner_of_origin: CornerOfOrigin::TopLeft,
            point_of_origin: Position::new(-180.0, 90.0),
            tile_width: TILE_SIZE,
            tile_height: TILE_SIZE,
            matrix_width: 2u32.pow(z + 1),
            matrix_height: 2u32.pow(z),
            variable_matrix_widths: None,
        })
        .collect();

    TileMatrixSet::from_parts(
        "WorldCRS84Quad",
        Crs::crs84(),
        Some(Bounds::new(-180.0, -90.0, 180.0, 90.0)),
        tile_matrices,
    )
    .with_well_known_scale_set("http://www.opengis.net/def/wkss/OGC/1.0/GoogleCRS84Quad")
});

/// WebMercatorQuad: EPSG:3857, 2^z x 2^z tiles per zoom, top-left origin.
pub static WEB_MERCATOR_QUAD: Lazy<TileMatrixSet> = Lazy::new(|| {
    let tile_matrices = (0..=MAX_ZOOM)
        .map(|z| TileMatrix {
            identifier: z.to_string(),
            scale_denominator: GOOGLE_MAPS_COMPATIBLE_SCALES[z as usize],
            cell_size: web_mercator_cell_size(z),
            corner_of_origin: CornerOfOrigin::TopLeft,
            point_of_origin: Position::new(-WEB_MERCATOR_MAX_EXTENT, WEB_MERCATOR_MAX_EXTENT),
            tile_width: TILE_SIZE,
            tile_height: TILE_SIZE,
            matrix_width: 2u32.pow(z),
            matrix_height: 2u32.pow(z),
            variable_matrix_widths: None,
        })
        .collect();

    TileMatrixSet::from_parts(
        "WebMercatorQuad",
        Crs::epsg(3857),
        Some(Bounds::new(
            -WEB_MERCATOR_MAX_EXTENT,
            -WEB_MERCATOR_MAX_EXTENT,
            WEB_MERCATOR_MAX_EXTENT,
            WEB_MERCATOR_MAX_EXTENT,
        )),
        tile_matrices,
    )
    .with_well_known_scale_set("http://www.opengis.net/def/wkss/OGC/1.0/GoogleMapsCompatible")
});

fn crs84_cell_size(zoom: u32) -> f64 {
    180.0 / TILE_SIZE as f64 / 2f64.powi(zoom as i32)
}

fn web_mercator_cell_size(zoom: u32) -> f64 {
    2.0 * WEB_MERCATOR_MAX_EXTENT / TILE_SIZE as f64 / 2f64.powi(zoom as i32)
}

/// Zoom level whose scale denominator equals `scale` exactly.
pub fn zoom_for_scale_denominator(scales: &[f64], scale: f64) -> Option<usize> {
    scales.iter().position(|s| *s == scale)
}

/// Zoom level whose scale denominator is closest to `scale`.
pub fn nearest_zoom_for_scale_denominator(scales: &[f64], scale: f64) -> Option<usize> {
    scales
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - scale).abs().total_cmp(&(*b - scale).abs()))
        .map(|(z, _)| z)
}
