//! Coordinate to tile mapping for OGC tile matrix sets.
//!
//! Converts continuous positions into discrete tile indices of a
//! [`TileMatrix`](tms_common::TileMatrix), resolves tiles and tile ranges
//! back to bounding boxes, and decomposes arbitrary geometries into the
//! non-overlapping tile ranges that exactly cover their intersected tiles.
//!
//! ```
//! use tms_common::{Crs, WORLD_CRS84_QUAD};
//! use tms_tiling::{BoundingBox, EdgePolicy, Point};
//!
//! let tms = &*WORLD_CRS84_QUAD;
//! let tile = Point::new(30.0, 30.0, Crs::crs84())
//!     .unwrap()
//!     .to_tile(tms, "3", EdgePolicy::None, 1)
//!     .unwrap();
//! assert_eq!((tile.col(), tile.row()), (9, 2));
//!
//! let range = BoundingBox::new(-135.0, -45.0, -45.0, 45.0, Crs::crs84())
//!     .unwrap()
//!     .to_tile_range(tms, "2", 1)
//!     .unwrap();
//! assert_eq!(range.tiles().count(), 4);
//! ```

pub mod clip;
pub mod conversion;
pub mod decompose;
pub mod geometry;
pub mod tile;
pub mod tile_range;
pub mod validation;

pub use clip::{GeoClipper, PolygonClipper};
pub use conversion::{
    clamp_value, position_to_tile_index, region_bounding_box, tile_index_to_position,
    tile_matrix_bounding_box, EdgePolicy, TileIndex,
};
pub use decompose::Decomposer;
pub use geometry::{
    BoundingBox, Geometry, GeometryCollection, GeometryTrait, Line, Point, Polygon,
};
pub use tile::Tile;
pub use tile_range::{TileIter, TileRange};
