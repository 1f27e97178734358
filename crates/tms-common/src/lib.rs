//! Common types shared by the tile matrix set crates.
//!
//! Holds the decoded form of an OGC tile matrix set (one [`TileMatrix`] per
//! zoom level plus the set's [`Crs`]), the error taxonomy used by every
//! tiling operation, and the process-wide well-known sets.

pub mod bounds;
pub mod config;
pub mod crs;
pub mod error;
pub mod tile_matrix;
pub mod tile_matrix_set;
pub mod well_known;

pub use bounds::{Bounds, Position};
pub use config::{SweepAxis, TilingConfig, MAX_SNAP_TOLERANCE};
pub use crs::Crs;
pub use error::{Axis, TmsError, TmsResult};
pub use tile_matrix::{CornerOfOrigin, TileMatrix, VariableMatrixWidth};
pub use tile_matrix_set::{MatchMode, TileMatrixSet};
pub use well_known::{WEB_MERCATOR_QUAD, WORLD_CRS84_QUAD};
