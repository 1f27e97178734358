//! Error types for tile matrix set operations.
//!
//! Every variant is a caller-correctable input error. Nothing here is
//! transient, so nothing is retried.

use crate::Crs;
use std::fmt;
use thiserror::Error;

/// Result type alias using TmsError.
pub type TmsResult<T> = Result<T, TmsError>;

/// Coordinate axis named in bounds and finiteness errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Easting / longitude
    East,
    /// Northing / latitude
    North,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::East => write!(f, "east"),
            Axis::North => write!(f, "north"),
        }
    }
}

/// Primary error type for tiling operations.
#[derive(Debug, Error, PartialEq)]
pub enum TmsError {
    // === Request Errors ===
    #[error("Invalid metatile: {0}. Metatile must be a positive integer")]
    InvalidMetatile(u32),

    #[error("Tile matrix '{id}' not found in tile matrix set '{set}'")]
    TileMatrixNotFound { id: String, set: String },

    #[error("CRS mismatch: geometry is in {found}, tile matrix set is in {expected}")]
    CrsMismatch { expected: Crs, found: Crs },

    #[error("Coordinate out of bounds: {axis} value {value} must be within [{min}, {max}]")]
    OutOfBounds {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Non-finite coordinate: {axis} value {value}")]
    NonFiniteCoordinate { axis: Axis, value: f64 },

    // === Geometry Errors ===
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    #[error("Invalid tile index: {0}")]
    InvalidTileIndex(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    // === Definition Errors ===
    #[error("Invalid tile matrix '{id}': {message}")]
    InvalidTileMatrix { id: String, message: String },

    #[error("Invalid tile matrix set: {0}")]
    InvalidTileMatrixSet(String),

    #[error("No tile matrix with scale denominator {0}")]
    NoMatchingTileMatrix(f64),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TmsError {
    /// Create an OutOfBounds error.
    pub fn out_of_bounds(axis: Axis, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfBounds {
            axis,
            value,
            min,
            max,
        }
    }

    /// Create a TileMatrixNotFound error.
    pub fn tile_matrix_not_found(id: impl Into<String>, set: impl Into<String>) -> Self {
        Self::TileMatrixNotFound {
            id: id.into(),
            set: set.into(),
        }
    }

    /// Create an InvalidTileMatrix error.
    pub fn invalid_tile_matrix(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTileMatrix {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidBoundingBox error.
    pub fn invalid_bbox(msg: impl Into<String>) -> Self {
        Self::InvalidBoundingBox(msg.into())
    }

    /// Create an InvalidTileIndex error.
    pub fn invalid_tile_index(msg: impl Into<String>) -> Self {
        Self::InvalidTileIndex(msg.into())
    }

    /// Create an InvalidGeometry error.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }
}

impl From<serde_json::Error> for TmsError {
    fn from(err: serde_json::Error) -> Self {
        TmsError::Json(err.to_string())
    }
}
