//! Tile matrix set definition and lookups.
//!
//! A [`TileMatrixSet`] is validated once at construction and immutable
//! afterwards, so a single instance can be shared read-only across threads.

use crate::{Bounds, Crs, Position, TileMatrix, TmsError, TmsResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How [`TileMatrixSet::find_matching_tile_matrix`] compares scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Scale denominators must be equal.
    Exact,
    /// Smallest absolute scale denominator difference wins; ties go to the
    /// coarser (earlier) matrix.
    Nearest,
}

/// A complete tile matrix set definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TileMatrixSetDef", into = "TileMatrixSetDef")]
pub struct TileMatrixSet {
    identifier: String,
    crs: Crs,
    bounding_box: Option<Bounds>,
    well_known_scale_set: Option<String>,
    tile_matrices: Vec<TileMatrix>,
}

impl TileMatrixSet {
    /// Create a validated tile matrix set.
    ///
    /// Fails when the matrix list is empty, when two matrices share an
    /// identifier, when any matrix is malformed, or when the optional
    /// bounding box is not finite and ordered.
    pub fn new(
        identifier: impl Into<String>,
        crs: Crs,
        tile_matrices: Vec<TileMatrix>,
        bounding_box: Option<Bounds>,
    ) -> TmsResult<Self> {
        let identifier = identifier.into();

        if tile_matrices.is_empty() {
            return Err(TmsError::InvalidTileMatrixSet(format!(
                "'{}' has no tile matrices",
                identifier
            )));
        }

        let mut seen = HashSet::new();
        for matrix in &tile_matrices {
            matrix.validate()?;
            if !seen.insert(matrix.identifier.as_str()) {
                return Err(TmsError::InvalidTileMatrixSet(format!(
                    "'{}' has duplicate tile matrix identifier '{}'",
                    identifier, matrix.identifier
                )));
            }
            if matrix.variable_matrix_widths.is_some() {
                tracing::warn!(
                    tile_matrix_set = %identifier,
                    tile_matrix = %matrix.identifier,
                    "variable matrix widths are decoded but not applied"
                );
            }
        }

        if let Some(b) = &bounding_box {
            let finite = b.to_array().iter().all(|v| v.is_finite());
            if !finite || b.max_east <= b.min_east || b.max_north <= b.min_north {
                return Err(TmsError::InvalidTileMatrixSet(format!(
                    "'{}' has an invalid bounding box {:?}",
                    identifier,
                    b.to_array()
                )));
            }
        }

        Ok(Self {
            identifier,
            crs,
            bounding_box,
            well_known_scale_set: None,
            tile_matrices,
        })
    }

    /// Assemble a set from definitions known to be valid.
    pub(crate) fn from_parts(
        identifier: &str,
        crs: Crs,
        bounding_box: Option<Bounds>,
        tile_matrices: Vec<TileMatrix>,
    ) -> Self {
        Self {
            identifier: identifier.to_string(),
            crs,
            bounding_box,
            well_known_scale_set: None,
            tile_matrices,
        }
    }

    /// Attach a well-known scale set URI.
    pub fn with_well_known_scale_set(mut self, uri: impl Into<String>) -> Self {
        self.well_known_scale_set = Some(uri.into());
        self
    }

    /// Decode the OGC TMS 2.0 JSON encoding.
    pub fn from_json(json: &str) -> TmsResult<Self> {
        let def: TileMatrixSetDef = serde_json::from_str(json)?;
        Self::try_from(def)
    }

    /// Encode as OGC TMS 2.0 JSON.
    pub fn to_json(&self) -> TmsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn bounding_box(&self) -> Option<&Bounds> {
        self.bounding_box.as_ref()
    }

    pub fn well_known_scale_set(&self) -> Option<&str> {
        self.well_known_scale_set.as_deref()
    }

    /// Matrices ordered from coarsest to finest.
    pub fn tile_matrices(&self) -> &[TileMatrix] {
        &self.tile_matrices
    }

    /// Get a tile matrix by identifier.
    pub fn get_matrix(&self, identifier: &str) -> Option<&TileMatrix> {
        self.tile_matrices
            .iter()
            .find(|m| m.identifier == identifier)
    }

    /// Get a tile matrix by identifier, failing with `TileMatrixNotFound`.
    pub fn tile_matrix(&self, identifier: &str) -> TmsResult<&TileMatrix> {
        self.get_matrix(identifier)
            .ok_or_else(|| TmsError::tile_matrix_not_found(identifier, &self.identifier))
    }

    /// Position of a matrix in the ordered list.
    pub fn matrix_index(&self, identifier: &str) -> Option<usize> {
        self.tile_matrices
            .iter()
            .position(|m| m.identifier == identifier)
    }

    /// The matrix `delta` levels finer (positive) or coarser (negative).
    pub fn shift_tile_matrix(&self, identifier: &str, delta: i32) -> TmsResult<&TileMatrix> {
        let index = self
            .matrix_index(identifier)
            .ok_or_else(|| TmsError::tile_matrix_not_found(identifier, &self.identifier))?;
        let shifted = index as i64 + delta as i64;
        if shifted < 0 || shifted >= self.tile_matrices.len() as i64 {
            return Err(TmsError::tile_matrix_not_found(
                format!("{}{:+}", identifier, delta),
                &self.identifier,
            ));
        }
        Ok(&self.tile_matrices[shifted as usize])
    }

    /// Find the matrix of this set whose scale matches `source`.
    pub fn find_matching_tile_matrix(
        &self,
        source: &TileMatrix,
        mode: MatchMode,
    ) -> TmsResult<&TileMatrix> {
        let target = source.scale_denominator;
        match mode {
            MatchMode::Exact => self
                .tile_matrices
                .iter()
                .find(|m| m.scale_denominator == target)
                .ok_or(TmsError::NoMatchingTileMatrix(target)),
            MatchMode::Nearest => {
                let mut best = &self.tile_matrices[0];
                let mut best_diff = (best.scale_denominator - target).abs();
                for m in &self.tile_matrices[1..] {
                    let diff = (m.scale_denominator - target).abs();
                    if diff < best_diff {
                        best = m;
                        best_diff = diff;
                    }
                }
                Ok(best)
            }
        }
    }
}

// === Wire form ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoundingBoxDef {
    lower_left: Position,
    upper_right: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    crs: Option<Crs>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TileMatrixSetDef {
    id: String,
    crs: Crs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    well_known_scale_set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bounding_box: Option<BoundingBoxDef>,
    tile_matrices: Vec<TileMatrix>,
}

impl TryFrom<TileMatrixSetDef> for TileMatrixSet {
    type Error = TmsError;

    fn try_from(def: TileMatrixSetDef) -> TmsResult<Self> {
        let bounding_box = def.bounding_box.map(|b| {
            Bounds::new(
                b.lower_left.east,
                b.lower_left.north,
                b.upper_right.east,
                b.upper_right.north,
            )
        });
        let mut set = TileMatrixSet::new(def.id, def.crs, def.tile_matrices, bounding_box)?;
        set.well_known_scale_set = def.well_known_scale_set;
        Ok(set)
    }
}

impl From<TileMatrixSet> for TileMatrixSetDef {
    fn from(set: TileMatrixSet) -> Self {
        let bounding_box = set.bounding_box.map(|b| BoundingBoxDef {
            lower_left: b.min(),
            upper_right: b.max(),
            crs: None,
        });
        TileMatrixSetDef {
            id: set.identifier,
            crs: set.crs,
            well_known_scale_set: set.well_known_scale_set,
            bounding_box,
            tile_matrices: set.tile_matrices,
        }
    }
}
