//! Configuration for geometry decomposition.

use crate::{TmsError, TmsResult};
use serde::{Deserialize, Serialize};

/// Axis the decomposition sweeps strips along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SweepAxis {
    /// Sweep the axis with fewer tiles; ties sweep columns.
    #[default]
    Auto,
    /// One strip per column.
    Columns,
    /// One strip per row.
    Rows,
}

impl SweepAxis {
    /// Parse from string (case-insensitive), falling back to `Auto`.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "columns" | "cols" | "col" => Self::Columns,
            "rows" | "row" => Self::Rows,
            _ => Self::Auto,
        }
    }
}

/// Upper bound (exclusive) for [`TilingConfig::snap_tolerance`].
pub const MAX_SNAP_TOLERANCE: f64 = 1e-3;

/// Tuning knobs for the geometry to tile range decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilingConfig {
    /// Strip orientation.
    pub sweep_axis: SweepAxis,

    /// Merge fragment ranges inside one strip when they touch, not only
    /// when they overlap.
    pub merge_touching_ranges: bool,

    /// Fraction of the clip extent (geometry extent joined with the strip)
    /// within which a clipped fragment bound is snapped back onto the
    /// nearest tile grid line.
    ///
    /// Sized to the clipper's rounding error.
    pub snap_tolerance: f64,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            sweep_axis: SweepAxis::Auto,
            merge_touching_ranges: true,
            snap_tolerance: 1e-8,
        }
    }
}

impl TilingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("TMS_SWEEP_AXIS") {
            config.sweep_axis = SweepAxis::from_str(&val);
        }

        if let Ok(val) = std::env::var("TMS_MERGE_TOUCHING_RANGES") {
            config.merge_touching_ranges = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("TMS_SNAP_TOLERANCE") {
            if let Ok(tolerance) = val.parse() {
                config.snap_tolerance = tolerance;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> TmsResult<()> {
        if !(self.snap_tolerance.is_finite()
            && self.snap_tolerance >= 0.0
            && self.snap_tolerance < MAX_SNAP_TOLERANCE)
        {
            return Err(TmsError::Config(format!(
                "snap_tolerance must be in [0, {}), got {}",
                MAX_SNAP_TOLERANCE,
                self.snap_tolerance
            )));
        }
        Ok(())
    }
}
