//! Polygon clipping capability used by the decomposition sweep.
//!
//! The sweep only needs three operations from a computational geometry
//! backend plus a line clip for zero-area inputs. [`GeoClipper`] provides
//! them with the `geo` crate; tests substitute deterministic fakes.

use geo::{unary_union, Area, BooleanOps, MultiLineString, MultiPolygon, Polygon};

/// Clipping operations required by [`Decomposer`](crate::Decomposer).
pub trait PolygonClipper {
    /// Intersection of `subject` with `clip`. Empty when they do not overlap.
    fn intersect(&self, subject: &Polygon<f64>, clip: &Polygon<f64>) -> MultiPolygon<f64>;

    /// Parts of `lines` lying inside `clip`, boundary included.
    fn clip_lines(&self, lines: &MultiLineString<f64>, clip: &Polygon<f64>) -> MultiLineString<f64>;

    /// Merge touching or overlapping parts.
    fn dissolve(&self, parts: MultiPolygon<f64>) -> MultiPolygon<f64> {
        parts
    }

    /// Split into simple polygons.
    fn flatten(&self, parts: MultiPolygon<f64>) -> Vec<Polygon<f64>> {
        parts.0
    }
}

/// [`PolygonClipper`] backed by `geo`'s boolean operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoClipper;

impl PolygonClipper for GeoClipper {
    fn intersect(&self, subject: &Polygon<f64>, clip: &Polygon<f64>) -> MultiPolygon<f64> {
        subject.intersection(clip)
    }

    fn clip_lines(&self, lines: &MultiLineString<f64>, clip: &Polygon<f64>) -> MultiLineString<f64> {
        clip.clip(lines, false)
    }

    fn dissolve(&self, parts: MultiPolygon<f64>) -> MultiPolygon<f64> {
        if parts.0.len() < 2 {
            return parts;
        }
        unary_union(&parts.0)
    }

    fn flatten(&self, parts: MultiPolygon<f64>) -> Vec<Polygon<f64>> {
        parts
            .0
            .into_iter()
            .filter(|p| p.exterior().0.len() >= 4 && p.unsigned_area() > 0.0)
            .collect()
    }
}
