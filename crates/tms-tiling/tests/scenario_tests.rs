//! End-to-end tiling scenarios on WorldCRS84Quad.

use std::cell::RefCell;

use geo::{BoundingRect, MultiLineString, MultiPolygon, Rect};
use tms_common::{Crs, SweepAxis, TilingConfig, TmsError, WORLD_CRS84_QUAD};
use tms_tiling::{
    BoundingBox, Decomposer, EdgePolicy, GeoClipper, Geometry, GeometryCollection, GeometryTrait,
    Line, Point, Polygon, PolygonClipper, Tile, TileRange,
};

fn polygon(coords: &[(f64, f64)]) -> Polygon {
    Polygon::try_from((coords.to_vec(), Crs::crs84())).unwrap()
}

fn line(coords: &[(f64, f64)]) -> Line {
    Line::try_from((coords.to_vec(), Crs::crs84())).unwrap()
}

fn limits(ranges: &[TileRange]) -> Vec<(u32, u32, u32, u32)> {
    ranges
        .iter()
        .map(|r| (r.min_col(), r.min_row(), r.max_col(), r.max_row()))
        .collect()
}

fn tiles(ranges: &[TileRange]) -> Vec<(u32, u32)> {
    let mut tiles: Vec<(u32, u32)> = ranges
        .iter()
        .flat_map(|r| r.tiles())
        .map(|t| (t.col(), t.row()))
        .collect();
    tiles.sort_unstable();
    tiles
}

/// Delegates to `GeoClipper` and records every strip it is asked to clip by.
#[derive(Default)]
struct RecordingClipper {
    strips: RefCell<Vec<Rect<f64>>>,
}

impl PolygonClipper for RecordingClipper {
    fn intersect(&self, subject: &geo::Polygon<f64>, clip: &geo::Polygon<f64>) -> MultiPolygon<f64> {
        if let Some(rect) = clip.bounding_rect() {
            self.strips.borrow_mut().push(rect);
        }
        GeoClipper.intersect(subject, clip)
    }

    fn clip_lines(&self, lines: &MultiLineString<f64>, clip: &geo::Polygon<f64>) -> MultiLineString<f64> {
        if let Some(rect) = clip.bounding_rect() {
            self.strips.borrow_mut().push(rect);
        }
        GeoClipper.clip_lines(lines, clip)
    }

    fn dissolve(&self, parts: MultiPolygon<f64>) -> MultiPolygon<f64> {
        GeoClipper.dissolve(parts)
    }

    fn flatten(&self, parts: MultiPolygon<f64>) -> Vec<geo::Polygon<f64>> {
        GeoClipper.flatten(parts)
    }
}

// ============================================================================
// Point and bounding box projection
// ============================================================================

#[test]
fn test_point_to_tile_scenarios() {
    let tms = &*WORLD_CRS84_QUAD;
    let cases = [((30.0, 30.0), (9, 2)), ((-40.0, -40.0), (6, 5))];
    for ((east, north), expected) in cases {
        let tile = Point::new(east, north, Crs::crs84())
            .unwrap()
            .to_tile(tms, "3", EdgePolicy::None, 1)
            .unwrap();
        assert_eq!((tile.col(), tile.row()), expected);
    }
}

#[test]
fn test_bbox_to_tile_range_scenario() {
    let range = BoundingBox::new(-135.0, -45.0, -45.0, 45.0, Crs::crs84())
        .unwrap()
        .to_tile_range(&WORLD_CRS84_QUAD, "2", 1)
        .unwrap();
    assert_eq!(limits(&[range]), vec![(1, 1, 2, 2)]);
}

#[test]
fn test_tile_bbox_scenario() {
    let tile = Tile::new(1, 1, "1", 1, &WORLD_CRS84_QUAD).unwrap();
    let bbox = tile.to_bounding_box(&WORLD_CRS84_QUAD, false).unwrap();
    assert_eq!(bbox.to_array(), [-90.0, -90.0, 0.0, 0.0]);
}

#[test]
fn test_tile_pyramid_walk() {
    let tms = &*WORLD_CRS84_QUAD;
    let tile = Tile::new(3, 1, "2", 1, tms).unwrap();

    let children = tile.to_tile_range(tms, "3", 1).unwrap();
    assert_eq!(limits(&[children.clone()]), vec![(6, 2, 7, 3)]);

    // Every child maps back onto the parent
    for child in children.tiles() {
        let parent = child.to_tile_range(tms, "2", 1).unwrap();
        assert_eq!(limits(&[parent]), vec![(3, 1, 3, 1)]);
    }
}

// ============================================================================
// Decomposition
// ============================================================================

#[test]
fn test_line_one_range_per_column() {
    let l = line(&[(-180.0, 90.0), (0.0, 45.0), (-180.0, 80.0), (-135.0, -90.0)]);
    let ranges = l.to_tile_matrix_limits(&WORLD_CRS84_QUAD, "2", 1).unwrap();

    assert_eq!(ranges.len(), 4);
    for (i, r) in ranges.iter().enumerate() {
        assert_eq!(r.min_col(), i as u32);
        assert_eq!(r.max_col(), i as u32);
    }
    assert_eq!(
        limits(&ranges),
        vec![(0, 0, 0, 3), (1, 0, 1, 0), (2, 0, 2, 0), (3, 0, 3, 0)]
    );
}

#[test]
fn test_triangle_scenario() {
    let p = polygon(&[(-45.0, 0.0), (0.0, 45.0), (45.0, 0.0), (-45.0, 0.0)]);
    let ranges = p.to_tile_matrix_limits(&WORLD_CRS84_QUAD, "2", 1).unwrap();
    assert_eq!(tiles(&ranges), vec![(3, 1), (4, 1)]);
}

#[test]
fn test_triangle_finer_matrix_excludes_outside_tiles() {
    // At matrix 3 the triangle apex row only touches its two central tiles
    let p = polygon(&[(-45.0, 0.0), (0.0, 45.0), (45.0, 0.0), (-45.0, 0.0)]);
    let ranges = p.to_tile_matrix_limits(&WORLD_CRS84_QUAD, "3", 1).unwrap();
    let tiles = tiles(&ranges);

    assert!(tiles.contains(&(7, 2)));
    assert!(tiles.contains(&(8, 2)));
    assert!(!tiles.contains(&(6, 2)));
    assert!(!tiles.contains(&(9, 2)));
    for col in 6..=9 {
        assert!(tiles.contains(&(col, 3)));
    }
    assert_eq!(tiles.len(), 6);
}

#[test]
fn test_vertex_tile_is_always_emitted() {
    let tms = &*WORLD_CRS84_QUAD;
    for overshoot in [1e-3, 1e-5, 5e-6] {
        let apex = (overshoot, 20.0);
        let p = polygon(&[(-40.0, 10.0), apex, (-40.0, 30.0), (-40.0, 10.0)]);
        let ranges = p.to_tile_matrix_limits(tms, "2", 1).unwrap();

        let vertex = Point::new(apex.0, apex.1, Crs::crs84())
            .unwrap()
            .to_tile(tms, "2", EdgePolicy::None, 1)
            .unwrap();
        assert_eq!((vertex.col(), vertex.row()), (4, 1));
        assert_eq!(tiles(&ranges), vec![(3, 1), (4, 1)], "overshoot {}", overshoot);
    }
}

#[test]
fn test_bounding_box_polygon_single_range() {
    let bbox = BoundingBox::new(-135.0, -45.0, -45.0, 45.0, Crs::crs84()).unwrap();
    let ranges = bbox
        .to_polygon()
        .to_tile_matrix_limits(&WORLD_CRS84_QUAD, "2", 1)
        .unwrap();
    assert_eq!(limits(&ranges), vec![(1, 1, 2, 2)]);
}

#[test]
fn test_strips_are_tile_aligned() {
    let clipper = RecordingClipper::default();
    let decomposer = Decomposer::with_clipper(clipper);
    let p = polygon(&[(-170.0, -80.0), (-100.0, -80.0), (-170.0, 80.0), (-170.0, -80.0)]);

    p.to_tile_matrix_limits_with(&WORLD_CRS84_QUAD, "2", 1, &decomposer)
        .unwrap();

    let strips = decomposer.clipper().strips.borrow();
    assert_eq!(strips.len(), 2);
    assert_eq!((strips[0].min().x, strips[0].max().x), (-180.0, -135.0));
    assert_eq!((strips[1].min().x, strips[1].max().x), (-135.0, -90.0));
    for strip in strips.iter() {
        assert_eq!((strip.min().y, strip.max().y), (-90.0, 90.0));
    }
}

#[test]
fn test_forced_sweep_axis_covers_same_tiles() {
    let p = polygon(&[
        (-170.0, -80.0),
        (100.0, -30.0),
        (20.0, 70.0),
        (-60.0, 10.0),
        (-170.0, -80.0),
    ]);
    let tms = &*WORLD_CRS84_QUAD;

    let by_axis = |axis| {
        let config = TilingConfig {
            sweep_axis: axis,
            ..TilingConfig::default()
        };
        let decomposer = Decomposer::new(GeoClipper, config).unwrap();
        tiles(&p.to_tile_matrix_limits_with(tms, "3", 1, &decomposer).unwrap())
    };

    assert_eq!(by_axis(SweepAxis::Columns), by_axis(SweepAxis::Rows));
    assert_eq!(by_axis(SweepAxis::Auto), by_axis(SweepAxis::Rows));
}

#[test]
fn test_geometry_collection_limits() {
    let collection = GeometryCollection::new(vec![
        Geometry::from(line(&[(-170.0, 10.0), (170.0, 10.0)])),
        Geometry::from(Point::new(-100.0, -60.0, Crs::crs84()).unwrap()),
    ])
    .unwrap();
    let ranges = collection
        .to_tile_matrix_limits(&WORLD_CRS84_QUAD, "2", 1)
        .unwrap();
    assert_eq!(limits(&ranges), vec![(0, 1, 7, 1), (1, 3, 1, 3)]);
}

// ============================================================================
// Error propagation
// ============================================================================

#[test]
fn test_decomposition_errors() {
    let tms = &*WORLD_CRS84_QUAD;
    let p = polygon(&[(-45.0, 0.0), (0.0, 45.0), (45.0, 0.0), (-45.0, 0.0)]);

    assert_eq!(
        p.to_tile_matrix_limits(tms, "2", 0),
        Err(TmsError::InvalidMetatile(0))
    );
    assert!(matches!(
        p.to_tile_matrix_limits(tms, "missing", 1),
        Err(TmsError::TileMatrixNotFound { .. })
    ));

    let mercator = Polygon::try_from((
        vec![(-45.0, 0.0), (0.0, 45.0), (45.0, 0.0), (-45.0, 0.0)],
        Crs::epsg(3857),
    ))
    .unwrap();
    assert!(matches!(
        mercator.to_tile_matrix_limits(tms, "2", 1),
        Err(TmsError::CrsMismatch { .. })
    ));

    let outside = polygon(&[(-45.0, 0.0), (0.0, 95.0), (45.0, 0.0), (-45.0, 0.0)]);
    let err = outside.to_tile_matrix_limits(tms, "2", 1).unwrap_err();
    assert!(err.to_string().contains("north"));
}
