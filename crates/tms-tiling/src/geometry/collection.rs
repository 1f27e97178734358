use super::{Geometry, GeometryTrait};
use crate::clip::PolygonClipper;
use crate::decompose::Decomposer;
use crate::tile_range::TileRange;
use crate::validation::validate_crs;
use tms_common::{Bounds, Crs, TileMatrixSet, TmsError, TmsResult};

/// A non-empty group of geometries sharing one CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryCollection {
    members: Vec<Geometry>,
}

impl GeometryCollection {
    pub fn new(members: Vec<Geometry>) -> TmsResult<Self> {
        let Some(first) = members.first() else {
            return Err(TmsError::invalid_geometry(
                "GeometryCollection needs at least one member",
            ));
        };
        for member in &members[1..] {
            validate_crs(first.crs(), member.crs())?;
        }
        Ok(Self { members })
    }

    pub fn members(&self) -> &[Geometry] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl GeometryTrait for GeometryCollection {
    fn crs(&self) -> &Crs {
        self.members[0].crs()
    }

    fn extent(&self) -> Bounds {
        let mut members = self.members.iter().map(|m| m.extent());
        let first = members
            .next()
            .unwrap_or_else(|| Bounds::new(0.0, 0.0, 0.0, 0.0));
        members.fold(first, |acc, b| acc.union(&b))
    }

    /// Member results concatenated in member order. Tiles shared by two
    /// members appear once per member.
    fn to_tile_matrix_limits_with<C: PolygonClipper>(
        &self,
        tms: &TileMatrixSet,
        tile_matrix_id: &str,
        metatile: u32,
        decomposer: &Decomposer<C>,
    ) -> TmsResult<Vec<TileRange>> {
        let mut limits = Vec::new();
        for member in &self.members {
            limits.extend(member.to_tile_matrix_limits_with(tms, tile_matrix_id, metatile, decomposer)?);
        }
        Ok(limits)
    }
}
