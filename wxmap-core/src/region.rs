//! Regions drawn by the user and the ordered collection that owns them.

use crate::error::{DashboardError, Result};
use crate::geom::{self, WorldPoint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of generated region ids; the label shows the part after it.
pub const REGION_ID_PREFIX: &str = "polygon_";

/// Unique identifier of a region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for the `seq`-th region drawn in a session.
    pub fn from_sequence(seq: u64) -> Self {
        Self(format!("{}{}", REGION_ID_PREFIX, seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user-drawn polygon bound to a data source.
///
/// Vertices and centroid are fixed at creation; only the data source may be
/// reassigned afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    id: RegionId,
    #[serde(rename = "coordinates")]
    vertices: Vec<WorldPoint>,
    #[serde(rename = "center")]
    centroid: WorldPoint,
    data_source_id: String,
}

impl Region {
    /// Build a region from validated world vertices.
    pub(crate) fn new(
        id: RegionId,
        vertices: Vec<WorldPoint>,
        data_source_id: impl Into<String>,
    ) -> Result<Self> {
        geom::validate_polygon(&vertices)?;
        let centroid = geom::centroid(&vertices)
            .ok_or_else(|| DashboardError::DegenerateGeometry("no vertices".to_string()))?;
        Ok(Self {
            id,
            vertices,
            centroid,
            data_source_id: data_source_id.into(),
        })
    }

    pub fn id(&self) -> &RegionId {
        &self.id
    }

    pub fn vertices(&self) -> &[WorldPoint] {
        &self.vertices
    }

    pub fn centroid(&self) -> WorldPoint {
        self.centroid
    }

    pub fn data_source_id(&self) -> &str {
        &self.data_source_id
    }

    /// Human label, e.g. "Polygon 3" for id `polygon_3`.
    pub fn label(&self) -> String {
        let suffix = self
            .id
            .as_str()
            .split('_')
            .nth(1)
            .unwrap_or(self.id.as_str());
        format!("Polygon {}", suffix)
    }

    pub fn contains(&self, point: WorldPoint) -> bool {
        geom::point_in_polygon(point, &self.vertices)
    }
}

/// Regions in creation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSet {
    regions: Vec<Region>,
}

impl RegionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn as_slice(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| &r.id == id)
    }

    /// Append a region. A region with the same id is replaced in place.
    pub fn insert(&mut self, region: Region) {
        match self.regions.iter_mut().find(|r| r.id == region.id) {
            Some(existing) => *existing = region,
            None => self.regions.push(region),
        }
    }

    /// Remove a region, returning it if it existed.
    pub fn remove(&mut self, id: &RegionId) -> Option<Region> {
        let idx = self.regions.iter().position(|r| &r.id == id)?;
        Some(self.regions.remove(idx))
    }

    /// Point the region at a different data source.
    pub fn reassign(&mut self, id: &RegionId, data_source_id: &str) -> Result<()> {
        let region = self
            .regions
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| DashboardError::UnknownRegion(id.to_string()))?;
        region.data_source_id = data_source_id.to_string();
        Ok(())
    }

    /// First region, in creation order, containing `point`.
    pub fn hit_test(&self, point: WorldPoint) -> Option<&Region> {
        self.regions.iter().find(|r| r.contains(point))
    }

    pub fn ids(&self) -> Vec<RegionId> {
        self.regions.iter().map(|r| r.id.clone()).collect()
    }
}
