// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Records consumed and produced by the engine.

use crate::crs::CrsId;
use crate::footprint::{Footprint, RoadGeometry};
use geo::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-assigned building identity. Output is ordered by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildingId(pub u64);

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A building footprint with its precomputed area.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub id: BuildingId,
    pub footprint: Footprint,
    /// Planar area in square CRS units
    pub area: f64,
}

impl Building {
    /// Create a building, computing its area from the footprint.
    pub fn new(id: BuildingId, footprint: Footprint) -> Self {
        let area = footprint.area();
        Self { id, footprint, area }
    }

    /// Create a building with an area supplied by the caller.
    pub fn with_area(id: BuildingId, footprint: Footprint, area: f64) -> Self {
        Self { id, footprint, area }
    }
}

/// One road geometry. Identity is its position in the [`RoadNetwork`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSegment {
    pub geometry: RoadGeometry,
}

impl RoadSegment {
    pub fn new(geometry: impl Into<RoadGeometry>) -> Self {
        Self {
            geometry: geometry.into(),
        }
    }
}

/// Buildings expressed in a single coordinate system.
#[derive(Debug, Clone)]
pub struct BuildingSet {
    pub crs: CrsId,
    pub buildings: Vec<Building>,
}

impl BuildingSet {
    pub fn new(crs: CrsId, buildings: Vec<Building>) -> Self {
        Self { crs, buildings }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }
}

/// Roads expressed in a single coordinate system.
#[derive(Debug, Clone)]
pub struct RoadNetwork {
    pub crs: CrsId,
    pub roads: Vec<RoadSegment>,
}

impl RoadNetwork {
    pub fn new(crs: CrsId, roads: Vec<RoadSegment>) -> Self {
        Self { crs, roads }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.roads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }
}

/// Candidate viewpoint target: the midpoint of one boundary edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeMidpoint {
    pub building_id: BuildingId,
    /// 0-based, unique within the building, in boundary traversal order
    pub edge_index: usize,
    pub point: Coord<f64>,
}

/// An edge midpoint paired with the nearest point on the nearby roads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchCandidate {
    pub edge_index: usize,
    pub target_point: Coord<f64>,
    pub nearest_road_point: Coord<f64>,
    pub distance: f64,
}

/// The chosen viewpoint for one building.
///
/// Points are in the same projected CRS as the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    pub building_id: BuildingId,
    /// Camera position on the road network
    pub sample_point: Coord<f64>,
    /// Façade point the camera faces
    pub target_point: Coord<f64>,
    pub edge_index: usize,
    /// Distance between the two points, rounded to 2 decimals
    pub distance: f64,
    /// Compass bearing from `sample_point` to `target_point`, in `[0, 360)`
    pub heading: f64,
    /// `max(0, 100 - distance)`, in `[0, 100]`
    pub confidence: f64,
    pub building_area: f64,
}
