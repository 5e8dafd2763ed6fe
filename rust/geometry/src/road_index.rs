// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Road Spatial Index
//!
//! An R-tree over road bounding boxes, built once per run and shared
//! read-only by every worker. Filtering a building's roads is a two-phase
//! query:
//!
//! 1. Envelope phase: roads whose bbox intersects the footprint bbox grown
//!    by the buffer distance.
//! 2. Exact phase: keep roads whose planar distance to the footprint is at
//!    most the buffer distance, which is the same as intersecting the
//!    footprint's Minkowski buffer.
//!
//! The surviving roads are never unioned into one geometry. Instead
//! [`NearbyRoads`] answers nearest-point queries by taking the minimum over
//! its members, which equals the nearest point on their union whether the
//! roads are disjoint, touching, or overlapping.

use geo::{Coord, Rect};
use rstar::{RTree, RTreeObject, AABB};
use streetview_core::{EdgeMidpoint, Footprint, MatchCandidate, RoadNetwork, RoadSegment};

use crate::planar::{closest_point_on_segment, distance, footprint_distance};

/// Bounding box of one road, tagged with its position in the network.
#[derive(Debug, Clone)]
struct RoadEnvelope {
    index: usize,
    bbox: Rect<f64>,
}

impl RTreeObject for RoadEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Read-only spatial index over a road network.
#[derive(Debug)]
pub struct RoadIndex<'a> {
    roads: &'a [RoadSegment],
    tree: RTree<RoadEnvelope>,
}

impl<'a> RoadIndex<'a> {
    /// Bulk-load the tree. Roads without coordinates are left out.
    pub fn build(network: &'a RoadNetwork) -> Self {
        let envelopes: Vec<RoadEnvelope> = network
            .roads
            .iter()
            .enumerate()
            .filter_map(|(index, road)| {
                road.geometry
                    .bounding_rect()
                    .map(|bbox| RoadEnvelope { index, bbox })
            })
            .collect();

        Self {
            roads: &network.roads,
            tree: RTree::bulk_load(envelopes),
        }
    }

    /// Number of indexed roads
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Roads within `buffer` of the footprint, via the R-tree.
    pub fn candidates(&self, footprint: &Footprint, buffer: f64) -> NearbyRoads<'a> {
        let Some(bbox) = footprint.bounding_rect() else {
            return NearbyRoads::default();
        };

        let query = AABB::from_corners(
            [bbox.min().x - buffer, bbox.min().y - buffer],
            [bbox.max().x + buffer, bbox.max().y + buffer],
        );

        let network = self.roads;
        let mut roads: Vec<(usize, &'a RoadSegment)> = self
            .tree
            .locate_in_envelope_intersecting(&query)
            .map(|entry| (entry.index, &network[entry.index]))
            .filter(|(_, road)| footprint_distance(footprint, &road.geometry) <= buffer)
            .collect();

        // Tree traversal order is unspecified; keep input order.
        roads.sort_unstable_by_key(|(index, _)| *index);
        NearbyRoads { roads }
    }

    /// Roads within `buffer` of the footprint, testing every road.
    ///
    /// Reference for [`RoadIndex::candidates`]; both must agree exactly.
    pub fn candidates_brute_force(&self, footprint: &Footprint, buffer: f64) -> NearbyRoads<'a> {
        let network = self.roads;
        let roads = network
            .iter()
            .enumerate()
            .filter(|(_, road)| !road.geometry.is_empty())
            .filter(|(_, road)| footprint_distance(footprint, &road.geometry) <= buffer)
            .collect();
        NearbyRoads { roads }
    }
}

/// Roads that survived the buffer filter for one building.
///
/// Acts as the logical union of its members for nearest-point queries.
#[derive(Debug, Clone, Default)]
pub struct NearbyRoads<'a> {
    roads: Vec<(usize, &'a RoadSegment)>,
}

impl<'a> NearbyRoads<'a> {
    #[inline]
    pub fn len(&self) -> usize {
        self.roads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    /// Positions of the member roads in the network, ascending.
    pub fn indices(&self) -> Vec<usize> {
        self.roads.iter().map(|(index, _)| *index).collect()
    }

    /// Closest point on any member road to `target`, with its distance.
    ///
    /// Segments are scanned in network order; on an exact distance tie the
    /// first segment encountered wins. Returns `None` when there are no
    /// members.
    pub fn nearest_point(&self, target: Coord<f64>) -> Option<(Coord<f64>, f64)> {
        let mut best: Option<(Coord<f64>, f64)> = None;

        for (_, road) in &self.roads {
            for segment in road.geometry.lines() {
                let candidate = closest_point_on_segment(target, &segment);
                let d = distance(target, candidate);
                if best.map_or(true, |(_, best_d)| d < best_d) {
                    best = Some((candidate, d));
                }
            }
        }

        best
    }

    /// Evaluate one edge midpoint against the member roads.
    pub fn match_midpoint(&self, midpoint: &EdgeMidpoint) -> Option<MatchCandidate> {
        self.nearest_point(midpoint.point)
            .map(|(nearest_road_point, distance)| MatchCandidate {
                edge_index: midpoint.edge_index,
                target_point: midpoint.point,
                nearest_road_point,
                distance,
            })
    }
}
