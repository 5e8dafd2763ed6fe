// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Streetview-Sampler Geometry
//!
//! Planar geometry for viewpoint matching: edge midpoint generation, an
//! R-tree backed road filter, nearest-point queries against a set of roads,
//! and the compass bearing / confidence arithmetic.

pub mod bearing;
pub mod midpoints;
pub mod planar;
pub mod road_index;

pub use bearing::{confidence, heading, round2};
pub use midpoints::{collect_midpoints, edge_midpoints, EdgeMidpoints, MidpointBuffer};
pub use planar::{
    closest_point_on_segment, distance, footprint_distance, is_valid_ring, midpoint,
    segment_distance, segments_intersect,
};
pub use road_index::{NearbyRoads, RoadIndex};
