// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edge Midpoint Generation
//!
//! Turns a building footprint into candidate viewpoint targets, one per
//! exterior boundary edge. Holes are never sampled.
//!
//! Edge indices start at 0 and increase monotonically across parts in their
//! stored order. Parts whose exterior ring has fewer than 3 distinct vertices
//! are skipped without consuming indices. Zero-length edges inside a valid
//! ring still produce a midpoint (equal to the repeated vertex).

use geo::{Coord, Polygon};
use smallvec::SmallVec;
use std::iter::FusedIterator;
use streetview_core::{Building, BuildingId, EdgeMidpoint, Footprint};

use crate::planar::{is_valid_ring, midpoint};

/// Per-building candidate buffer. Simplified footprints rarely exceed this.
pub type MidpointBuffer = SmallVec<[EdgeMidpoint; 16]>;

/// Lazy iterator over a footprint's edge midpoints.
///
/// The sequence is deterministic for a given footprint: clone before
/// consuming, or call [`edge_midpoints`] again, to traverse it a second time.
#[derive(Debug, Clone)]
pub struct EdgeMidpoints<'a> {
    building_id: BuildingId,
    parts: std::slice::Iter<'a, Polygon<f64>>,
    ring: &'a [Coord<f64>],
    position: usize,
    next_index: usize,
}

impl<'a> EdgeMidpoints<'a> {
    pub fn new(building_id: BuildingId, footprint: &'a Footprint) -> Self {
        Self {
            building_id,
            parts: footprint.parts().iter(),
            ring: &[],
            position: 0,
            next_index: 0,
        }
    }
}

impl Iterator for EdgeMidpoints<'_> {
    type Item = EdgeMidpoint;

    fn next(&mut self) -> Option<EdgeMidpoint> {
        loop {
            if self.position + 1 < self.ring.len() {
                let a = self.ring[self.position];
                let b = self.ring[self.position + 1];
                self.position += 1;

                let item = EdgeMidpoint {
                    building_id: self.building_id,
                    edge_index: self.next_index,
                    point: midpoint(a, b),
                };
                self.next_index += 1;
                return Some(item);
            }

            let part = self.parts.next()?;
            let exterior = part.exterior();
            self.ring = if is_valid_ring(exterior) {
                exterior.0.as_slice()
            } else {
                &[]
            };
            self.position = 0;
        }
    }
}

impl FusedIterator for EdgeMidpoints<'_> {}

/// Edge midpoints of a building's footprint, in boundary traversal order.
pub fn edge_midpoints(building: &Building) -> EdgeMidpoints<'_> {
    EdgeMidpoints::new(building.id, &building.footprint)
}

/// Materialize a building's midpoints into a transient buffer.
pub fn collect_midpoints(building: &Building) -> MidpointBuffer {
    edge_midpoints(building).collect()
}
