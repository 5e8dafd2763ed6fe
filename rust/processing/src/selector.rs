// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Best Viewpoint Selection
//!
//! Reduces a building's scored candidates to at most one winner. The
//! distance cutoff applies to the winner only: a building is rejected when
//! its best candidate is too far, never because some other candidate is.

use streetview_core::{Building, MatchCandidate, SampleResult};
use streetview_geometry::{confidence, heading, round2};

/// Candidate with the strictly smallest distance.
///
/// On exact ties the earliest candidate (lowest `edge_index` when candidates
/// are in generation order) wins.
pub fn nearest_candidate(candidates: &[MatchCandidate]) -> Option<&MatchCandidate> {
    let mut best: Option<&MatchCandidate> = None;
    for candidate in candidates {
        if best.map_or(true, |b| candidate.distance < b.distance) {
            best = Some(candidate);
        }
    }
    best
}

/// Nearest candidate, provided it lies within `max_distance`.
pub fn select_best(candidates: &[MatchCandidate], max_distance: f64) -> Option<&MatchCandidate> {
    nearest_candidate(candidates).filter(|c| c.distance <= max_distance)
}

/// Turn the winning candidate into the building's result.
///
/// Distance is rounded to 2 decimals and confidence is derived from the
/// rounded value, so `confidence == max(0, 100 - distance)` holds exactly
/// on the emitted record.
pub fn to_sample_result(building: &Building, winner: &MatchCandidate) -> SampleResult {
    let distance = round2(winner.distance);
    SampleResult {
        building_id: building.id,
        sample_point: winner.nearest_road_point,
        target_point: winner.target_point,
        edge_index: winner.edge_index,
        distance,
        heading: heading(winner.nearest_road_point, winner.target_point),
        confidence: confidence(distance),
        building_area: building.area,
    }
}
