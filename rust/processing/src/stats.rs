// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch results and counters.

use serde::{Deserialize, Serialize};
use streetview_core::{BuildingId, SampleResult};

use crate::engine::BuildingOutcome;

/// Per-run counters. Every building lands in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingStats {
    /// Buildings in the input set
    pub total: usize,
    pub matched: usize,
    /// No road within the buffer distance
    pub no_roads: usize,
    /// Best candidate beyond the max distance
    pub too_far: usize,
    /// Malformed footprints
    pub skipped: usize,
    /// Not evaluated because the run was cancelled
    pub cancelled: usize,
    /// Wall-clock time of the batch (ms)
    pub elapsed_ms: u64,
}

impl SamplingStats {
    pub fn record(&mut self, outcome: &BuildingOutcome) {
        self.total += 1;
        match outcome {
            BuildingOutcome::Matched(_) => self.matched += 1,
            BuildingOutcome::NoRoads => self.no_roads += 1,
            BuildingOutcome::NoMatch { .. } => self.too_far += 1,
            BuildingOutcome::Skipped(_) => self.skipped += 1,
        }
    }

    pub fn record_cancelled(&mut self) {
        self.total += 1;
        self.cancelled += 1;
    }

    /// Buildings that produced no result, for any reason.
    #[inline]
    pub fn unmatched(&self) -> usize {
        self.total - self.matched
    }

    /// Share of buildings matched, in percent.
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64 * 100.0
        }
    }
}

/// A building dropped because its footprint was malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedBuilding {
    pub building_id: BuildingId,
    pub reason: String,
}

/// Output of one engine run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SamplingReport {
    /// One entry per matched building, ascending by building id
    pub results: Vec<SampleResult>,
    pub stats: SamplingStats,
    /// Ascending by building id
    pub skipped: Vec<SkippedBuilding>,
}

impl SamplingReport {
    /// Result for one building, if it matched.
    pub fn get(&self, id: BuildingId) -> Option<&SampleResult> {
        self.results
            .binary_search_by_key(&id, |r| r.building_id)
            .ok()
            .map(|i| &self.results[i])
    }
}
