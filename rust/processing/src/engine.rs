// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewpoint engine: per-building evaluation and parallel batch runs.

use rayon::prelude::*;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use streetview_core::{
    Building, BuildingId, BuildingSet, FootprintError, MatchCandidate, Result, RoadNetwork,
    SampleResult,
};
use streetview_geometry::{collect_midpoints, RoadIndex};

use crate::config::EngineConfig;
use crate::selector::{nearest_candidate, select_best, to_sample_result};
use crate::stats::{SamplingReport, SamplingStats, SkippedBuilding};
use crate::validation::{check_footprint, validate_inputs};

/// Terminal state of one building's evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildingOutcome {
    /// Best candidate within the max distance
    Matched(SampleResult),
    /// No road within the buffer distance
    NoRoads,
    /// Roads were found but the best candidate exceeds the max distance.
    /// `best_distance` is `None` when no candidate could be scored.
    NoMatch { best_distance: Option<f64> },
    /// Malformed footprint
    Skipped(FootprintError),
}

/// Cooperative cancellation, checked between buildings.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Matches buildings to viewpoints on a fixed road network.
///
/// Construction validates every global input and builds the road index;
/// after that the engine is read-only and can be shared across threads.
#[derive(Debug)]
pub struct ViewpointEngine<'a> {
    config: EngineConfig,
    buildings: &'a [Building],
    index: RoadIndex<'a>,
}

impl<'a> ViewpointEngine<'a> {
    /// Validate inputs and build the road index.
    ///
    /// Fails on invalid distances, mismatched or geographic CRS, duplicate
    /// building ids and non-finite road coordinates. Nothing is evaluated
    /// on failure.
    pub fn new(
        config: EngineConfig,
        buildings: &'a BuildingSet,
        roads: &'a RoadNetwork,
    ) -> Result<Self> {
        validate_inputs(&config, buildings, roads)?;

        let index_start = Instant::now();
        let index = RoadIndex::build(roads);
        tracing::debug!(
            roads = roads.len(),
            indexed = index.len(),
            elapsed_ms = index_start.elapsed().as_millis() as u64,
            "Built road index"
        );

        Ok(Self {
            config,
            buildings: &buildings.buildings,
            index,
        })
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one building through the state machine.
    pub fn evaluate(&self, building: &Building) -> BuildingOutcome {
        if let Err(reason) = check_footprint(building) {
            return BuildingOutcome::Skipped(reason);
        }

        // Init -> CandidatesGenerated
        let midpoints = collect_midpoints(building);
        if midpoints.is_empty() {
            return BuildingOutcome::Skipped(FootprintError::NoValidRing);
        }

        // CandidatesGenerated -> RoadsFiltered
        let nearby = self
            .index
            .candidates(&building.footprint, self.config.buffer_distance);
        if nearby.is_empty() {
            return BuildingOutcome::NoRoads;
        }

        // RoadsFiltered -> Evaluated
        let candidates: SmallVec<[MatchCandidate; 16]> = midpoints
            .iter()
            .filter_map(|midpoint| nearby.match_midpoint(midpoint))
            .collect();

        // Evaluated -> {NoMatch | Matched}
        match select_best(&candidates, self.config.max_distance) {
            Some(best) => BuildingOutcome::Matched(to_sample_result(building, best)),
            None => BuildingOutcome::NoMatch {
                best_distance: nearest_candidate(&candidates).map(|c| c.distance),
            },
        }
    }

    /// Evaluate every building.
    pub fn run(&self) -> SamplingReport {
        self.run_with(&CancelFlag::new())
    }

    /// Evaluate every building, stopping early once `cancel` is set.
    ///
    /// Buildings not yet started when the flag is raised are counted as
    /// cancelled. Output order is by building id, independent of scheduling.
    pub fn run_with(&self, cancel: &CancelFlag) -> SamplingReport {
        let start = Instant::now();
        tracing::info!(
            buildings = self.buildings.len(),
            roads = self.index.len(),
            buffer_distance = self.config.buffer_distance,
            max_distance = self.config.max_distance,
            "Starting viewpoint matching"
        );

        let mut outcomes: Vec<(BuildingId, Option<BuildingOutcome>)> = self
            .buildings
            .par_iter()
            .map(|building| {
                if cancel.is_cancelled() {
                    (building.id, None)
                } else {
                    (building.id, Some(self.evaluate(building)))
                }
            })
            .collect();
        outcomes.sort_unstable_by_key(|(id, _)| *id);

        let mut stats = SamplingStats::default();
        let mut results = Vec::new();
        let mut skipped = Vec::new();

        for (building_id, outcome) in outcomes {
            let Some(outcome) = outcome else {
                stats.record_cancelled();
                continue;
            };
            stats.record(&outcome);

            match outcome {
                BuildingOutcome::Matched(result) => results.push(result),
                BuildingOutcome::Skipped(reason) => {
                    tracing::debug!(building_id = building_id.0, %reason, "Skipped building");
                    skipped.push(SkippedBuilding {
                        building_id,
                        reason: reason.to_string(),
                    });
                }
                BuildingOutcome::NoRoads | BuildingOutcome::NoMatch { .. } => {}
            }
        }

        stats.elapsed_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            matched = stats.matched,
            no_roads = stats.no_roads,
            too_far = stats.too_far,
            skipped = stats.skipped,
            cancelled = stats.cancelled,
            elapsed_ms = stats.elapsed_ms,
            "Viewpoint matching complete"
        );
        if stats.matched == 0 && stats.total > stats.cancelled {
            tracing::warn!(
                max_distance = self.config.max_distance,
                "No building matched; max_distance may be too small for this road network"
            );
        }

        SamplingReport {
            results,
            stats,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, polygon, Coord, LineString, Polygon};
    use streetview_core::{CrsId, RoadSegment};

    const CRS: &str = "EPSG:32610";

    fn square_at(id: u64, x0: f64, y0: f64) -> Building {
        Building::new(
            BuildingId(id),
            polygon![
                (x: x0, y: y0),
                (x: x0, y: y0 + 10.0),
                (x: x0 + 10.0, y: y0 + 10.0),
                (x: x0 + 10.0, y: y0)
            ]
            .into(),
        )
    }

    fn network(roads: Vec<LineString<f64>>) -> RoadNetwork {
        RoadNetwork::new(CrsId::new(CRS), roads.into_iter().map(RoadSegment::new).collect())
    }

    #[test]
    fn test_matched_outcome() {
        let buildings = BuildingSet::new(CrsId::new(CRS), vec![square_at(1, 0.0, 0.0)]);
        let roads = network(vec![line_string![(x: -5.0, y: -5.0), (x: 15.0, y: -5.0)]]);
        let engine =
            ViewpointEngine::new(EngineConfig::new(50.0, 100.0).unwrap(), &buildings, &roads)
                .unwrap();

        match engine.evaluate(&buildings.buildings[0]) {
            BuildingOutcome::Matched(result) => {
                assert_eq!(result.sample_point, Coord { x: 5.0, y: -5.0 });
                assert_eq!(result.target_point, Coord { x: 5.0, y: 0.0 });
                assert_eq!(result.edge_index, 3);
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_no_roads_outcome() {
        let buildings = BuildingSet::new(CrsId::new(CRS), vec![square_at(1, 0.0, 0.0)]);
        let roads = network(vec![line_string![(x: 500.0, y: 0.0), (x: 600.0, y: 0.0)]]);
        let engine =
            ViewpointEngine::new(EngineConfig::new(50.0, 100.0).unwrap(), &buildings, &roads)
                .unwrap();

        assert_eq!(engine.evaluate(&buildings.buildings[0]), BuildingOutcome::NoRoads);
    }

    #[test]
    fn test_no_match_when_best_is_too_far() {
        let buildings = BuildingSet::new(CrsId::new(CRS), vec![square_at(1, 0.0, 0.0)]);
        // 40 from the bottom edge, inside the buffer but beyond max distance
        let roads = network(vec![line_string![(x: -5.0, y: -40.0), (x: 15.0, y: -40.0)]]);
        let engine =
            ViewpointEngine::new(EngineConfig::new(50.0, 30.0).unwrap(), &buildings, &roads)
                .unwrap();

        assert_eq!(
            engine.evaluate(&buildings.buildings[0]),
            BuildingOutcome::NoMatch {
                best_distance: Some(40.0)
            }
        );
    }

    #[test]
    fn test_malformed_building_is_skipped_not_fatal() {
        let sliver = Polygon::new(LineString::from(vec![(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)]), vec![]);
        let buildings = BuildingSet::new(
            CrsId::new(CRS),
            vec![
                Building::with_area(BuildingId(1), sliver.into(), 1.0),
                square_at(2, 0.0, 0.0),
            ],
        );
        let roads = network(vec![line_string![(x: -5.0, y: -5.0), (x: 15.0, y: -5.0)]]);
        let engine =
            ViewpointEngine::new(EngineConfig::new(50.0, 100.0).unwrap(), &buildings, &roads)
                .unwrap();

        let report = engine.run();
        assert_eq!(report.stats.total, 2);
        assert_eq!(report.stats.skipped, 1);
        assert_eq!(report.stats.matched, 1);
        assert_eq!(report.skipped[0].building_id, BuildingId(1));
        assert_eq!(report.results[0].building_id, BuildingId(2));
    }

    #[test]
    fn test_results_sorted_by_building_id() {
        let buildings = BuildingSet::new(
            CrsId::new(CRS),
            (0..40u64)
                .rev()
                .map(|id| square_at(id, id as f64 * 30.0, 0.0))
                .collect(),
        );
        let roads = network(vec![line_string![(x: -10.0, y: -5.0), (x: 1300.0, y: -5.0)]]);
        let engine =
            ViewpointEngine::new(EngineConfig::new(50.0, 100.0).unwrap(), &buildings, &roads)
                .unwrap();

        let report = engine.run();
        assert_eq!(report.results.len(), 40);
        let ids: Vec<u64> = report.results.iter().map(|r| r.building_id.0).collect();
        assert_eq!(ids, (0..40).collect::<Vec<_>>());
        assert!(report.get(BuildingId(17)).is_some());
    }

    #[test]
    fn test_cancelled_run_evaluates_nothing() {
        let buildings = BuildingSet::new(
            CrsId::new(CRS),
            vec![square_at(1, 0.0, 0.0), square_at(2, 50.0, 0.0)],
        );
        let roads = network(vec![line_string![(x: -5.0, y: -5.0), (x: 100.0, y: -5.0)]]);
        let engine =
            ViewpointEngine::new(EngineConfig::new(50.0, 100.0).unwrap(), &buildings, &roads)
                .unwrap();

        let cancel = CancelFlag::new();
        cancel.cancel();
        let report = engine.run_with(&cancel);
        assert!(report.results.is_empty());
        assert_eq!(report.stats.cancelled, 2);
        assert_eq!(report.stats.total, 2);
    }

    #[test]
    fn test_config_error_is_reported_before_processing() {
        let buildings = BuildingSet::new(CrsId::new(CRS), vec![square_at(1, 0.0, 0.0)]);
        let roads = RoadNetwork::new(CrsId::new("EPSG:3857"), vec![]);
        let config = EngineConfig::new(50.0, 100.0).unwrap();
        assert!(ViewpointEngine::new(config, &buildings, &roads).is_err());

        let bad = EngineConfig {
            buffer_distance: -1.0,
            max_distance: 100.0,
        };
        let roads = network(vec![]);
        assert!(ViewpointEngine::new(bad, &buildings, &roads).is_err());
    }
}
