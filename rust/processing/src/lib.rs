// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewpoint matching engine.
//!
//! For every building the engine walks a fixed state machine:
//!
//! ```text
//! Init -> CandidatesGenerated -> RoadsFiltered -> {NoRoads | Evaluated}
//!                                                 Evaluated -> {NoMatch | Matched}
//! ```
//!
//! Buildings are independent, so a batch is a rayon `par_iter` over the
//! building slice sharing one read-only [`RoadIndex`](streetview_geometry::RoadIndex).
//! Results are merged in building-id order regardless of scheduling.
//!
//! ```rust,ignore
//! use streetview_processing::{EngineConfig, ViewpointEngine};
//!
//! let config = EngineConfig::new(50.0, 100.0)?;
//! let engine = ViewpointEngine::new(config, &buildings, &roads)?;
//! let report = engine.run();
//! println!("{} of {} buildings matched", report.stats.matched, report.stats.total);
//! ```

pub mod config;
pub mod engine;
pub mod selector;
pub mod stats;
mod validation;

pub use config::EngineConfig;
pub use engine::{BuildingOutcome, CancelFlag, ViewpointEngine};
pub use selector::{nearest_candidate, select_best, to_sample_result};
pub use stats::{SamplingReport, SamplingStats, SkippedBuilding};
