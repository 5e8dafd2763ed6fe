// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Streetview-Sampler Core
//!
//! Data model shared by the viewpoint matching engine and its callers.
//!
//! ## Overview
//!
//! - **Inputs**: [`BuildingSet`] and [`RoadNetwork`], both tagged with the
//!   projected coordinate system ([`CrsId`]) their coordinates are expressed in
//! - **Intermediates**: [`EdgeMidpoint`] (one per boundary edge) and
//!   [`MatchCandidate`] (a midpoint paired with its nearest road point)
//! - **Output**: [`SampleResult`], at most one per building
//!
//! All geometry uses [`geo`] types with planar `f64` coordinates. The engine
//! never reprojects: distances are plain Euclidean distances in whatever
//! metric CRS the caller supplies.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use geo::polygon;
//! use streetview_core::{Building, BuildingId, BuildingSet, CrsId};
//!
//! let square = polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 10.0), (x: 10.0, y: 10.0), (x: 10.0, y: 0.0)];
//! let building = Building::new(BuildingId(1), square.into());
//! let set = BuildingSet::new(CrsId::new("EPSG:32610"), vec![building]);
//! ```

pub mod crs;
pub mod error;
pub mod footprint;
pub mod model;

pub use crs::CrsId;
pub use error::{ConfigError, Error, FootprintError, Result};
pub use footprint::{Footprint, RoadGeometry};
pub use model::{
    Building, BuildingId, BuildingSet, EdgeMidpoint, MatchCandidate, RoadNetwork, RoadSegment,
    SampleResult,
};

// Re-export geo types for convenience
pub use geo::{Coord, Line, LineString, MultiLineString, MultiPolygon, Polygon, Rect};
