// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for viewpoint matching.
//!
//! Two severities exist. [`ConfigError`] is fatal and is reported before any
//! building is processed. [`FootprintError`] describes a single malformed
//! building; the engine records it and moves on to the next building.
//!
//! Expected non-matches (no road within the buffer, nearest road too far)
//! are not errors at all and have no variant here.

use crate::crs::CrsId;
use crate::model::BuildingId;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error returned by engine entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Global configuration or input contract violation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Input contract violations detected before processing starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("buffer distance must be positive, got {0}")]
    NonPositiveBufferDistance(f64),

    #[error("max distance must be positive, got {0}")]
    NonPositiveMaxDistance(f64),

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    /// Buildings and roads are not expressed in the same coordinate system.
    #[error("coordinate system mismatch: buildings in {buildings}, roads in {roads}")]
    CrsMismatch { buildings: CrsId, roads: CrsId },

    /// Distances are only meaningful in a projected (metric) CRS.
    #[error("coordinate system {0} is geographic; a projected CRS in meters is required")]
    GeographicCrs(CrsId),

    #[error("duplicate building id {0}")]
    DuplicateBuildingId(BuildingId),

    /// Road at position `index` in the network has a NaN or infinite ordinate.
    #[error("road #{index} contains a non-finite coordinate")]
    NonFiniteRoadCoordinate { index: usize },
}

/// Reasons a single building is skipped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FootprintError {
    /// No exterior ring has at least 3 distinct vertices.
    #[error("footprint has no ring with at least 3 distinct vertices")]
    NoValidRing,

    #[error("building area must be positive, got {0}")]
    NonPositiveArea(f64),

    #[error("footprint contains a non-finite coordinate")]
    NonFiniteCoordinate,
}
