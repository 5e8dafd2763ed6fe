// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Input checks.
//!
//! [`validate_inputs`] runs once, before any building is processed, and
//! fails the whole run. [`check_footprint`] runs per building and only
//! causes that building to be skipped.

use rustc_hash::FxHashSet;
use streetview_core::{Building, BuildingSet, ConfigError, FootprintError, RoadNetwork};
use streetview_geometry::is_valid_ring;

use crate::config::EngineConfig;

pub(crate) fn validate_inputs(
    config: &EngineConfig,
    buildings: &BuildingSet,
    roads: &RoadNetwork,
) -> Result<(), ConfigError> {
    config.validate()?;

    if buildings.crs != roads.crs {
        return Err(ConfigError::CrsMismatch {
            buildings: buildings.crs.clone(),
            roads: roads.crs.clone(),
        });
    }
    if buildings.crs.is_geographic() {
        return Err(ConfigError::GeographicCrs(buildings.crs.clone()));
    }

    let mut seen = FxHashSet::default();
    for building in &buildings.buildings {
        if !seen.insert(building.id) {
            return Err(ConfigError::DuplicateBuildingId(building.id));
        }
    }

    if let Some(index) = roads
        .roads
        .iter()
        .position(|road| !road.geometry.has_finite_coords())
    {
        return Err(ConfigError::NonFiniteRoadCoordinate { index });
    }

    Ok(())
}

pub(crate) fn check_footprint(building: &Building) -> Result<(), FootprintError> {
    if !building.footprint.has_finite_coords() {
        return Err(FootprintError::NonFiniteCoordinate);
    }
    if building.area.is_nan() || building.area <= 0.0 {
        return Err(FootprintError::NonPositiveArea(building.area));
    }
    if !building
        .footprint
        .parts()
        .iter()
        .any(|part| is_valid_ring(part.exterior()))
    {
        return Err(FootprintError::NoValidRing);
    }
    Ok(())
}
