// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of result coordinates into the output CRS.
//!
//! CRS identifiers are mapped to proj strings for WGS84 / NAD83 / ETRS89
//! geographic systems, WGS84 UTM zones (`EPSG:326xx` / `EPSG:327xx`) and
//! Web Mercator. Anything else may be given directly as a proj string
//! (`+proj=...`).

use anyhow::{anyhow, bail, Result};
use geo::Coord;
use proj4rs::proj::Proj;
use streetview_core::CrsId;

const WGS84_LONGLAT: &str = "+proj=longlat +datum=WGS84 +no_defs";
const GRS80_LONGLAT: &str = "+proj=longlat +ellps=GRS80 +no_defs";
const WEB_MERCATOR: &str =
    "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs";

/// Proj definition for a CRS identifier.
pub fn proj_definition(crs: &CrsId) -> Result<String> {
    let raw = crs.as_str().trim();
    if raw.starts_with('+') {
        return Ok(raw.to_string());
    }

    let canonical = crs.canonical();
    let definition = match canonical.as_str() {
        "EPSG:4326" | "OGC:CRS84" => WGS84_LONGLAT.to_string(),
        "EPSG:4269" | "EPSG:4258" => GRS80_LONGLAT.to_string(),
        "EPSG:3857" | "EPSG:900913" => WEB_MERCATOR.to_string(),
        other => {
            let code = other
                .strip_prefix("EPSG:")
                .and_then(|code| code.parse::<u32>().ok());
            match code {
                Some(code @ 32601..=32660) => {
                    format!("+proj=utm +zone={} +datum=WGS84 +units=m +no_defs", code - 32600)
                }
                Some(code @ 32701..=32760) => format!(
                    "+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs",
                    code - 32700
                ),
                _ => bail!(
                    "no projection definition for {}; pass a proj string such as \"+proj=utm +zone=10 +datum=WGS84\"",
                    crs
                ),
            }
        }
    };
    Ok(definition)
}

fn is_geographic(definition: &str) -> bool {
    definition.contains("+proj=longlat") || definition.contains("+proj=latlong")
}

/// Transforms points from the input CRS to the output CRS.
///
/// Geographic output is in degrees with `x` = longitude and `y` = latitude.
pub struct Reprojector {
    source: Proj,
    target: Proj,
    source_geographic: bool,
    target_geographic: bool,
    identity: bool,
}

impl std::fmt::Debug for Reprojector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reprojector")
            .field("source_geographic", &self.source_geographic)
            .field("target_geographic", &self.target_geographic)
            .field("identity", &self.identity)
            .finish()
    }
}

impl Reprojector {
    pub fn new(source: &CrsId, target: &CrsId) -> Result<Self> {
        let source_def = proj_definition(source)?;
        let target_def = proj_definition(target)?;
        let build = |definition: &str| {
            Proj::from_proj_string(definition)
                .map_err(|e| anyhow!("invalid projection {:?}: {:?}", definition, e))
        };

        Ok(Self {
            source: build(&source_def)?,
            target: build(&target_def)?,
            source_geographic: is_geographic(&source_def),
            target_geographic: is_geographic(&target_def),
            identity: source == target || source_def == target_def,
        })
    }

    pub fn project(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        if self.identity {
            return Ok(coord);
        }

        let mut point = if self.source_geographic {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };
        proj4rs::transform::transform(&self.source, &self.target, &mut point)
            .map_err(|e| anyhow!("cannot reproject ({}, {}): {:?}", coord.x, coord.y, e))?;

        let (x, y) = if self.target_geographic {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            (point.0, point.1)
        };
        if !x.is_finite() || !y.is_finite() {
            bail!("reprojection of ({}, {}) is not finite", coord.x, coord.y);
        }
        Ok(Coord { x, y })
    }
}
