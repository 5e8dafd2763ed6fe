// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate reference system identifiers.
//!
//! The engine does no reprojection. It only needs to know that buildings and
//! roads share one planar system, so a CRS is carried as an opaque
//! identifier such as `"EPSG:32610"` and compared in canonical form.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic (degree-based) systems, in canonical form.
const GEOGRAPHIC_CODES: &[&str] = &["EPSG:4326", "EPSG:4269", "EPSG:4258", "EPSG:4979", "OGC:CRS84"];

/// Opaque coordinate reference system identifier.
///
/// Equality ignores case, surrounding whitespace, and the difference between
/// the short (`EPSG:32610`) and URN (`urn:ogc:def:crs:EPSG::32610`) spellings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrsId(String);

impl CrsId {
    /// Wrap a CRS identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as supplied by the caller.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical `AUTHORITY:CODE` form used for comparisons.
    pub fn canonical(&self) -> String {
        let upper = self.0.trim().to_ascii_uppercase();
        let body = upper
            .strip_prefix("URN:OGC:DEF:CRS:")
            .unwrap_or(upper.as_str());

        let parts: Vec<&str> = body.split(':').filter(|p| !p.is_empty()).collect();
        match parts.as_slice() {
            [] => String::new(),
            [single] if *single == "CRS84" => "OGC:CRS84".to_string(),
            [single] => single.to_string(),
            // Drop version segments such as "OGC:1.3:CRS84" or "EPSG:9.8:4326"
            [authority, .., code] => format!("{}:{}", authority, code),
        }
    }

    /// Check if this identifier names a geographic (lon/lat) system
    pub fn is_geographic(&self) -> bool {
        let canonical = self.canonical();
        GEOGRAPHIC_CODES.iter().any(|code| *code == canonical)
    }
}

impl PartialEq for CrsId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for CrsId {}

impl fmt::Display for CrsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CrsId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
