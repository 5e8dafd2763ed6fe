// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building footprints and road geometries.
//!
//! Both are thin enums over the single- and multi-part `geo` types so the
//! engine can iterate parts in their stored order without caring which
//! variant the input file used.

use geo::{Area, BoundingRect, Coord, Line, LineString, MultiLineString, MultiPolygon, Polygon, Rect};

/// Polygonal outline of a building in planar coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Footprint {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl Footprint {
    /// Parts in stored order. A single polygon is a one-element slice.
    pub fn parts(&self) -> &[Polygon<f64>] {
        match self {
            Footprint::Polygon(polygon) => std::slice::from_ref(polygon),
            Footprint::MultiPolygon(multi) => &multi.0,
        }
    }

    /// Unsigned planar area (holes subtracted).
    pub fn area(&self) -> f64 {
        match self {
            Footprint::Polygon(polygon) => polygon.unsigned_area(),
            Footprint::MultiPolygon(multi) => multi.unsigned_area(),
        }
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            Footprint::Polygon(polygon) => polygon.bounding_rect(),
            Footprint::MultiPolygon(multi) => multi.bounding_rect(),
        }
    }

    /// Every ring of every part: exteriors and holes.
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.parts()
            .iter()
            .flat_map(|part| std::iter::once(part.exterior()).chain(part.interiors()))
    }

    /// Total number of exterior ring coordinates (closing vertex included)
    pub fn exterior_vertex_count(&self) -> usize {
        self.parts().iter().map(|part| part.exterior().0.len()).sum()
    }

    pub fn has_finite_coords(&self) -> bool {
        self.rings()
            .flat_map(|ring| ring.0.iter())
            .all(|c| c.x.is_finite() && c.y.is_finite())
    }
}

impl From<Polygon<f64>> for Footprint {
    fn from(polygon: Polygon<f64>) -> Self {
        Footprint::Polygon(polygon)
    }
}

impl From<MultiPolygon<f64>> for Footprint {
    fn from(multi: MultiPolygon<f64>) -> Self {
        Footprint::MultiPolygon(multi)
    }
}

/// Linear road geometry in planar coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum RoadGeometry {
    LineString(LineString<f64>),
    MultiLineString(MultiLineString<f64>),
}

impl RoadGeometry {
    pub fn line_strings(&self) -> &[LineString<f64>] {
        match self {
            RoadGeometry::LineString(line) => std::slice::from_ref(line),
            RoadGeometry::MultiLineString(multi) => &multi.0,
        }
    }

    /// Every segment of every part, in stored order.
    ///
    /// A single-coordinate part yields one zero-length segment so that it
    /// still behaves as a point.
    pub fn lines(&self) -> impl Iterator<Item = Line<f64>> + '_ {
        self.line_strings().iter().flat_map(|line| {
            let degenerate = match line.0.as_slice() {
                [only] => Some(Line::new(*only, *only)),
                _ => None,
            };
            line.lines().chain(degenerate)
        })
    }

    pub fn coords(&self) -> impl Iterator<Item = &Coord<f64>> {
        self.line_strings().iter().flat_map(|line| line.0.iter())
    }

    pub fn has_finite_coords(&self) -> bool {
        self.coords().all(|c| c.x.is_finite() && c.y.is_finite())
    }

    /// A road with no coordinates can never be nearest to anything.
    pub fn is_empty(&self) -> bool {
        self.coords().next().is_none()
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            RoadGeometry::LineString(line) => line.bounding_rect(),
            RoadGeometry::MultiLineString(multi) => multi.bounding_rect(),
        }
    }
}

impl From<LineString<f64>> for RoadGeometry {
    fn from(line: LineString<f64>) -> Self {
        RoadGeometry::LineString(line)
    }
}

impl From<MultiLineString<f64>> for RoadGeometry {
    fn from(multi: MultiLineString<f64>) -> Self {
        RoadGeometry::MultiLineString(multi)
    }
}
