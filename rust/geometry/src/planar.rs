// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar Primitives
//!
//! Point/segment arithmetic used by the road filter and the nearest-point
//! matcher. All distances are Euclidean in the input CRS; no geodesic
//! correction is applied.

use geo::{Coord, Intersects, Line, LineString};
use nalgebra::Vector2;
use rustc_hash::FxHashSet;
use streetview_core::{Footprint, RoadGeometry};

#[inline]
fn to_vec(c: Coord<f64>) -> Vector2<f64> {
    Vector2::new(c.x, c.y)
}

/// Arithmetic mean of two points.
#[inline]
pub fn midpoint(a: Coord<f64>, b: Coord<f64>) -> Coord<f64> {
    Coord {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
    }
}

#[inline]
pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Closest point on a segment to `p`.
///
/// The projection parameter is clamped to the segment, so endpoints are
/// returned for points beyond either end. A zero-length segment returns its
/// start.
pub fn closest_point_on_segment(p: Coord<f64>, line: &Line<f64>) -> Coord<f64> {
    let a = to_vec(line.start);
    let ab = to_vec(line.end) - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return line.start;
    }

    let t = ((to_vec(p) - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let q = a + ab * t;
    Coord { x: q.x, y: q.y }
}

/// Twice the signed area of triangle (a, b, c)
#[inline]
fn orient(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// `p` is assumed collinear with the segment.
#[inline]
fn within_bounds(line: &Line<f64>, p: Coord<f64>) -> bool {
    p.x >= line.start.x.min(line.end.x)
        && p.x <= line.start.x.max(line.end.x)
        && p.y >= line.start.y.min(line.end.y)
        && p.y <= line.start.y.max(line.end.y)
}

/// Whether two closed segments share at least one point.
///
/// Handles proper crossings, endpoint contact, and collinear overlap.
pub fn segments_intersect(l1: &Line<f64>, l2: &Line<f64>) -> bool {
    let d1 = orient(l2.start, l2.end, l1.start);
    let d2 = orient(l2.start, l2.end, l1.end);
    let d3 = orient(l1.start, l1.end, l2.start);
    let d4 = orient(l1.start, l1.end, l2.end);

    let straddles_l2 = (d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0);
    let straddles_l1 = (d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0);
    if straddles_l2 && straddles_l1 {
        return true;
    }

    (d1 == 0.0 && within_bounds(l2, l1.start))
        || (d2 == 0.0 && within_bounds(l2, l1.end))
        || (d3 == 0.0 && within_bounds(l1, l2.start))
        || (d4 == 0.0 && within_bounds(l1, l2.end))
}

/// Minimum distance between two segments (0 when they intersect).
pub fn segment_distance(l1: &Line<f64>, l2: &Line<f64>) -> f64 {
    if segments_intersect(l1, l2) {
        return 0.0;
    }

    [
        distance(l1.start, closest_point_on_segment(l1.start, l2)),
        distance(l1.end, closest_point_on_segment(l1.end, l2)),
        distance(l2.start, closest_point_on_segment(l2.start, l1)),
        distance(l2.end, closest_point_on_segment(l2.end, l1)),
    ]
    .into_iter()
    .fold(f64::INFINITY, f64::min)
}

/// Exact planar distance between a filled footprint and a road.
///
/// Zero when any road vertex lies inside or on the footprint, or when any
/// road segment crosses a ring. Otherwise the minimum distance from any road
/// segment to any ring (exterior or hole) of any part. A road without
/// coordinates is infinitely far away.
pub fn footprint_distance(footprint: &Footprint, road: &RoadGeometry) -> f64 {
    let parts = footprint.parts();
    if road
        .coords()
        .any(|c| parts.iter().any(|part| part.intersects(c)))
    {
        return 0.0;
    }

    let mut best = f64::INFINITY;
    for ring in footprint.rings() {
        for edge in ring.lines() {
            for segment in road.lines() {
                let d = segment_distance(&edge, &segment);
                if d < best {
                    best = d;
                    if best == 0.0 {
                        return 0.0;
                    }
                }
            }
        }
    }
    best
}

/// A ring is usable when it has at least 3 distinct vertices.
pub fn is_valid_ring(ring: &LineString<f64>) -> bool {
    let mut seen: FxHashSet<(u64, u64)> = FxHashSet::default();
    for c in &ring.0 {
        // +0.0 and -0.0 are the same vertex
        let key = ((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits());
        seen.insert(key);
        if seen.len() >= 3 {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{line_string, polygon};

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Line<f64> {
        Line::new(Coord { x: x0, y: y0 }, Coord { x: x1, y: y1 })
    }

    #[test]
    fn test_closest_point_projects_onto_interior() {
        let road = line(-5.0, -5.0, 15.0, -5.0);
        let p = closest_point_on_segment(Coord { x: 5.0, y: 0.0 }, &road);
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, -5.0);
    }

    #[test]
    fn test_closest_point_clamps_to_endpoints() {
        let road = line(0.0, 0.0, 10.0, 0.0);
        let before = closest_point_on_segment(Coord { x: -3.0, y: 4.0 }, &road);
        assert_eq!(before, Coord { x: 0.0, y: 0.0 });
        let after = closest_point_on_segment(Coord { x: 13.0, y: -4.0 }, &road);
        assert_eq!(after, Coord { x: 10.0, y: 0.0 });
    }

    #[test]
    fn test_closest_point_on_degenerate_segment() {
        let point_road = line(2.0, 2.0, 2.0, 2.0);
        let p = closest_point_on_segment(Coord { x: 7.0, y: 9.0 }, &point_road);
        assert_eq!(p, Coord { x: 2.0, y: 2.0 });
    }

    #[test]
    fn test_segments_intersect_cases() {
        // Proper crossing
        assert!(segments_intersect(&line(0.0, 0.0, 2.0, 2.0), &line(0.0, 2.0, 2.0, 0.0)));
        // Shared endpoint
        assert!(segments_intersect(&line(0.0, 0.0, 1.0, 0.0), &line(1.0, 0.0, 1.0, 1.0)));
        // Collinear overlap
        assert!(segments_intersect(&line(0.0, 0.0, 3.0, 0.0), &line(2.0, 0.0, 5.0, 0.0)));
        // Collinear but disjoint
        assert!(!segments_intersect(&line(0.0, 0.0, 1.0, 0.0), &line(2.0, 0.0, 3.0, 0.0)));
        // Parallel
        assert!(!segments_intersect(&line(0.0, 0.0, 1.0, 0.0), &line(0.0, 1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_segment_distance() {
        assert_relative_eq!(
            segment_distance(&line(0.0, 0.0, 10.0, 0.0), &line(0.0, 3.0, 10.0, 3.0)),
            3.0
        );
        assert_relative_eq!(
            segment_distance(&line(0.0, 0.0, 1.0, 0.0), &line(4.0, 4.0, 4.0, 8.0)),
            5.0
        );
        assert_eq!(
            segment_distance(&line(0.0, 0.0, 2.0, 2.0), &line(0.0, 2.0, 2.0, 0.0)),
            0.0
        );
    }

    #[test]
    fn test_footprint_distance() {
        let square: Footprint =
            polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 10.0), (x: 10.0, y: 10.0), (x: 10.0, y: 0.0)]
                .into();

        let below: RoadGeometry = line_string![(x: -5.0, y: -5.0), (x: 15.0, y: -5.0)].into();
        assert_relative_eq!(footprint_distance(&square, &below), 5.0);

        let crossing: RoadGeometry = line_string![(x: -5.0, y: 5.0), (x: 15.0, y: 5.0)].into();
        assert_eq!(footprint_distance(&square, &crossing), 0.0);

        let inside: RoadGeometry = line_string![(x: 2.0, y: 2.0), (x: 8.0, y: 8.0)].into();
        assert_eq!(footprint_distance(&square, &inside), 0.0);

        let diagonal: RoadGeometry = line_string![(x: 13.0, y: 14.0), (x: 20.0, y: 20.0)].into();
        assert_relative_eq!(footprint_distance(&square, &diagonal), 5.0);

        let empty: RoadGeometry = LineString::<f64>::new(vec![]).into();
        assert!(footprint_distance(&square, &empty).is_infinite());
    }

    #[test]
    fn test_footprint_distance_inside_hole() {
        let courtyard: Footprint = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 0.0, y: 30.0), (x: 30.0, y: 30.0), (x: 30.0, y: 0.0)],
            interiors: [[(x: 10.0, y: 10.0), (x: 10.0, y: 20.0), (x: 20.0, y: 20.0), (x: 20.0, y: 10.0)]],
        )
        .into();
        // Road inside the courtyard, 2m from the hole's west wall
        let road: RoadGeometry = line_string![(x: 12.0, y: 12.0), (x: 12.0, y: 18.0)].into();
        assert_relative_eq!(footprint_distance(&courtyard, &road), 2.0);
    }

    #[test]
    fn test_is_valid_ring() {
        let good = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)];
        assert!(is_valid_ring(&good));

        let sliver = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 0.0), (x: 0.0, y: 0.0)];
        assert!(!is_valid_ring(&sliver));

        assert!(!is_valid_ring(&LineString::new(vec![])));
    }

    #[test]
    fn test_midpoint() {
        let m = midpoint(Coord { x: 0.0, y: 0.0 }, Coord { x: 10.0, y: -4.0 });
        assert_eq!(m, Coord { x: 5.0, y: -2.0 });
    }
}
